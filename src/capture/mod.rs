//! Observation capture glue
//!
//! The real system sniffs 802.11 frames; this repo ships a synthetic
//! capture source that stands in for the sniffer, producing
//! [`WifiObservation`](crate::types::WifiObservation) records from
//! parameterized distributions. The capture loop paces itself with the
//! engine's adaptive scan interval.

mod synthetic;

pub use synthetic::SyntheticCapture;
