//! Shared data types for the interference engine and its collaborators.

pub mod observation;
pub mod state;
pub mod thresholds;

pub use observation::{DegradedObservation, WifiObservation};
pub use state::{clamp01, InterferenceState, PhenomenonKind};
pub use thresholds::{interference_thresholds, SeverityBand};
