//! IONOSENSE: Ionospheric Interference-Aware Signal Intelligence
//!
//! Ingests wireless-signal observations and distorts recorded signal
//! strength under simulated space-weather interference, then uses the
//! resulting intensities to pace observation capture and drive an
//! operator-facing severity display.
//!
//! ## Architecture
//!
//! - **Interference Engine**: refresh-gated interference state, the
//!   degradation pipeline, adaptive scan control, severity summarization
//! - **Capture**: synthetic observation source standing in for the sniffer
//! - **Display**: text-mode severity rendering of the engine's summary

pub mod capture;
pub mod config;
pub mod display;
pub mod interference;
pub mod types;

// Re-export engine configuration
pub use config::EngineConfig;

// Re-export commonly used types
pub use types::{
    clamp01, DegradedObservation, InterferenceState, PhenomenonKind, SeverityBand,
    WifiObservation,
};

// Re-export the engine surface
pub use interference::{
    AdaptiveScanController, DegradationPipeline, FeedError, ImpactSummary, InterferenceEngine,
    InterferenceSource, KpFeed, NoaaKpFeed, OfflineFeed, RefreshOutcome, SeveritySummarizer,
};

// Re-export capture
pub use capture::SyntheticCapture;
