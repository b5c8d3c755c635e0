//! Environmental Interference Engine
//!
//! The core of the system: a periodically-refreshed interference-state
//! store, a signal-degradation pipeline of composable per-phenomenon
//! models, and an adaptive sampling-rate controller.
//!
//! - [`engine::InterferenceEngine`] — shared-state facade the collaborators
//!   talk to (`degrade`, `next_scan_interval`, `current_impact_summary`)
//! - [`source::InterferenceSource`] — derives the next state from the Kp
//!   feed and the stochastic flare/EMP models
//! - [`pipeline::DegradationPipeline`] — fixed-order sequential composition
//!   of degradation models with receiver-range clamping
//! - [`scan::AdaptiveScanController`] — priority-ordered scan-rate rules
//! - [`severity::SeveritySummarizer`] — overall impact, bands, alert flag

pub mod engine;
pub mod feed;
pub mod models;
pub mod pipeline;
pub mod scan;
pub mod severity;
pub mod source;

pub use engine::{should_refresh, InterferenceEngine};
pub use feed::{FeedError, KpFeed, NoaaKpFeed, OfflineFeed};
pub use pipeline::DegradationPipeline;
pub use scan::AdaptiveScanController;
pub use severity::{impact_color, ImpactSummary, SeveritySummarizer};
pub use source::{InterferenceSource, RefreshOutcome};
