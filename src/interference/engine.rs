//! Interference engine facade
//!
//! Owns the shared [`InterferenceState`] and wires the refresh gate,
//! degradation pipeline, scan controller, and severity summarizer behind a
//! small API. All readers take short read locks on the state; the refresh
//! runs its network call off the reader path and commits under a brief
//! write lock, so a slow feed never stalls degradation, scan-rate, or
//! severity queries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::config::{ConfigError, EngineConfig};
use crate::interference::feed::KpFeed;
use crate::interference::pipeline::DegradationPipeline;
use crate::interference::scan::AdaptiveScanController;
use crate::interference::severity::{ImpactSummary, SeveritySummarizer};
use crate::interference::source::{InterferenceSource, RefreshOutcome};
use crate::types::{DegradedObservation, InterferenceState, WifiObservation};

/// Refresh gate: true iff the interval has fully elapsed since the last
/// committed refresh. The sole throttle on feed calls and random-walk steps.
pub fn should_refresh(
    now: DateTime<Utc>,
    last_updated: DateTime<Utc>,
    interval: Duration,
) -> bool {
    now - last_updated > interval
}

/// Shared-state interference engine.
///
/// Cheap to clone into capture, scheduling, and display tasks: all clones
/// operate on the same state instance.
#[derive(Clone)]
pub struct InterferenceEngine {
    state: Arc<RwLock<InterferenceState>>,
    source: Arc<Mutex<InterferenceSource>>,
    feed: Arc<dyn KpFeed>,
    pipeline: DegradationPipeline,
    scan: AdaptiveScanController,
    summarizer: SeveritySummarizer,
    refresh_interval: Duration,
    refresh_in_flight: Arc<AtomicBool>,
}

impl InterferenceEngine {
    /// Build an engine from validated config with a quiet initial state.
    pub fn new(
        cfg: &EngineConfig,
        feed: Arc<dyn KpFeed>,
        rng: rand::rngs::StdRng,
        started_at: DateTime<Utc>,
    ) -> Result<Self, ConfigError> {
        let source = InterferenceSource::from_config(cfg, rng)?;
        Ok(Self {
            state: Arc::new(RwLock::new(InterferenceState::quiet(started_at))),
            source: Arc::new(Mutex::new(source)),
            feed,
            pipeline: DegradationPipeline::new(&cfg.degradation),
            scan: AdaptiveScanController::new(&cfg.scan),
            summarizer: SeveritySummarizer::new(&cfg.severity),
            refresh_interval: Duration::seconds(cfg.refresh.interval_secs as i64),
            refresh_in_flight: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Degrade one raw RSSI value under the current interference state.
    ///
    /// Total: never returns an error to the capture path. Opens the refresh
    /// gate as a side effect — a due refresh is spawned in the background
    /// and this call proceeds against the pre-refresh snapshot.
    pub async fn degrade(&self, raw_dbm: f64, now: DateTime<Utc>) -> f64 {
        let snapshot = *self.state.read().await;
        if should_refresh(now, snapshot.last_updated, self.refresh_interval) {
            self.spawn_refresh(now);
        }
        self.pipeline.degrade(raw_dbm, &snapshot)
    }

    /// Degrade a full observation, passing device id, position, and
    /// timestamp through untouched.
    pub async fn degrade_observation(&self, obs: WifiObservation) -> DegradedObservation {
        let now = obs.timestamp;
        let degraded = self.degrade(obs.rssi_dbm, now).await;
        obs.with_degraded(degraded)
    }

    /// Scan interval for the capture scheduler, from the current state.
    pub async fn next_scan_interval(&self) -> f64 {
        let snapshot = *self.state.read().await;
        self.scan.interval_secs(&snapshot)
    }

    /// Severity summary for the display collaborator.
    pub async fn current_impact_summary(&self) -> ImpactSummary {
        let snapshot = *self.state.read().await;
        self.summarizer.summarize(&snapshot)
    }

    /// Copy of the current state, for display and diagnostics.
    pub async fn state_snapshot(&self) -> InterferenceState {
        *self.state.read().await
    }

    /// Run the refresh inline if the gate is open.
    ///
    /// Returns `None` when the gate is closed. The capture path uses the
    /// spawned variant; this inline form serves the simulation binary and
    /// tests, where deterministic sequencing matters.
    pub async fn refresh_if_due(&self, now: DateTime<Utc>) -> Option<RefreshOutcome> {
        run_refresh(
            &self.state,
            &self.source,
            self.feed.as_ref(),
            self.refresh_interval,
            now,
        )
        .await
    }

    /// Trigger a background refresh, at most one in flight at a time.
    fn spawn_refresh(&self, now: DateTime<Utc>) {
        if self
            .refresh_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let state = Arc::clone(&self.state);
        let source = Arc::clone(&self.source);
        let feed = Arc::clone(&self.feed);
        let in_flight = Arc::clone(&self.refresh_in_flight);
        let interval = self.refresh_interval;

        tokio::spawn(async move {
            let _ = run_refresh(&state, &source, feed.as_ref(), interval, now).await;
            in_flight.store(false, Ordering::Release);
        });
    }
}

/// Gate check + refresh + atomic commit.
///
/// The gate is re-checked under the source lock: two racing triggers
/// serialize here, and the loser sees the winner's commit and backs off.
/// The feed call happens while holding only the source lock — state readers
/// are never blocked behind it.
async fn run_refresh(
    state: &RwLock<InterferenceState>,
    source: &Mutex<InterferenceSource>,
    feed: &dyn KpFeed,
    interval: Duration,
    now: DateTime<Utc>,
) -> Option<RefreshOutcome> {
    let mut source = source.lock().await;

    let snapshot = *state.read().await;
    if !should_refresh(now, snapshot.last_updated, interval) {
        debug!("Refresh gate closed — skipping");
        return None;
    }

    let outcome = source.refresh(snapshot, feed, now).await;
    *state.write().await = outcome.state;
    Some(outcome)
}
