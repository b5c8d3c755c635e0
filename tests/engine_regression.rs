//! Engine Regression Tests
//!
//! Exercises the full interference engine through its public surface:
//! refresh gating, fail-soft feed handling, degradation composition,
//! scan-rate priority, and the severity summary. Feed behavior is driven by
//! in-process stubs so every scenario is deterministic and offline.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;

use ionosense::config::EngineConfig;
use ionosense::interference::{FeedError, InterferenceEngine, KpFeed};
use ionosense::types::{InterferenceState, WifiObservation};
use ionosense::{AdaptiveScanController, DegradationPipeline, SeveritySummarizer};

// ============================================================================
// Feed stubs
// ============================================================================

/// Always returns the same Kp value.
struct StaticFeed(f64);

#[async_trait]
impl KpFeed for StaticFeed {
    async fn latest_kp(&self) -> Result<f64, FeedError> {
        Ok(self.0)
    }
}

/// Always fails with an HTTP 500.
struct ServerErrorFeed;

#[async_trait]
impl KpFeed for ServerErrorFeed {
    async fn latest_kp(&self) -> Result<f64, FeedError> {
        Err(FeedError::Status(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        ))
    }
}

/// Plays back a scripted sequence of responses, then repeats the last.
struct SequenceFeed {
    script: Mutex<Vec<Option<f64>>>,
}

impl SequenceFeed {
    fn new(script: Vec<Option<f64>>) -> Self {
        Self {
            script: Mutex::new(script),
        }
    }
}

#[async_trait]
impl KpFeed for SequenceFeed {
    async fn latest_kp(&self) -> Result<f64, FeedError> {
        let mut script = self.script.lock().await;
        let next = if script.len() > 1 {
            script.remove(0)
        } else {
            script.first().copied().flatten()
        };
        next.ok_or(FeedError::EmptySeries)
    }
}

fn engine_with(feed: Arc<dyn KpFeed>, seed: u64) -> (InterferenceEngine, chrono::DateTime<Utc>) {
    let t0 = Utc::now();
    let engine = InterferenceEngine::new(
        &EngineConfig::default(),
        feed,
        StdRng::seed_from_u64(seed),
        t0,
    )
    .expect("default config is valid");
    (engine, t0)
}

fn state(solar: f64, storm: f64, emp: f64) -> InterferenceState {
    InterferenceState {
        solar_flare: solar,
        geomagnetic_storm: storm,
        emp_effect: emp,
        last_updated: Utc::now(),
    }
}

// ============================================================================
// Refresh gating
// ============================================================================

#[tokio::test]
async fn refresh_gate_blocks_inside_interval() {
    let (engine, t0) = engine_with(Arc::new(StaticFeed(5.0)), 1);

    let before = engine.state_snapshot().await;
    assert!(engine
        .refresh_if_due(t0 + Duration::seconds(299))
        .await
        .is_none());
    assert!(engine
        .refresh_if_due(t0 + Duration::seconds(300))
        .await
        .is_none());
    let after = engine.state_snapshot().await;

    assert_eq!(before, after, "state changed inside the refresh interval");
}

#[tokio::test]
async fn refresh_gate_opens_after_interval() {
    let (engine, t0) = engine_with(Arc::new(StaticFeed(5.0)), 1);
    let t1 = t0 + Duration::seconds(301);

    let outcome = engine.refresh_if_due(t1).await.expect("gate should open");
    assert!(outcome.feed_applied);

    let snapshot = engine.state_snapshot().await;
    assert_eq!(snapshot.last_updated, t1);
    assert!((snapshot.geomagnetic_storm - 5.0 / 9.0).abs() < 1e-12);
}

#[tokio::test]
async fn consecutive_refreshes_each_need_a_full_interval() {
    let (engine, t0) = engine_with(Arc::new(StaticFeed(3.0)), 1);

    let t1 = t0 + Duration::seconds(301);
    engine.refresh_if_due(t1).await.expect("first refresh");

    // Gate re-arms against the new timestamp
    assert!(engine
        .refresh_if_due(t1 + Duration::seconds(150))
        .await
        .is_none());
    assert!(engine
        .refresh_if_due(t1 + Duration::seconds(301))
        .await
        .is_some());
}

// ============================================================================
// Fail-soft feed handling
// ============================================================================

#[tokio::test]
async fn server_error_retains_previous_geomagnetic_value() {
    // First refresh succeeds and sets storm = 6/9; afterwards the feed
    // starts failing and the value must hold.
    let feed = Arc::new(SequenceFeed::new(vec![Some(6.0), None]));
    let (engine, t0) = engine_with(feed, 2);

    let t1 = t0 + Duration::seconds(301);
    let first = engine.refresh_if_due(t1).await.expect("first refresh");
    assert!(first.feed_applied);
    let storm_before = engine.state_snapshot().await.geomagnetic_storm;
    assert!((storm_before - 6.0 / 9.0).abs() < 1e-12);

    let t2 = t1 + Duration::seconds(301);
    let second = engine.refresh_if_due(t2).await.expect("second refresh");
    assert!(!second.feed_applied);

    let snapshot = engine.state_snapshot().await;
    assert_eq!(snapshot.geomagnetic_storm, storm_before);
    assert_eq!(snapshot.last_updated, t2, "stochastic refresh still commits");
}

#[tokio::test]
async fn feed_failure_never_reaches_the_degrade_caller() {
    let (engine, t0) = engine_with(Arc::new(ServerErrorFeed), 3);

    // Gate is open: this degrade call triggers a background refresh against
    // the failing feed. The call itself must stay total and in range.
    let out = engine.degrade(-50.0, t0 + Duration::seconds(301)).await;
    assert!((-100.0..=-30.0).contains(&out));
}

#[tokio::test]
async fn state_stays_normalized_across_many_refreshes() {
    let feed = Arc::new(SequenceFeed::new(vec![
        Some(27.0),
        Some(-4.0),
        None,
        Some(9.0),
        Some(0.0),
    ]));
    let (engine, t0) = engine_with(feed, 4);

    let mut now = t0;
    for _ in 0..50 {
        now = now + Duration::seconds(301);
        engine.refresh_if_due(now).await.expect("gate open");
        let snapshot = engine.state_snapshot().await;
        assert!(
            snapshot.is_normalized(),
            "intensities left [0,1]: {:?}",
            snapshot
        );
    }
}

// ============================================================================
// Degradation pipeline reference scenarios
// ============================================================================

#[test]
fn solar_flare_reference_scenario() {
    let pipeline = DegradationPipeline::new(&EngineConfig::default().degradation);
    let out = pipeline.degrade(-50.0, &state(0.5, 0.0, 0.0));
    assert!((out - -60.0).abs() < 1e-12, "expected -60, got {}", out);
}

#[test]
fn emp_override_dominates_regardless_of_other_intensities() {
    let pipeline = DegradationPipeline::new(&EngineConfig::default().degradation);
    for (solar, storm) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
        let out = pipeline.degrade(-35.0, &state(solar, storm, 0.9));
        assert_eq!(out, -100.0);
    }
}

#[test]
fn activation_threshold_is_strict() {
    let pipeline = DegradationPipeline::new(&EngineConfig::default().degradation);
    assert_eq!(pipeline.degrade(-50.0, &state(0.1, 0.1, 0.1)), -50.0);
    assert!(pipeline.degrade(-50.0, &state(0.1000001, 0.0, 0.0)) < -50.0);
}

#[test]
fn degraded_output_always_in_receiver_range() {
    let pipeline = DegradationPipeline::new(&EngineConfig::default().degradation);
    let mut rng = StdRng::seed_from_u64(8);
    for raw in [-130.0, -100.0, -72.5, -30.0, -10.0] {
        for s in [0.0, 0.2, 0.5, 1.0] {
            let out = pipeline.degrade_with_rng(raw, &state(s, s, s), &mut rng);
            assert!((-100.0..=-30.0).contains(&out), "out of range: {}", out);
        }
    }
}

// ============================================================================
// Scan-rate priority
// ============================================================================

#[test]
fn emp_rule_wins_over_storm_rule() {
    let scan = AdaptiveScanController::new(&EngineConfig::default().scan);
    assert_eq!(scan.interval_secs(&state(0.0, 0.9, 0.6)), 0.5);
}

#[test]
fn storm_rule_applies_when_emp_is_calm() {
    let scan = AdaptiveScanController::new(&EngineConfig::default().scan);
    assert_eq!(scan.interval_secs(&state(0.0, 0.9, 0.2)), 0.7);
}

// ============================================================================
// Severity summary
// ============================================================================

#[test]
fn summary_exposes_all_three_phenomena_and_alert() {
    let summarizer = SeveritySummarizer::new(&EngineConfig::default().severity);
    let summary = summarizer.summarize(&state(0.6, 0.3, 0.3));

    assert_eq!(summary.per_phenomenon.len(), 3);
    assert!((summary.overall_impact - 0.4).abs() < 1e-12);
    assert!(summary.alert);
}

// ============================================================================
// End-to-end through the engine
// ============================================================================

#[tokio::test]
async fn observation_round_trip_preserves_identity_fields() {
    let (engine, t0) = engine_with(Arc::new(StaticFeed(0.0)), 6);

    let obs = WifiObservation {
        device_id: "02:11:22:33:44:55".to_string(),
        position: (7.25, 40.5),
        rssi_dbm: -61.0,
        timestamp: t0,
    };
    let degraded = engine.degrade_observation(obs.clone()).await;

    assert_eq!(degraded.device_id, obs.device_id);
    assert_eq!(degraded.position, obs.position);
    assert_eq!(degraded.timestamp, obs.timestamp);
    assert_eq!(degraded.rssi_dbm, -61.0);
    assert!((-100.0..=-30.0).contains(&degraded.degraded_rssi_dbm));
}

#[tokio::test]
async fn concurrent_readers_see_consistent_snapshots() {
    // A storm-only refresh flips the state from all-zero to storm=1.0.
    // Concurrent summaries must see one of those two snapshots, never a
    // blend with other fields half-applied.
    let mut cfg = EngineConfig::default();
    cfg.emp.spike_probability = 0.0;
    let t0 = Utc::now();
    let engine = InterferenceEngine::new(
        &cfg,
        Arc::new(StaticFeed(9.0)),
        StdRng::seed_from_u64(7),
        t0,
    )
    .expect("config is valid");

    let mut readers = Vec::new();
    for _ in 0..16 {
        let eng = engine.clone();
        readers.push(tokio::spawn(async move {
            let mut summaries = Vec::new();
            for _ in 0..50 {
                summaries.push(eng.current_impact_summary().await);
                tokio::task::yield_now().await;
            }
            summaries
        }));
    }

    engine
        .refresh_if_due(t0 + Duration::seconds(301))
        .await
        .expect("gate open");

    for reader in readers {
        for summary in reader.await.expect("reader task panicked") {
            let storm = summary.per_phenomenon["geomagnetic_storm"];
            assert!(
                storm == 0.0 || storm == 1.0,
                "observed a half-applied refresh: storm = {}",
                storm
            );
        }
    }
}
