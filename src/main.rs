//! IONOSENSE - Ionospheric Interference Monitor
//!
//! Real-time wireless signal intelligence under simulated space-weather
//! interference.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (live NOAA Kp feed)
//! cargo run --release
//!
//! # Run without network access
//! cargo run --release -- --offline
//!
//! # Reproducible run for a fixed duration
//! cargo run --release -- --seed 7 --duration-secs 120
//! ```
//!
//! # Environment Variables
//!
//! - `IONOSENSE_CONFIG`: Path to a TOML config file (default: ./ionosense.toml)
//! - `RUST_LOG`: Logging level (default: info)

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use ionosense::capture::SyntheticCapture;
use ionosense::config::{defaults, EngineConfig};
use ionosense::display::render_summary;
use ionosense::interference::{InterferenceEngine, KpFeed, NoaaKpFeed, OfflineFeed};

#[derive(Parser, Debug)]
#[command(name = "ionosense")]
#[command(about = "Wireless signal intelligence under space-weather interference")]
#[command(version)]
struct Args {
    /// Path to a TOML config file (overrides the default search order)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Skip the Kp feed entirely (geomagnetic intensity stays at its
    /// previous value)
    #[arg(long)]
    offline: bool,

    /// Random seed for reproducible interference and capture streams
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many seconds (runs until Ctrl-C if unset)
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Seconds between operator display refreshes
    #[arg(long, default_value_t = defaults::DISPLAY_INTERVAL_SECS)]
    display_interval_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::load(),
    };

    let feed: Arc<dyn KpFeed> = if args.offline {
        info!("Offline mode — Kp feed disabled");
        Arc::new(OfflineFeed)
    } else {
        Arc::new(NoaaKpFeed::new(&config.feed).context("building Kp feed client")?)
    };

    let mut seed_rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let engine_rng = StdRng::from_rng(&mut seed_rng).context("deriving engine RNG")?;
    let capture_rng = StdRng::from_rng(&mut seed_rng).context("deriving capture RNG")?;

    let engine = InterferenceEngine::new(&config, feed, engine_rng, Utc::now())
        .context("building interference engine")?;
    let capture = SyntheticCapture::from_config(&config.capture, capture_rng)
        .context("building synthetic capture")?;

    info!(
        refresh_interval_secs = config.refresh.interval_secs,
        devices = config.capture.device_count,
        "IONOSENSE starting"
    );

    let cancel = CancellationToken::new();

    let capture_task = tokio::spawn(capture_loop(
        engine.clone(),
        capture,
        cancel.child_token(),
    ));
    let display_task = tokio::spawn(display_loop(
        engine.clone(),
        args.display_interval_secs,
        cancel.child_token(),
    ));

    match args.duration_secs {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(std::time::Duration::from_secs(secs)) => {
                    info!(duration_secs = secs, "Run duration elapsed — shutting down");
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl-C received — shutting down");
                }
            }
        }
        None => {
            tokio::signal::ctrl_c()
                .await
                .context("waiting for Ctrl-C")?;
            info!("Ctrl-C received — shutting down");
        }
    }

    cancel.cancel();
    let _ = capture_task.await;
    let _ = display_task.await;

    let summary = engine.current_impact_summary().await;
    info!(
        overall_impact = summary.overall_impact,
        alert = summary.alert,
        "IONOSENSE stopped"
    );
    Ok(())
}

/// Capture loop: degrade each synthetic observation and pace the next scan
/// with the engine's adaptive interval.
async fn capture_loop(
    engine: InterferenceEngine,
    mut capture: SyntheticCapture,
    cancel: CancellationToken,
) {
    let mut observations: u64 = 0;

    loop {
        let obs = capture.next_observation(Utc::now());
        let degraded = engine.degrade_observation(obs).await;
        observations += 1;

        tracing::debug!(
            device = %degraded.device_id,
            raw_dbm = degraded.rssi_dbm,
            degraded_dbm = degraded.degraded_rssi_dbm,
            "Observation captured"
        );

        let interval = engine.next_scan_interval().await;
        tokio::select! {
            _ = tokio::time::sleep(std::time::Duration::from_secs_f64(interval)) => {}
            _ = cancel.cancelled() => break,
        }
    }

    info!(observations, "Capture loop stopped");
}

/// Display loop: render the severity gauge at a fixed cadence.
async fn display_loop(
    engine: InterferenceEngine,
    interval_secs: u64,
    cancel: CancellationToken,
) {
    let interval = std::time::Duration::from_secs(interval_secs.max(1));

    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => break,
        }

        let summary = engine.current_impact_summary().await;
        if summary.alert {
            warn!(
                overall_impact = summary.overall_impact,
                "Space weather impact alert"
            );
        }
        println!("{}", render_summary(&summary));
    }
}
