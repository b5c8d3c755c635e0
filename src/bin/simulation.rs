//! Space Weather Observation Simulation
//!
//! Generates a degraded wireless-observation stream for testing IONOSENSE
//! without live capture or a live Kp feed. Walks through a scripted set of
//! space-weather phases:
//! - Quiet baseline
//! - Rising solar flare activity
//! - Geomagnetic storm
//! - EMP event (scan-rate doubling, signal floor)
//! - Recovery
//!
//! # Usage
//! ```bash
//! ./simulation --duration-secs 300 --speed 100 > observations.jsonl
//! ```

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};

use chrono::Utc;
use ionosense::capture::SyntheticCapture;
use ionosense::config::EngineConfig;
use ionosense::interference::{AdaptiveScanController, DegradationPipeline};
use ionosense::types::InterferenceState;

#[derive(Parser, Debug)]
#[command(name = "space-weather-simulation")]
#[command(about = "Synthetic degraded observation stream for IONOSENSE testing")]
#[command(version = "1.0")]
struct Args {
    /// Simulated duration in seconds
    #[arg(short, long, default_value = "300")]
    duration_secs: u64,

    /// Observations per simulated second
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=100))]
    sample_rate: u32,

    /// Time compression factor (1 = real-time, 0 = no pacing)
    #[arg(short, long, default_value = "0")]
    speed: u32,

    /// Output format: json or csv
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Suppress phase log on stderr (only emit observations)
    #[arg(short, long)]
    quiet: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
}

// ============================================================================
// Simulation Phases
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    /// Calm conditions, no degradation (0-30%)
    Quiet,
    /// Solar flare activity ramping up (30-50%)
    SolarActivity,
    /// Strong geomagnetic storm (50-70%)
    GeomagneticStorm,
    /// Severe EMP event with signal floor (70-85%)
    EmpEvent,
    /// Return to calm (85-100%)
    Recovery,
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Quiet => "Quiet Baseline",
            Phase::SolarActivity => "Solar Flare Activity",
            Phase::GeomagneticStorm => "Geomagnetic Storm",
            Phase::EmpEvent => "EMP Event",
            Phase::Recovery => "Recovery",
        }
    }

    fn from_progress(progress: f64) -> Self {
        match progress {
            p if p < 0.30 => Phase::Quiet,
            p if p < 0.50 => Phase::SolarActivity,
            p if p < 0.70 => Phase::GeomagneticStorm,
            p if p < 0.85 => Phase::EmpEvent,
            _ => Phase::Recovery,
        }
    }

    /// Scripted interference state for this phase.
    fn state(&self, now: chrono::DateTime<Utc>) -> InterferenceState {
        let (solar, storm, emp) = match self {
            Phase::Quiet => (0.05, 0.05, 0.0),
            Phase::SolarActivity => (0.6, 0.1, 0.0),
            Phase::GeomagneticStorm => (0.3, 0.85, 0.05),
            Phase::EmpEvent => (0.3, 0.5, 0.9),
            Phase::Recovery => (0.1, 0.2, 0.08),
        };
        InterferenceState {
            solar_flare: solar,
            geomagnetic_storm: storm,
            emp_effect: emp,
            last_updated: now,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = EngineConfig::default();
    let pipeline = DegradationPipeline::new(&config.degradation);
    let scan = AdaptiveScanController::new(&config.scan);

    let seed = args.seed.unwrap_or(0);
    let mut capture =
        SyntheticCapture::from_config(&config.capture, StdRng::seed_from_u64(seed))?;
    let mut jitter_rng = StdRng::seed_from_u64(seed.wrapping_add(1));

    let total = args.duration_secs * u64::from(args.sample_rate);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.format == "csv" {
        writeln!(
            out,
            "timestamp,device_id,x,y,rssi_dbm,degraded_rssi_dbm,scan_interval_secs"
        )?;
    }

    let mut last_phase: Option<Phase> = None;

    for i in 0..total {
        let progress = i as f64 / total.max(1) as f64;
        let phase = Phase::from_progress(progress);
        let now = Utc::now();
        let state = phase.state(now);

        if !args.quiet && last_phase != Some(phase) {
            eprintln!(
                "=== Phase: {} (solar {:.2}, storm {:.2}, emp {:.2}) ===",
                phase.name(),
                state.solar_flare,
                state.geomagnetic_storm,
                state.emp_effect
            );
            last_phase = Some(phase);
        }

        let obs = capture.next_observation(now);
        let degraded_dbm = pipeline.degrade_with_rng(obs.rssi_dbm, &state, &mut jitter_rng);
        let degraded = obs.with_degraded(degraded_dbm);
        let interval = scan.interval_secs(&state);

        match args.format.as_str() {
            "csv" => writeln!(
                out,
                "{},{},{:.2},{:.2},{:.1},{:.1},{:.1}",
                degraded.timestamp.to_rfc3339(),
                degraded.device_id,
                degraded.position.0,
                degraded.position.1,
                degraded.rssi_dbm,
                degraded.degraded_rssi_dbm,
                interval
            )?,
            _ => {
                let line = serde_json::to_string(&degraded)?;
                writeln!(out, "{}", line)?;
            }
        }

        if args.speed > 0 {
            let pacing = interval / f64::from(args.sample_rate) / f64::from(args.speed);
            std::thread::sleep(std::time::Duration::from_secs_f64(pacing));
        }
    }

    if !args.quiet {
        eprintln!("=== Simulation complete: {} observations ===", total);
    }
    Ok(())
}
