//! Synthetic wireless observation source
//!
//! Generates plausible observation streams for development and testing: a
//! fixed population of devices wandering a square area, with RSSI drawn
//! from a Normal distribution and clamped to the receiver range. Seedable
//! for reproducible runs.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::{CaptureConfig, ConfigError};
use crate::types::WifiObservation;

/// Receiver output range for synthetic RSSI (dBm).
const SYNTH_RSSI_FLOOR_DBM: f64 = -100.0;
const SYNTH_RSSI_CEILING_DBM: f64 = -30.0;

/// Synthetic observation generator with a fixed device population.
pub struct SyntheticCapture {
    devices: Vec<String>,
    area_size_m: f64,
    rssi: Normal<f64>,
    rng: StdRng,
    next_device: usize,
}

impl SyntheticCapture {
    pub fn from_config(cfg: &CaptureConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        let rssi = Normal::new(cfg.rssi_mean_dbm, cfg.rssi_std_dev_db).map_err(|e| {
            ConfigError::Validation(vec![format!("capture RSSI parameters invalid: {}", e)])
        })?;

        let devices = (0..cfg.device_count)
            .map(|_| random_mac(&mut rng))
            .collect();

        Ok(Self {
            devices,
            area_size_m: cfg.area_size_m,
            rssi,
            rng,
            next_device: 0,
        })
    }

    /// Produce the next observation, cycling through the device population.
    pub fn next_observation(&mut self, now: DateTime<Utc>) -> WifiObservation {
        let device_id = self.devices[self.next_device % self.devices.len()].clone();
        self.next_device = (self.next_device + 1) % self.devices.len();

        let x = self.rng.gen::<f64>() * self.area_size_m;
        let y = self.rng.gen::<f64>() * self.area_size_m;
        let rssi_dbm = self
            .rssi
            .sample(&mut self.rng)
            .clamp(SYNTH_RSSI_FLOOR_DBM, SYNTH_RSSI_CEILING_DBM);

        WifiObservation {
            device_id,
            position: (x, y),
            rssi_dbm,
            timestamp: now,
        }
    }

    /// Number of distinct devices this source emits.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

fn random_mac(rng: &mut StdRng) -> String {
    // Locally administered unicast prefix
    let tail: [u8; 5] = rng.gen();
    format!(
        "02:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        tail[0], tail[1], tail[2], tail[3], tail[4]
    )
}
