//! Signal degradation pipeline
//!
//! Transforms one raw RSSI value into a degraded one under the current
//! interference state. Models compose sequentially in the fixed
//! [`PhenomenonKind::ORDERED`] order — each model sees the output of the
//! previous one, so the EMP floor override dominates regardless of prior
//! degradation.

use rand::Rng;
use tracing::{debug, warn};

use crate::config::DegradationConfig;
use crate::interference::models::apply_model;
use crate::types::{InterferenceState, PhenomenonKind};

/// Fixed-order degradation pipeline with receiver-range clamping.
#[derive(Debug, Clone)]
pub struct DegradationPipeline {
    activation_threshold: f64,
    rssi_floor_dbm: f64,
    rssi_ceiling_dbm: f64,
}

impl DegradationPipeline {
    pub fn new(cfg: &DegradationConfig) -> Self {
        Self {
            activation_threshold: cfg.activation_threshold,
            rssi_floor_dbm: cfg.rssi_floor_dbm,
            rssi_ceiling_dbm: cfg.rssi_ceiling_dbm,
        }
    }

    /// Degrade a raw signal under the given state, drawing storm jitter from
    /// the thread-local RNG.
    pub fn degrade(&self, raw_dbm: f64, state: &InterferenceState) -> f64 {
        self.degrade_with_rng(raw_dbm, state, &mut rand::thread_rng())
    }

    /// Degrade a raw signal with an injected RNG for reproducible jitter.
    ///
    /// Total over all f64 inputs: a non-finite raw value is contained here
    /// and the clamped raw value is returned instead of propagating a fault
    /// into the capture path.
    pub fn degrade_with_rng<R: Rng + ?Sized>(
        &self,
        raw_dbm: f64,
        state: &InterferenceState,
        rng: &mut R,
    ) -> f64 {
        if !raw_dbm.is_finite() {
            warn!(raw = raw_dbm, "Non-finite RSSI input — returning clamped raw value");
            return self.clamp_to_range(raw_dbm);
        }

        let mut signal = raw_dbm;
        for kind in PhenomenonKind::ORDERED {
            let intensity = state.intensity(kind);
            if intensity > self.activation_threshold {
                signal = apply_model(kind, signal, intensity, rng);
            }
        }

        let degraded = self.clamp_to_range(signal);
        if degraded != raw_dbm {
            debug!(
                raw = raw_dbm,
                degraded = degraded,
                "Signal degraded by space weather"
            );
        }
        degraded
    }

    /// Clamp a signal into the receiver's dynamic range. NaN maps to the
    /// floor (weakest reportable signal).
    fn clamp_to_range(&self, dbm: f64) -> f64 {
        if dbm.is_nan() {
            return self.rssi_floor_dbm;
        }
        dbm.clamp(self.rssi_floor_dbm, self.rssi_ceiling_dbm)
    }
}
