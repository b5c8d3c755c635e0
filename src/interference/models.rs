//! Per-phenomenon signal degradation models
//!
//! Each model is a pure transform `(signal, intensity) -> signal` keyed by
//! [`PhenomenonKind`]. The geomagnetic model additionally takes a fresh
//! uniform jitter draw at application time, so its penalty varies call to
//! call even while the interference state is unchanged.

use rand::Rng;

use crate::types::interference_thresholds as t;
use crate::types::PhenomenonKind;

/// Apply one phenomenon's degradation model to a running signal value.
///
/// Models in dBm terms:
/// - Solar flare: linear attenuation, 20 dB at full intensity
/// - Geomagnetic storm: jittered attenuation, up to 15 dB at full intensity
/// - EMP pulse: hard floor at -100 dBm above the override intensity,
///   otherwise linear attenuation up to 40 dB
pub fn apply_model<R: Rng + ?Sized>(
    kind: PhenomenonKind,
    signal_dbm: f64,
    intensity: f64,
    rng: &mut R,
) -> f64 {
    match kind {
        PhenomenonKind::SolarFlare => signal_dbm - t::SOLAR_ATTENUATION_DB * intensity,
        PhenomenonKind::GeomagneticStorm => {
            let jitter: f64 = rng.gen();
            signal_dbm - t::STORM_ATTENUATION_DB * intensity * jitter
        }
        PhenomenonKind::EmpPulse => {
            if intensity > t::EMP_OVERRIDE_THRESHOLD {
                t::RSSI_FLOOR_DBM
            } else {
                signal_dbm - t::EMP_ATTENUATION_DB * intensity
            }
        }
    }
}
