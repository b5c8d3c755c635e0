//! Wireless observation records flowing through the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw wireless-signal observation from the capture collaborator.
///
/// `device_id` and `position` are opaque to the engine: they are produced by
/// the capture and position-estimation layers and pass through degradation
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WifiObservation {
    /// Device identifier (MAC-style string, opaque)
    pub device_id: String,

    /// Estimated position in meters, local frame (opaque)
    pub position: (f64, f64),

    /// Received signal strength as captured (dBm)
    pub rssi_dbm: f64,

    /// Capture timestamp
    pub timestamp: DateTime<Utc>,
}

/// An observation after the degradation pipeline has run.
///
/// Carries both the raw and degraded signal so downstream storage can keep
/// the provenance; all opaque fields are copied through unmodified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DegradedObservation {
    pub device_id: String,
    pub position: (f64, f64),
    pub rssi_dbm: f64,
    /// Signal strength after space-weather degradation (dBm)
    pub degraded_rssi_dbm: f64,
    pub timestamp: DateTime<Utc>,
}

impl WifiObservation {
    /// Attach a degraded signal value, consuming the raw observation.
    pub fn with_degraded(self, degraded_rssi_dbm: f64) -> DegradedObservation {
        DegradedObservation {
            device_id: self.device_id,
            position: self.position,
            rssi_dbm: self.rssi_dbm,
            degraded_rssi_dbm,
            timestamp: self.timestamp,
        }
    }
}
