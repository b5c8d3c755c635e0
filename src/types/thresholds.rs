//! Interference thresholds, model coefficients, and severity banding

use serde::{Deserialize, Serialize};

/// Thresholds and coefficients for the interference engine
pub mod interference_thresholds {
    // === Refresh Gating ===
    /// Seconds between interference-state refreshes
    pub const REFRESH_INTERVAL_SECS: u64 = 300;

    // === Degradation Pipeline ===
    /// Minimum intensity before a phenomenon's model is applied
    pub const ACTIVATION_THRESHOLD: f64 = 0.1;
    /// Solar flare attenuation per unit intensity (dB)
    pub const SOLAR_ATTENUATION_DB: f64 = 20.0;
    /// Geomagnetic storm attenuation per unit intensity, jitter-scaled (dB)
    pub const STORM_ATTENUATION_DB: f64 = 15.0;
    /// EMP attenuation per unit intensity below the override point (dB)
    pub const EMP_ATTENUATION_DB: f64 = 40.0;
    /// EMP intensity above which the signal is floored outright
    pub const EMP_OVERRIDE_THRESHOLD: f64 = 0.8;

    // === Receiver Dynamic Range ===
    /// Weakest reportable signal (dBm)
    pub const RSSI_FLOOR_DBM: f64 = -100.0;
    /// Strongest reportable signal (dBm)
    pub const RSSI_CEILING_DBM: f64 = -30.0;

    // === Stochastic Models ===
    /// Solar flare draw: Normal(mean, sd), clamped to [0, 1]
    pub const SOLAR_FLARE_MEAN: f64 = 0.2;
    pub const SOLAR_FLARE_STD_DEV: f64 = 0.3;
    /// EMP spike probability per refresh
    pub const EMP_SPIKE_PROBABILITY: f64 = 0.05;
    /// EMP spike draw: Normal(mean, sd), clamped to [0, 1]
    pub const EMP_SPIKE_MEAN: f64 = 0.7;
    pub const EMP_SPIKE_STD_DEV: f64 = 0.2;
    /// Multiplicative EMP decay applied when no spike fires
    pub const EMP_DECAY_FACTOR: f64 = 0.9;

    // === Kp Feed ===
    /// Kp planetary index full-scale value (index runs 0-9)
    pub const KP_SCALE_MAX: f64 = 9.0;
    /// Feed request timeout (seconds)
    pub const FEED_TIMEOUT_SECS: u64 = 10;

    // === Adaptive Scanning ===
    /// Base scan interval (seconds)
    pub const SCAN_BASE_INTERVAL_SECS: f64 = 1.0;
    /// EMP intensity above which scanning doubles in rate
    pub const SCAN_EMP_THRESHOLD: f64 = 0.5;
    pub const SCAN_EMP_MULTIPLIER: f64 = 0.5;
    /// Storm intensity above which scanning speeds up moderately
    pub const SCAN_STORM_THRESHOLD: f64 = 0.7;
    pub const SCAN_STORM_MULTIPLIER: f64 = 0.7;

    // === Severity Display ===
    /// Overall impact above which the display shows an alert banner
    pub const ALERT_THRESHOLD: f64 = 0.3;
}

// ============================================================================
// Severity Banding
// ============================================================================

/// Display-oriented classification of an intensity in [0, 1].
///
/// Bands split the range in thirds, mirroring the green→yellow→red gauge
/// the display collaborator renders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeverityBand {
    Low = 0,
    Moderate = 1,
    High = 2,
}

impl SeverityBand {
    /// Classify an intensity. Input is clamped to [0, 1] first.
    pub fn from_intensity(intensity: f64) -> Self {
        let i = crate::types::clamp01(intensity);
        if i < 1.0 / 3.0 {
            SeverityBand::Low
        } else if i < 2.0 / 3.0 {
            SeverityBand::Moderate
        } else {
            SeverityBand::High
        }
    }

    /// Get short code for logging
    pub fn short_code(&self) -> &'static str {
        match self {
            SeverityBand::Low => "LOW",
            SeverityBand::Moderate => "MOD",
            SeverityBand::High => "HIGH",
        }
    }
}

impl std::fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeverityBand::Low => write!(f, "Low"),
            SeverityBand::Moderate => write!(f, "Moderate"),
            SeverityBand::High => write!(f, "High"),
        }
    }
}

impl Default for SeverityBand {
    fn default() -> Self {
        SeverityBand::Low
    }
}
