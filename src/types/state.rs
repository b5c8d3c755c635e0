//! Core state types: InterferenceState, PhenomenonKind

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Clamp an intensity to the normalized [0, 1] range.
///
/// NaN maps to 0.0 so a corrupt upstream value can never poison the state.
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, 1.0)
}

// ============================================================================
// Interference Phenomena
// ============================================================================

/// One of the modeled space-weather interference sources.
///
/// Replaces the string-keyed model table of earlier designs: each variant is
/// bound one-to-one to an [`InterferenceState`] field, and degradation models
/// iterate over [`PhenomenonKind::ORDERED`] so composition order is fixed at
/// compile time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PhenomenonKind {
    SolarFlare,
    GeomagneticStorm,
    EmpPulse,
}

impl PhenomenonKind {
    /// Fixed application order for degradation models.
    ///
    /// Later models see already-degraded values, so the EMP floor override
    /// dominates whatever came before it.
    pub const ORDERED: [PhenomenonKind; 3] = [
        PhenomenonKind::SolarFlare,
        PhenomenonKind::GeomagneticStorm,
        PhenomenonKind::EmpPulse,
    ];

    /// Stable key for summaries and logs.
    pub fn key(&self) -> &'static str {
        match self {
            PhenomenonKind::SolarFlare => "solar_flare",
            PhenomenonKind::GeomagneticStorm => "geomagnetic_storm",
            PhenomenonKind::EmpPulse => "emp_pulse",
        }
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            PhenomenonKind::SolarFlare => "Solar Flare",
            PhenomenonKind::GeomagneticStorm => "Geomagnetic Storm",
            PhenomenonKind::EmpPulse => "EMP Pulse",
        }
    }
}

impl std::fmt::Display for PhenomenonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Interference State
// ============================================================================

/// Snapshot of current space-weather interference intensities.
///
/// All three intensities are normalized to [0, 1]. The struct is plain data:
/// it is mutated only by the refresh path and handed to readers as a copied
/// snapshot, so a reader can never observe a half-applied refresh.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InterferenceState {
    /// Solar flare activity intensity
    pub solar_flare: f64,

    /// Geomagnetic storm intensity (Kp index scaled to [0, 1])
    pub geomagnetic_storm: f64,

    /// Simulated EMP event intensity
    pub emp_effect: f64,

    /// Timestamp of the last committed refresh (monotonically non-decreasing)
    pub last_updated: DateTime<Utc>,
}

impl InterferenceState {
    /// Quiet state at engine start: all intensities zero.
    pub fn quiet(started_at: DateTime<Utc>) -> Self {
        Self {
            solar_flare: 0.0,
            geomagnetic_storm: 0.0,
            emp_effect: 0.0,
            last_updated: started_at,
        }
    }

    /// Intensity of a single phenomenon.
    pub fn intensity(&self, kind: PhenomenonKind) -> f64 {
        match kind {
            PhenomenonKind::SolarFlare => self.solar_flare,
            PhenomenonKind::GeomagneticStorm => self.geomagnetic_storm,
            PhenomenonKind::EmpPulse => self.emp_effect,
        }
    }

    /// True if every intensity lies inside the normalized [0, 1] range.
    pub fn is_normalized(&self) -> bool {
        PhenomenonKind::ORDERED
            .iter()
            .all(|&k| (0.0..=1.0).contains(&self.intensity(k)))
    }
}
