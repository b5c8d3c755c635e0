//! Adaptive scan-rate controller
//!
//! Maps the current interference state to a scan interval for the capture
//! scheduler. Rules form a priority-ordered decision list — first match
//! wins, no blending.

use crate::config::ScanConfig;
use crate::types::InterferenceState;

/// Priority-ordered scan interval rules.
#[derive(Debug, Clone)]
pub struct AdaptiveScanController {
    base_interval_secs: f64,
    emp_threshold: f64,
    emp_multiplier: f64,
    storm_threshold: f64,
    storm_multiplier: f64,
}

impl AdaptiveScanController {
    pub fn new(cfg: &ScanConfig) -> Self {
        Self {
            base_interval_secs: cfg.base_interval_secs,
            emp_threshold: cfg.emp_threshold,
            emp_multiplier: cfg.emp_multiplier,
            storm_threshold: cfg.storm_threshold,
            storm_multiplier: cfg.storm_multiplier,
        }
    }

    /// Scan interval in seconds for the given state.
    ///
    /// EMP disturbances outrank geomagnetic storms; anything below both
    /// thresholds scans at the base rate.
    pub fn interval_secs(&self, state: &InterferenceState) -> f64 {
        if state.emp_effect > self.emp_threshold {
            return self.base_interval_secs * self.emp_multiplier;
        }
        if state.geomagnetic_storm > self.storm_threshold {
            return self.base_interval_secs * self.storm_multiplier;
        }
        self.base_interval_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn controller() -> AdaptiveScanController {
        AdaptiveScanController::new(&ScanConfig::default())
    }

    fn state(storm: f64, emp: f64) -> InterferenceState {
        InterferenceState {
            solar_flare: 0.0,
            geomagnetic_storm: storm,
            emp_effect: emp,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn quiet_state_scans_at_base_rate() {
        assert_eq!(controller().interval_secs(&state(0.0, 0.0)), 1.0);
    }

    #[test]
    fn emp_disturbance_doubles_scan_rate() {
        assert_eq!(controller().interval_secs(&state(0.0, 0.6)), 0.5);
    }

    #[test]
    fn storm_speeds_scanning_moderately() {
        assert_eq!(controller().interval_secs(&state(0.8, 0.0)), 0.7);
    }

    #[test]
    fn emp_rule_outranks_storm_rule() {
        // Both rules match; EMP wins
        assert_eq!(controller().interval_secs(&state(0.9, 0.6)), 0.5);
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(controller().interval_secs(&state(0.7, 0.5)), 1.0);
    }

    #[test]
    fn solar_flare_does_not_affect_scan_rate() {
        let mut s = state(0.0, 0.0);
        s.solar_flare = 1.0;
        assert_eq!(controller().interval_secs(&s), 1.0);
    }
}
