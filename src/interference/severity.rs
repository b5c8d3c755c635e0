//! Severity summarization for the operator display
//!
//! Reduces the three interference intensities to a single overall-impact
//! scalar, per-phenomenon readings, and an alert flag. The display
//! collaborator renders these; nothing here draws pixels.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::SeverityConfig;
use crate::types::{clamp01, InterferenceState, PhenomenonKind, SeverityBand};

/// Numeric severity summary consumed by the display collaborator.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImpactSummary {
    /// Mean of the three phenomenon intensities
    pub overall_impact: f64,

    /// Intensity per phenomenon, keyed by stable name
    pub per_phenomenon: BTreeMap<String, f64>,

    /// Severity band of the overall impact
    pub band: SeverityBand,

    /// True when the overall impact warrants an alert annotation
    pub alert: bool,
}

/// Reduces interference state to a display summary.
#[derive(Debug, Clone)]
pub struct SeveritySummarizer {
    alert_threshold: f64,
}

impl SeveritySummarizer {
    pub fn new(cfg: &SeverityConfig) -> Self {
        Self {
            alert_threshold: cfg.alert_threshold,
        }
    }

    pub fn summarize(&self, state: &InterferenceState) -> ImpactSummary {
        let per_phenomenon: BTreeMap<String, f64> = PhenomenonKind::ORDERED
            .iter()
            .map(|&k| (k.key().to_string(), state.intensity(k)))
            .collect();

        let overall_impact =
            (state.solar_flare + state.geomagnetic_storm + state.emp_effect) / 3.0;

        ImpactSummary {
            overall_impact,
            per_phenomenon,
            band: SeverityBand::from_intensity(overall_impact),
            alert: overall_impact > self.alert_threshold,
        }
    }
}

/// RGB color for an intensity, interpolating green → yellow → red.
///
/// Matches the display gauge's banding: green at 0, yellow at 0.5, red at 1.
pub fn impact_color(intensity: f64) -> (u8, u8, u8) {
    let i = clamp01(intensity);
    let (lo, hi, frac) = if i < 0.5 {
        ((0u8, 170u8, 0u8), (255u8, 200u8, 0u8), i * 2.0)
    } else {
        ((255u8, 200u8, 0u8), (200u8, 0u8, 0u8), (i - 0.5) * 2.0)
    };
    let lerp = |a: u8, b: u8| -> u8 {
        (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8
    };
    (lerp(lo.0, hi.0), lerp(lo.1, hi.1), lerp(lo.2, hi.2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn summarizer() -> SeveritySummarizer {
        SeveritySummarizer::new(&SeverityConfig::default())
    }

    fn state(solar: f64, storm: f64, emp: f64) -> InterferenceState {
        InterferenceState {
            solar_flare: solar,
            geomagnetic_storm: storm,
            emp_effect: emp,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn overall_impact_is_mean_of_intensities() {
        let summary = summarizer().summarize(&state(0.3, 0.6, 0.9));
        assert!((summary.overall_impact - 0.6).abs() < 1e-12);
    }

    #[test]
    fn per_phenomenon_has_exactly_three_keys() {
        let summary = summarizer().summarize(&state(0.1, 0.2, 0.3));
        let keys: Vec<&str> = summary.per_phenomenon.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["emp_pulse", "geomagnetic_storm", "solar_flare"]);
        assert_eq!(summary.per_phenomenon["solar_flare"], 0.1);
        assert_eq!(summary.per_phenomenon["geomagnetic_storm"], 0.2);
        assert_eq!(summary.per_phenomenon["emp_pulse"], 0.3);
    }

    #[test]
    fn alert_flips_above_threshold() {
        let quiet = summarizer().summarize(&state(0.1, 0.1, 0.1));
        assert!(!quiet.alert);

        // Mean exactly 0.3 does not alert (strictly greater)
        let at = summarizer().summarize(&state(0.3, 0.3, 0.3));
        assert!(!at.alert);

        let above = summarizer().summarize(&state(0.4, 0.3, 0.3));
        assert!(above.alert);
    }

    #[test]
    fn color_endpoints() {
        assert_eq!(impact_color(0.0), (0, 170, 0));
        assert_eq!(impact_color(0.5), (255, 200, 0));
        assert_eq!(impact_color(1.0), (200, 0, 0));
    }

    #[test]
    fn color_clamps_input() {
        assert_eq!(impact_color(-1.0), impact_color(0.0));
        assert_eq!(impact_color(9.0), impact_color(1.0));
    }

    #[test]
    fn band_tracks_overall_impact() {
        assert_eq!(
            summarizer().summarize(&state(0.0, 0.0, 0.0)).band,
            SeverityBand::Low
        );
        assert_eq!(
            summarizer().summarize(&state(1.0, 1.0, 1.0)).band,
            SeverityBand::High
        );
    }
}
