//! Operator display glue
//!
//! Renders the engine's severity summary as a text gauge for terminal
//! output and structured logs. Consumes only the numeric summary surface;
//! the engine knows nothing about rendering.

use crate::config::defaults::DISPLAY_GAUGE_WIDTH as GAUGE_WIDTH;
use crate::interference::{impact_color, ImpactSummary};
use crate::types::SeverityBand;

/// Render the severity summary as a multi-line text gauge.
///
/// One bar per phenomenon plus the overall impact, each annotated with its
/// severity band; an alert banner tops the block when the engine signals
/// alert.
pub fn render_summary(summary: &ImpactSummary) -> String {
    let mut out = String::new();

    if summary.alert {
        out.push_str(&format!(
            "! SPACE WEATHER IMPACT: {:.0}% !\n",
            summary.overall_impact * 100.0
        ));
    }

    for (name, intensity) in &summary.per_phenomenon {
        out.push_str(&render_gauge(name, *intensity));
        out.push('\n');
    }
    out.push_str(&render_gauge("overall_impact", summary.overall_impact));
    out.push('\n');

    out
}

/// One gauge line: `name [#####.....] 0.47 MOD (255,186,0)`.
fn render_gauge(name: &str, intensity: f64) -> String {
    let i = crate::types::clamp01(intensity);
    let filled = (i * GAUGE_WIDTH as f64).round() as usize;
    let filled = filled.min(GAUGE_WIDTH);

    let band = SeverityBand::from_intensity(i);
    let (r, g, b) = impact_color(i);

    format!(
        "{:<18} [{}{}] {:.2} {:<4} ({},{},{})",
        name,
        "#".repeat(filled),
        ".".repeat(GAUGE_WIDTH - filled),
        i,
        band.short_code(),
        r,
        g,
        b
    )
}
