//! System-wide default constants for the glue layers.
//!
//! Engine-core defaults live in `types::interference_thresholds`; this module
//! holds the remaining knobs for capture, display, and the main loop.

// ============================================================================
// Capture
// ============================================================================

/// Number of synthetic devices the capture stub tracks.
pub const CAPTURE_DEVICE_COUNT: usize = 12;

/// Side length of the square observation area (meters).
pub const CAPTURE_AREA_SIZE_M: f64 = 50.0;

/// Mean synthetic RSSI before degradation (dBm).
pub const CAPTURE_RSSI_MEAN_DBM: f64 = -65.0;

/// Standard deviation of synthetic RSSI (dB).
pub const CAPTURE_RSSI_STD_DEV_DB: f64 = 8.0;

// ============================================================================
// Display
// ============================================================================

/// Seconds between operator display refreshes.
pub const DISPLAY_INTERVAL_SECS: u64 = 10;

/// Width of the intensity gauge in characters.
pub const DISPLAY_GAUGE_WIDTH: usize = 30;

// ============================================================================
// Feed
// ============================================================================

/// Planetary Kp index feed (1-minute cadence, JSON array).
pub const KP_FEED_URL: &str = "https://services.swpc.noaa.gov/json/planetary_k_index_1m.json";
