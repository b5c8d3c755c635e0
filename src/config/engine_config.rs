//! Engine Configuration - interference thresholds as operator-tunable TOML values
//!
//! Every threshold in `types::interference_thresholds` has a counterpart
//! here. Each struct implements `Default` with values matching those
//! constants, ensuring zero-change behavior when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::defaults;
use crate::types::interference_thresholds as t;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an interference engine deployment.
///
/// Load with `EngineConfig::load()` which searches:
/// 1. `$IONOSENSE_CONFIG` env var
/// 2. `./ionosense.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Refresh gate timing
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Degradation pipeline thresholds and receiver range
    #[serde(default)]
    pub degradation: DegradationConfig,

    /// Solar flare stochastic model
    #[serde(default)]
    pub solar: SolarFlareConfig,

    /// EMP spike-and-decay model
    #[serde(default)]
    pub emp: EmpConfig,

    /// Geomagnetic Kp feed
    #[serde(default)]
    pub feed: FeedConfig,

    /// Adaptive scan rules
    #[serde(default)]
    pub scan: ScanConfig,

    /// Severity display thresholds
    #[serde(default)]
    pub severity: SeverityConfig,

    /// Synthetic capture stub
    #[serde(default)]
    pub capture: CaptureConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh: RefreshConfig::default(),
            degradation: DegradationConfig::default(),
            solar: SolarFlareConfig::default(),
            emp: EmpConfig::default(),
            feed: FeedConfig::default(),
            scan: ScanConfig::default(),
            severity: SeverityConfig::default(),
            capture: CaptureConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration using the standard search order:
    /// 1. `$IONOSENSE_CONFIG` environment variable
    /// 2. `./ionosense.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("IONOSENSE_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded engine config from IONOSENSE_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from IONOSENSE_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "IONOSENSE_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("ionosense.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded engine config from ./ionosense.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./ionosense.toml, using defaults");
                }
            }
        }

        info!("No ionosense.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate all fields for internal consistency.
    ///
    /// Rules:
    /// - Intervals and timeouts must be positive
    /// - Probabilities and thresholds on intensities must lie in [0, 1]
    /// - Standard deviations must be positive
    /// - The receiver floor must sit below the ceiling
    /// - Scan multipliers must be positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.refresh.interval_secs == 0 {
            errors.push("refresh.interval_secs must be > 0".to_string());
        }

        Self::check_unit_range(
            self.degradation.activation_threshold,
            "degradation.activation_threshold",
            &mut errors,
        );
        if self.degradation.rssi_floor_dbm >= self.degradation.rssi_ceiling_dbm {
            errors.push(format!(
                "degradation.rssi_floor_dbm ({:.1}) must be below rssi_ceiling_dbm ({:.1})",
                self.degradation.rssi_floor_dbm, self.degradation.rssi_ceiling_dbm
            ));
        }

        if self.solar.std_dev <= 0.0 {
            errors.push("solar.std_dev must be > 0".to_string());
        }

        Self::check_unit_range(self.emp.spike_probability, "emp.spike_probability", &mut errors);
        if self.emp.spike_std_dev <= 0.0 {
            errors.push("emp.spike_std_dev must be > 0".to_string());
        }
        Self::check_unit_range(self.emp.decay_factor, "emp.decay_factor", &mut errors);

        if self.feed.url.is_empty() {
            errors.push("feed.url must not be empty".to_string());
        }
        if self.feed.timeout_secs == 0 {
            errors.push("feed.timeout_secs must be > 0".to_string());
        }
        if self.feed.kp_scale_max <= 0.0 {
            errors.push("feed.kp_scale_max must be > 0".to_string());
        }

        if self.scan.base_interval_secs <= 0.0 {
            errors.push("scan.base_interval_secs must be > 0".to_string());
        }
        Self::check_unit_range(self.scan.emp_threshold, "scan.emp_threshold", &mut errors);
        Self::check_unit_range(self.scan.storm_threshold, "scan.storm_threshold", &mut errors);
        if self.scan.emp_multiplier <= 0.0 {
            errors.push("scan.emp_multiplier must be > 0".to_string());
        }
        if self.scan.storm_multiplier <= 0.0 {
            errors.push("scan.storm_multiplier must be > 0".to_string());
        }

        Self::check_unit_range(
            self.severity.alert_threshold,
            "severity.alert_threshold",
            &mut errors,
        );

        if self.capture.device_count == 0 {
            errors.push("capture.device_count must be > 0".to_string());
        }
        if self.capture.area_size_m <= 0.0 {
            errors.push("capture.area_size_m must be > 0".to_string());
        }
        if self.capture.rssi_std_dev_db <= 0.0 {
            errors.push("capture.rssi_std_dev_db must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_unit_range(value: f64, key: &str, errors: &mut Vec<String>) {
        if !(0.0..=1.0).contains(&value) {
            errors.push(format!("{} ({:.4}) must lie in [0, 1]", key, value));
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Refresh gate timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between interference-state refreshes
    #[serde(default = "default_refresh_interval")]
    pub interval_secs: u64,
}

fn default_refresh_interval() -> u64 {
    t::REFRESH_INTERVAL_SECS
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_refresh_interval(),
        }
    }
}

/// Degradation pipeline thresholds and receiver dynamic range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationConfig {
    /// Minimum intensity before a phenomenon's model is applied
    #[serde(default = "default_activation_threshold")]
    pub activation_threshold: f64,

    /// Weakest reportable signal (dBm)
    #[serde(default = "default_rssi_floor")]
    pub rssi_floor_dbm: f64,

    /// Strongest reportable signal (dBm)
    #[serde(default = "default_rssi_ceiling")]
    pub rssi_ceiling_dbm: f64,
}

fn default_activation_threshold() -> f64 {
    t::ACTIVATION_THRESHOLD
}
fn default_rssi_floor() -> f64 {
    t::RSSI_FLOOR_DBM
}
fn default_rssi_ceiling() -> f64 {
    t::RSSI_CEILING_DBM
}

impl Default for DegradationConfig {
    fn default() -> Self {
        Self {
            activation_threshold: default_activation_threshold(),
            rssi_floor_dbm: default_rssi_floor(),
            rssi_ceiling_dbm: default_rssi_ceiling(),
        }
    }
}

/// Solar flare stochastic model (fresh Normal draw per refresh).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarFlareConfig {
    #[serde(default = "default_solar_mean")]
    pub mean: f64,

    #[serde(default = "default_solar_std_dev")]
    pub std_dev: f64,
}

fn default_solar_mean() -> f64 {
    t::SOLAR_FLARE_MEAN
}
fn default_solar_std_dev() -> f64 {
    t::SOLAR_FLARE_STD_DEV
}

impl Default for SolarFlareConfig {
    fn default() -> Self {
        Self {
            mean: default_solar_mean(),
            std_dev: default_solar_std_dev(),
        }
    }
}

/// EMP spike-and-decay model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmpConfig {
    /// Probability of a new spike per refresh
    #[serde(default = "default_emp_spike_probability")]
    pub spike_probability: f64,

    #[serde(default = "default_emp_spike_mean")]
    pub spike_mean: f64,

    #[serde(default = "default_emp_spike_std_dev")]
    pub spike_std_dev: f64,

    /// Multiplicative decay applied when no spike fires
    #[serde(default = "default_emp_decay_factor")]
    pub decay_factor: f64,
}

fn default_emp_spike_probability() -> f64 {
    t::EMP_SPIKE_PROBABILITY
}
fn default_emp_spike_mean() -> f64 {
    t::EMP_SPIKE_MEAN
}
fn default_emp_spike_std_dev() -> f64 {
    t::EMP_SPIKE_STD_DEV
}
fn default_emp_decay_factor() -> f64 {
    t::EMP_DECAY_FACTOR
}

impl Default for EmpConfig {
    fn default() -> Self {
        Self {
            spike_probability: default_emp_spike_probability(),
            spike_mean: default_emp_spike_mean(),
            spike_std_dev: default_emp_spike_std_dev(),
            decay_factor: default_emp_decay_factor(),
        }
    }
}

/// Geomagnetic Kp index feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed endpoint returning a JSON array of Kp records
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// Request timeout (seconds)
    #[serde(default = "default_feed_timeout")]
    pub timeout_secs: u64,

    /// Full-scale Kp value used for normalization
    #[serde(default = "default_kp_scale_max")]
    pub kp_scale_max: f64,
}

fn default_feed_url() -> String {
    defaults::KP_FEED_URL.to_string()
}
fn default_feed_timeout() -> u64 {
    t::FEED_TIMEOUT_SECS
}
fn default_kp_scale_max() -> f64 {
    t::KP_SCALE_MAX
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timeout_secs: default_feed_timeout(),
            kp_scale_max: default_kp_scale_max(),
        }
    }
}

/// Adaptive scan rules (priority-ordered, first match wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Base scan interval (seconds)
    #[serde(default = "default_scan_base_interval")]
    pub base_interval_secs: f64,

    /// EMP intensity above which the EMP rule fires
    #[serde(default = "default_scan_emp_threshold")]
    pub emp_threshold: f64,

    #[serde(default = "default_scan_emp_multiplier")]
    pub emp_multiplier: f64,

    /// Storm intensity above which the storm rule fires
    #[serde(default = "default_scan_storm_threshold")]
    pub storm_threshold: f64,

    #[serde(default = "default_scan_storm_multiplier")]
    pub storm_multiplier: f64,
}

fn default_scan_base_interval() -> f64 {
    t::SCAN_BASE_INTERVAL_SECS
}
fn default_scan_emp_threshold() -> f64 {
    t::SCAN_EMP_THRESHOLD
}
fn default_scan_emp_multiplier() -> f64 {
    t::SCAN_EMP_MULTIPLIER
}
fn default_scan_storm_threshold() -> f64 {
    t::SCAN_STORM_THRESHOLD
}
fn default_scan_storm_multiplier() -> f64 {
    t::SCAN_STORM_MULTIPLIER
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_interval_secs: default_scan_base_interval(),
            emp_threshold: default_scan_emp_threshold(),
            emp_multiplier: default_scan_emp_multiplier(),
            storm_threshold: default_scan_storm_threshold(),
            storm_multiplier: default_scan_storm_multiplier(),
        }
    }
}

/// Severity display thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityConfig {
    /// Overall impact above which the display shows an alert banner
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,
}

fn default_alert_threshold() -> f64 {
    t::ALERT_THRESHOLD
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            alert_threshold: default_alert_threshold(),
        }
    }
}

/// Synthetic capture stub parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Number of synthetic devices tracked
    #[serde(default = "default_capture_device_count")]
    pub device_count: usize,

    /// Side length of the square observation area (meters)
    #[serde(default = "default_capture_area_size")]
    pub area_size_m: f64,

    /// Mean synthetic RSSI before degradation (dBm)
    #[serde(default = "default_capture_rssi_mean")]
    pub rssi_mean_dbm: f64,

    /// Standard deviation of synthetic RSSI (dB)
    #[serde(default = "default_capture_rssi_std_dev")]
    pub rssi_std_dev_db: f64,
}

fn default_capture_device_count() -> usize {
    defaults::CAPTURE_DEVICE_COUNT
}
fn default_capture_area_size() -> f64 {
    defaults::CAPTURE_AREA_SIZE_M
}
fn default_capture_rssi_mean() -> f64 {
    defaults::CAPTURE_RSSI_MEAN_DBM
}
fn default_capture_rssi_std_dev() -> f64 {
    defaults::CAPTURE_RSSI_STD_DEV_DB
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_count: default_capture_device_count(),
            area_size_m: default_capture_area_size(),
            rssi_mean_dbm: default_capture_rssi_mean(),
            rssi_std_dev_db: default_capture_rssi_std_dev(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Configuration load/validation errors
#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Config validation failed: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {}
