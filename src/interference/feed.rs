//! Geomagnetic Kp index feed client
//!
//! Fetches the planetary Kp index from a JSON feed (NOAA SWPC by default).
//! The feed returns an array of records; the latest `kp` value is the one
//! that matters. Any shape deviation is a fetch failure — the refresh path
//! absorbs it and keeps the previous geomagnetic intensity.

use async_trait::async_trait;

use crate::config::FeedConfig;

/// Kp feed errors
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Feed returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("Malformed feed payload: {0}")]
    MalformedPayload(String),
    #[error("Feed returned an empty series")]
    EmptySeries,
}

/// Source of the latest planetary Kp index value.
///
/// The engine only ever asks for the most recent reading; history and
/// cadence are the feed's concern.
#[async_trait]
pub trait KpFeed: Send + Sync {
    async fn latest_kp(&self) -> Result<f64, FeedError>;
}

/// HTTP client for the NOAA planetary Kp index feed.
#[derive(Debug, Clone)]
pub struct NoaaKpFeed {
    http: reqwest::Client,
    url: String,
}

impl NoaaKpFeed {
    /// Build a client with the configured endpoint and request timeout.
    ///
    /// The timeout bounds how long a refresh can stay in flight against an
    /// unresponsive feed.
    pub fn new(cfg: &FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            url: cfg.url.clone(),
        })
    }
}

#[async_trait]
impl KpFeed for NoaaKpFeed {
    async fn latest_kp(&self) -> Result<f64, FeedError> {
        let resp = self.http.get(&self.url).send().await?;
        if !resp.status().is_success() {
            return Err(FeedError::Status(resp.status()));
        }

        let records: Vec<serde_json::Value> = resp
            .json()
            .await
            .map_err(|e| FeedError::MalformedPayload(e.to_string()))?;

        let last = records.last().ok_or(FeedError::EmptySeries)?;
        extract_kp(last)
    }
}

/// Pull a numeric `kp` field out of one feed record.
///
/// The SWPC feed has published `kp` both as a number and as a numeric
/// string; accept either, reject everything else.
fn extract_kp(record: &serde_json::Value) -> Result<f64, FeedError> {
    let value = record
        .get("kp")
        .ok_or_else(|| FeedError::MalformedPayload("missing `kp` field".to_string()))?;

    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| FeedError::MalformedPayload(format!("non-numeric `kp` field: {}", value)))
}

/// Feed stub for offline operation: always reports an empty series, so the
/// refresh path keeps whatever geomagnetic intensity it already had.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFeed;

#[async_trait]
impl KpFeed for OfflineFeed {
    async fn latest_kp(&self) -> Result<f64, FeedError> {
        Err(FeedError::EmptySeries)
    }
}
