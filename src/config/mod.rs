use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Known calibration categories offered by the client. The backend accepts
/// any string; these are the ones the picker surfaces.
pub const CALIBRATION_CATEGORIES: [&str; 6] =
    ["dress", "top", "jacket", "pants", "shoes", "accessory"];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FlowConfig {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub deck: DeckConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Horizontal release offset (px) beyond which a swipe commits. Strict
    /// inequality: exactly this offset settles back to center.
    #[serde(default = "default_commit_threshold_px")]
    pub commit_threshold_px: f64,
    /// Two image activations closer together than this commit a super-like.
    #[serde(default = "default_double_tap_window_ms")]
    pub double_tap_window_ms: u64,
    /// Dwell at or above this marks a like as a soft-like.
    #[serde(default = "default_dwell_threshold_ms")]
    pub dwell_threshold_ms: u64,
    /// Duration of the settle animation before a swiped card's decision fires.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Delay between a committed decision and the deck advancing.
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Refill fires whenever fewer than this many items remain at or past
    /// the cursor.
    #[serde(default = "default_low_watermark")]
    pub low_watermark: usize,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".into()
}
fn default_user() -> String {
    "demo".into()
}
fn default_batch_size() -> u32 {
    30
}
fn default_commit_threshold_px() -> f64 {
    100.0
}
fn default_double_tap_window_ms() -> u64 {
    300
}
fn default_dwell_threshold_ms() -> u64 {
    5000
}
fn default_settle_ms() -> u64 {
    200
}
fn default_advance_delay_ms() -> u64 {
    150
}
fn default_low_watermark() -> usize {
    10
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user: default_user(),
            batch_size: default_batch_size(),
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            commit_threshold_px: default_commit_threshold_px(),
            double_tap_window_ms: default_double_tap_window_ms(),
            dwell_threshold_ms: default_dwell_threshold_ms(),
            settle_ms: default_settle_ms(),
            advance_delay_ms: default_advance_delay_ms(),
        }
    }
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            low_watermark: default_low_watermark(),
        }
    }
}

impl FlowConfig {
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(raw).map_err(|e| ConfigError::Load(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.batch_size == 0 {
            return Err(ConfigError::Validation("batch_size must be > 0".into()));
        }
        if self.deck.low_watermark == 0 {
            return Err(ConfigError::Validation("low_watermark must be > 0".into()));
        }
        if self.gesture.commit_threshold_px <= 0.0 {
            return Err(ConfigError::Validation(
                "commit_threshold_px must be > 0".into(),
            ));
        }
        Ok(())
    }
}
