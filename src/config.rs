//! Runtime configuration.
//!
//! Passed from JavaScript as a JSON string to `init_deck()`. Every field has a
//! default, so `{}` (or an empty string) yields the stock widget.

use serde::{Deserialize, Serialize};

/// Default localStorage key holding the serialized deck.
pub const DEFAULT_STORAGE_KEY: &str = "flashcards";

/// Delays for the shuffle animation sequence, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShuffleTimings {
    /// How long cards hold the gathered pose before the shuffle plays.
    pub gather_ms: u32,
    /// Duration of the centered shuffle animation.
    pub shuffle_ms: u32,
    /// Duration of the spread back to layout positions.
    pub spread_ms: u32,
    /// Per-card stagger added to the shuffle animation start.
    pub stagger_step_ms: u32,
    /// Stagger wraps around at this value.
    pub stagger_wrap_ms: u32,
}

impl Default for ShuffleTimings {
    fn default() -> Self {
        Self {
            gather_ms: 400,
            shuffle_ms: 2000,
            spread_ms: 400,
            stagger_step_ms: 100,
            stagger_wrap_ms: 500,
        }
    }
}

impl ShuffleTimings {
    /// Animation delay for the card at `index` during the shuffle phase.
    pub fn stagger_for(&self, index: usize) -> u32 {
        if self.stagger_wrap_ms == 0 {
            return 0;
        }
        let step = u64::from(self.stagger_step_ms) * index as u64;
        (step % u64::from(self.stagger_wrap_ms)) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage_key: String,
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    pub timings: ShuffleTimings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: "info".to_string(),
            timings: ShuffleTimings::default(),
        }
    }
}

impl Config {
    /// Parse a JSON config, falling back to defaults when empty or invalid.
    pub fn from_json(json: &str) -> Self {
        if json.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<Config>(json) {
            Ok(mut config) => {
                if config.storage_key.trim().is_empty() {
                    config.storage_key = DEFAULT_STORAGE_KEY.to_string();
                }
                config
            }
            Err(e) => {
                log::warn!("invalid config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level
            .parse()
            .unwrap_or(log::LevelFilter::Info)
    }
}
