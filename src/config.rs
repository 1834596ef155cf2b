use serde::{Deserialize, Serialize};

use crate::alerts::AlertConfig;

/// Shortest accepted status line refresh period.
pub const MIN_REFRESH_MS: u64 = 50;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_audio")]
    pub audio: bool,
    /// Status line refresh period for `--live`, in milliseconds.
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
}

fn default_audio() -> bool {
    true
}

fn default_refresh_ms() -> u64 {
    1000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio: default_audio(),
            refresh_ms: default_refresh_ms(),
        }
    }
}

impl Settings {
    pub fn alert_config(&self) -> AlertConfig {
        AlertConfig { audio: self.audio }
    }

    /// Apply command line overrides on top of stored settings. The refresh
    /// period is clamped to `MIN_REFRESH_MS` whichever side it came from.
    pub fn with_overrides(mut self, mute: bool, refresh_ms: Option<u64>) -> Self {
        if mute {
            self.audio = false;
        }
        self.refresh_ms = refresh_ms.unwrap_or(self.refresh_ms).max(MIN_REFRESH_MS);
        self
    }
}
