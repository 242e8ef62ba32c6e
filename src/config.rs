//! Game tuning: round length, countdown period, mole pace curve and the
//! persisted high score key.

use thiserror::Error;

use crate::score::HIGH_SCORE_KEY;

/// Linear speed-up of the mole: `max(base - score * step, floor)` milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MolePace {
    pub base_ms: u32,
    pub step_ms: u32,
    pub floor_ms: u32,
}

impl MolePace {
    pub const DEFAULT_BASE_MS: u32 = 1000;
    pub const DEFAULT_STEP_MS: u32 = 50;
    pub const DEFAULT_FLOOR_MS: u32 = 200;

    /// Highlight period for the given score. Strictly decreasing until it hits the floor.
    pub fn period_for(&self, score: u32) -> u32 {
        self.base_ms
            .saturating_sub(score.saturating_mul(self.step_ms))
            .max(self.floor_ms)
    }
}

impl Default for MolePace {
    fn default() -> Self {
        Self {
            base_ms: Self::DEFAULT_BASE_MS,
            step_ms: Self::DEFAULT_STEP_MS,
            floor_ms: Self::DEFAULT_FLOOR_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub round_length_secs: u32,
    pub countdown_period_ms: u32,
    pub pace: MolePace,
    /// Move the mole to a fresh cell on every point. When off, a hit only
    /// restarts the timer phase and the mole stays put until the next tick.
    pub rehighlight_on_score: bool,
    pub storage_key: String,
    /// `tracing` level name: trace, debug, info, warn or error.
    pub log_level: String,
}

impl GameConfig {
    pub const DEFAULT_ROUND_LENGTH_SECS: u32 = 30;
    pub const DEFAULT_COUNTDOWN_PERIOD_MS: u32 = 1000;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_length_secs == 0 {
            return Err(ConfigError::ZeroRoundLength);
        }
        if self.countdown_period_ms == 0 {
            return Err(ConfigError::ZeroCountdownPeriod);
        }
        if self.pace.floor_ms == 0 {
            return Err(ConfigError::ZeroMoleFloor);
        }
        if self.pace.floor_ms > self.pace.base_ms {
            return Err(ConfigError::FloorAboveBase {
                floor_ms: self.pace.floor_ms,
                base_ms: self.pace.base_ms,
            });
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        self.tracing_level()?;
        Ok(())
    }

    pub fn tracing_level(&self) -> Result<tracing::Level, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::UnknownLogLevel(self.log_level.clone()))
    }

    /// Parses a (possibly partial) JSON config; missing fields take defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, crate::error::GameError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_length_secs: Self::DEFAULT_ROUND_LENGTH_SECS,
            countdown_period_ms: Self::DEFAULT_COUNTDOWN_PERIOD_MS,
            pace: MolePace::default(),
            rehighlight_on_score: true,
            storage_key: HIGH_SCORE_KEY.to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("round length must be at least one second")]
    ZeroRoundLength,
    #[error("countdown period must be non-zero")]
    ZeroCountdownPeriod,
    #[error("mole period floor must be non-zero")]
    ZeroMoleFloor,
    #[error("mole period floor {floor_ms}ms is above the base period {base_ms}ms")]
    FloorAboveBase { floor_ms: u32, base_ms: u32 },
    #[error("storage key must not be empty")]
    EmptyStorageKey,
    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}
