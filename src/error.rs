//! Errors for the fallible setup paths (mounting, config, entropy).
//! Gameplay itself never fails: bad clicks are ignored and unreadable
//! persisted scores read as zero.

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("game is not mounted; call start_game() first")]
    NotMounted,
    #[error("game is busy handling another event")]
    Busy,
    #[error("DOM call failed: {0}")]
    Dom(String),
    #[error("entropy source unavailable: {0}")]
    Entropy(getrandom::Error),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[cfg(feature = "serde_json")]
    #[error("config is not valid JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_keep_their_message() {
        let err: GameError = ConfigError::ZeroRoundLength.into();
        assert_eq!(err.to_string(), "invalid config: round length must be at least one second");
    }

    #[test]
    fn not_mounted_mentions_entrypoint() {
        assert!(GameError::NotMounted.to_string().contains("start_game()"));
    }
}
