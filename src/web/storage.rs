use tracing::warn;
use web_sys::{Storage, Window};

use crate::score::{HighScoreStore, parse_high_score};

/// High score in `window.localStorage`. When storage is unavailable (private
/// mode, sandboxed iframe) reads give 0 and writes are dropped.
pub struct LocalStorageStore {
    storage: Option<Storage>,
    key: String,
}

impl LocalStorageStore {
    pub fn new(window: &Window, key: &str) -> Self {
        let storage = match window.local_storage() {
            Ok(Some(storage)) => Some(storage),
            Ok(None) => {
                warn!("localStorage unavailable; high score will not persist");
                None
            }
            Err(err) => {
                warn!(error = ?err, "localStorage access denied; high score will not persist");
                None
            }
        };
        Self {
            storage,
            key: key.to_string(),
        }
    }

    /// Removes the stored value.
    pub fn clear(&self) {
        if let Some(storage) = &self.storage {
            let _ = storage.remove_item(&self.key);
        }
    }
}

impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> u32 {
        let raw = self
            .storage
            .as_ref()
            .and_then(|s| s.get_item(&self.key).ok().flatten());
        parse_high_score(raw.as_deref())
    }

    fn save(&mut self, value: u32) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(err) = storage.set_item(&self.key, &value.to_string()) {
            warn!(value, error = ?err, "failed to persist high score");
        }
    }
}
