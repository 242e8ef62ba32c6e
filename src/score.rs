//! High score persistence behind a minimal load/save interface.

/// Key the best score is stored under.
pub const HIGH_SCORE_KEY: &str = "highscore";

/// Durable single-integer storage. `load` never fails; absent or unreadable
/// data is 0. `save` overwrites unconditionally, the caller owns the max policy.
pub trait HighScoreStore {
    fn load(&self) -> u32;
    fn save(&mut self, value: u32);
}

/// Decodes a stored value. Only a trimmed, non-negative decimal integer counts.
pub fn parse_high_score(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).unwrap_or(0)
}

/// In-memory store holding the raw string, as a key-value backend would.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    raw: Option<String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { raw: Some(raw.into()), writes: 0 }
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Number of `save` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        parse_high_score(self.raw.as_deref())
    }

    fn save(&mut self, value: u32) {
        self.raw = Some(value.to_string());
        self.writes += 1;
    }
}
