//! Whack-a-Mole core crate.
//!
//! A 30 second round on a 3x3 board: one cell holds the mole at a time and it
//! jumps faster the more you score. The gameplay core (`round`, `mole`,
//! `timer`, `score`) is plain Rust and runs natively on a virtual clock; the
//! `web` module mounts it in the browser with `setInterval` timers and
//! `localStorage` for the high score.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod grid;
pub mod logging;
pub mod mole;
pub mod round;
pub mod score;
pub mod timer;
pub mod web;

pub use config::{ConfigError, GameConfig, MolePace};
pub use error::GameError;
pub use grid::{GRID_CELLS, Grid};
pub use mole::{CellPicker, MoleScheduler, RandomCells};
pub use round::{GameEvent, Phase, RoundController, RoundSnapshot, RoundSummary};
pub use score::{HIGH_SCORE_KEY, HighScoreStore, MemoryStore, parse_high_score};
pub use timer::{ManualScheduler, PeriodicTask, Scheduler, TimerKind};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Mounts the game with default settings.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::mount(GameConfig::default())?;
    Ok(())
}

/// Mounts the game from a JSON `GameConfig`; omitted fields take defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    web::mount(GameConfig::from_json(json)?)?;
    Ok(())
}

#[wasm_bindgen]
pub fn start_round() -> Result<(), JsValue> {
    web::with_game(|game| game.start_round())?;
    Ok(())
}

/// Returns true when the click hit the mole.
#[wasm_bindgen]
pub fn click_cell(index: u32) -> Result<bool, JsValue> {
    let hit = web::with_game(|game| game.on_cell_clicked(index as usize))?;
    Ok(hit)
}

#[wasm_bindgen]
pub fn high_score() -> Result<u32, JsValue> {
    Ok(web::with_game(|game| game.high_score())?)
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn snapshot_json() -> Result<String, JsValue> {
    let snapshot = web::with_game(|game| game.snapshot())?;
    serde_json::to_string(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
}
