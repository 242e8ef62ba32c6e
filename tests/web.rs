// Browser tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use whack_a_mole::web::LocalStorageStore;
use whack_a_mole::{HighScoreStore, logging};

wasm_bindgen_test_configure!(run_in_browser);

fn store() -> LocalStorageStore {
    let win = web_sys::window().expect("window");
    LocalStorageStore::new(&win, "highscore-test")
}

#[wasm_bindgen_test]
fn local_storage_round_trips_high_score() {
    let mut store = store();
    store.clear();
    assert_eq!(store.load(), 0);
    store.save(14);
    assert_eq!(store.load(), 14);
    store.clear();
}

#[wasm_bindgen_test]
fn local_storage_junk_reads_as_zero() {
    let win = web_sys::window().expect("window");
    let raw = win.local_storage().expect("storage").expect("storage present");
    raw.set_item("highscore-test", "not a number").expect("set_item");
    assert_eq!(store().load(), 0);
    store().clear();
}

#[wasm_bindgen_test]
fn start_game_mounts_once_and_toggles_controls() {
    logging::init(tracing::Level::DEBUG);
    whack_a_mole::start_game().expect("mount");
    whack_a_mole::start_game().expect("second mount is ignored");
    let doc = web_sys::window().and_then(|w| w.document()).expect("document");
    let by_id = |id: &str| doc.get_element_by_id(id).expect(id);

    let start = by_id("wam-start");
    let grid = by_id("wam-grid");
    assert!(!start.has_attribute("hidden"));
    assert!(grid.has_attribute("hidden"));
    assert_eq!(by_id("wam-time-left").text_content().as_deref(), Some("Time Left: 30s"));

    whack_a_mole::start_round().expect("start");
    assert!(start.has_attribute("hidden"));
    assert!(!grid.has_attribute("hidden"));
    let lit: Vec<usize> = (0..9)
        .filter(|i| by_id(&format!("wam-cell-{i}")).class_name().split(' ').any(|c| c == "mole"))
        .collect();
    assert_eq!(lit.len(), 1);

    assert!(!whack_a_mole::click_cell(42).expect("click"));
    assert!(whack_a_mole::click_cell(lit[0] as u32).expect("click"));
    assert_eq!(by_id("wam-score").text_content().as_deref(), Some("Score: 1"));
}
