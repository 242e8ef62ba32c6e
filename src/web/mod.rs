//! Browser glue: builds the DOM, keeps the controller in a thread-local cell
//! and routes clicks and `setInterval` firings into it.
//!
//! All game state lives in `GAME`; every callback borrows it for the duration
//! of one event, so mutation stays on the page's single event thread.

use std::cell::RefCell;

use tracing::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, window};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::grid::GRID_CELLS;
use crate::mole::RandomCells;
use crate::round::{GameEvent, RoundController, RoundSnapshot};
use crate::timer::TimerKind;

mod interval;
mod storage;

pub use interval::{IntervalHandle, IntervalScheduler};
pub use storage::LocalStorageStore;

pub type WebController = RoundController<IntervalScheduler, LocalStorageStore, RandomCells>;

thread_local! {
    static GAME: RefCell<Option<WebController>> = RefCell::new(None);
}

const STYLE: &str = "\
#wam-root{font-family:'Fira Code',monospace;text-align:center;color:#eee;}\
#wam-grid{display:inline-grid;grid-template-columns:repeat(3,96px);gap:10px;margin-top:12px;}\
.wam-cell{width:96px;height:96px;border-radius:50%;border:3px solid #3b2a14;background:#6b4f2a;cursor:pointer;}\
.wam-cell.mole{background:#c98b3a;box-shadow:0 0 14px #ffd166;}\
#wam-start{font-size:18px;padding:8px 18px;margin-top:12px;cursor:pointer;}";

/// Mounts the game under `<body>`. A second call while mounted is ignored.
pub fn mount(config: GameConfig) -> Result<(), GameError> {
    config.validate()?;
    crate::logging::init(config.tracing_level()?);
    if GAME.with(|cell| cell.borrow().is_some()) {
        warn!("start_game called twice; keeping the mounted game");
        return Ok(());
    }

    let win = window().ok_or(GameError::NoWindow)?;
    let doc = win.document().ok_or(GameError::NoDocument)?;
    let view = View::build(&doc)?;

    let store = LocalStorageStore::new(&win, &config.storage_key);
    let scheduler = IntervalScheduler::new(win.clone(), dispatch_timer);
    let picker = RandomCells::from_entropy()?;
    let mut game = RoundController::new(config, scheduler, store, picker);

    let renderer = view.clone();
    game.subscribe(move |event| match event {
        GameEvent::Changed(snapshot) => renderer.render(snapshot),
        GameEvent::RoundEnded(summary) => {
            let msg = format!("Time's up! Final Score: {}", summary.final_score);
            if let Err(err) = win.alert_with_message(&msg) {
                warn!(error = ?err, "round-end alert failed");
            }
        }
    });
    view.render(&game.snapshot());
    info!(high_score = game.high_score(), "whack-a-mole mounted");

    GAME.with(|cell| install(cell, game, || view.bind(), || view.unmount()))
}

/// Stores `game` only once `wire` succeeds; on failure `undo` runs and the
/// slot stays empty so a later mount can retry.
fn install<T>(
    slot: &RefCell<Option<T>>,
    game: T,
    wire: impl FnOnce() -> Result<(), GameError>,
    undo: impl FnOnce(),
) -> Result<(), GameError> {
    if let Err(err) = wire() {
        undo();
        return Err(err);
    }
    slot.replace(Some(game));
    Ok(())
}

/// Runs `f` against the mounted game for the duration of one event.
pub(crate) fn with_game<R>(f: impl FnOnce(&mut WebController) -> R) -> Result<R, GameError> {
    GAME.with(|cell| {
        let mut guard = cell.try_borrow_mut().map_err(|_| GameError::Busy)?;
        let game = guard.as_mut().ok_or(GameError::NotMounted)?;
        game.scheduler_mut().collect_retired();
        Ok(f(game))
    })
}

fn dispatch_timer(kind: TimerKind) {
    if let Err(err) = with_game(|game| game.on_timer(kind)) {
        warn!(?kind, %err, "timer dispatch skipped");
    }
}

// --- DOM --------------------------------------------------------------------

#[derive(Clone)]
struct View {
    root: Element,
    score: Element,
    high_score: Element,
    time_left: Element,
    start: Element,
    grid: Element,
    cells: Vec<Element>,
}

impl View {
    fn build(doc: &Document) -> Result<Self, GameError> {
        let body = doc.body().ok_or(GameError::NoBody)?;

        let root = doc.create_element("div")?;
        root.set_id("wam-root");
        body.append_child(&root)?;

        let style = doc.create_element("style")?;
        style.set_text_content(Some(STYLE));
        root.append_child(&style)?;

        let title = doc.create_element("h1")?;
        title.set_text_content(Some("Whack-a-Mole"));
        root.append_child(&title)?;

        let score = child(doc, &root, "p", "wam-score")?;
        let high_score = child(doc, &root, "p", "wam-high-score")?;
        let time_left = child(doc, &root, "p", "wam-time-left")?;

        let start = child(doc, &root, "button", "wam-start")?;
        start.set_text_content(Some("Start Game"));

        let grid = child(doc, &root, "div", "wam-grid")?;
        let mut cells = Vec::with_capacity(GRID_CELLS);
        for i in 0..GRID_CELLS {
            let cell = child(doc, &grid, "button", &format!("wam-cell-{i}"))?;
            cell.set_class_name("wam-cell");
            cell.set_attribute("aria-label", &format!("cell {}", i + 1))?;
            cells.push(cell);
        }

        Ok(Self {
            root,
            score,
            high_score,
            time_left,
            start,
            grid,
            cells,
        })
    }

    fn bind(&self) -> Result<(), GameError> {
        {
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                if let Err(err) = with_game(|game| game.start_round()) {
                    warn!(%err, "start ignored");
                }
            }) as Box<dyn FnMut(_)>);
            self.start
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        for (index, cell) in self.cells.iter().enumerate() {
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                if let Err(err) = with_game(|game| game.on_cell_clicked(index)) {
                    warn!(index, %err, "click ignored");
                }
            }) as Box<dyn FnMut(_)>);
            cell.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn unmount(&self) {
        self.root.remove();
    }

    fn render(&self, snap: &RoundSnapshot) {
        self.score
            .set_text_content(Some(&format!("Score: {}", snap.score)));
        self.high_score
            .set_text_content(Some(&format!("High Score: {}", snap.high_score)));
        self.time_left
            .set_text_content(Some(&format!("Time Left: {}s", snap.seconds_remaining)));

        // start button while idle, grid while running
        set_hidden(&self.start, snap.is_running);
        set_hidden(&self.grid, !snap.is_running);

        for (cell, lit) in self.cells.iter().zip(snap.grid) {
            cell.set_class_name(if lit { "wam-cell mole" } else { "wam-cell" });
        }
    }
}

fn child(doc: &Document, parent: &Element, tag: &str, id: &str) -> Result<Element, GameError> {
    let el = doc.create_element(tag)?;
    el.set_id(id);
    parent.append_child(&el)?;
    Ok(el)
}

fn set_hidden(el: &Element, hidden: bool) {
    let result = if hidden {
        el.set_attribute("hidden", "")
    } else {
        el.remove_attribute("hidden")
    };
    if let Err(err) = result {
        warn!(id = %el.id(), hidden, error = ?err, "could not toggle visibility");
    }
}
