//! Round lifecycle: Idle -> Running -> Idle.
//!
//! [`RoundController`] owns score, countdown and the mole scheduler. Every
//! transition emits a [`GameEvent::Changed`] snapshot to subscribers; the end
//! of a round additionally emits [`GameEvent::RoundEnded`].

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::grid::GRID_CELLS;
use crate::mole::{CellPicker, MoleScheduler};
use crate::score::HighScoreStore;
use crate::timer::{ManualScheduler, PeriodicTask, Scheduler, TimerKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Phase {
    Idle,
    Running,
}

/// Read-only view of the game handed to the rendering layer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoundSnapshot {
    pub is_running: bool,
    pub score: u32,
    pub high_score: u32,
    pub seconds_remaining: u32,
    pub active_cell: Option<usize>,
    pub grid: [bool; GRID_CELLS],
    pub mole_period_ms: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoundSummary {
    pub final_score: u32,
    pub high_score: u32,
    pub new_record: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Changed(RoundSnapshot),
    RoundEnded(RoundSummary),
}

pub type Listener = Box<dyn FnMut(&GameEvent)>;

pub struct RoundController<S: Scheduler, H, P> {
    config: GameConfig,
    scheduler: S,
    store: H,
    mole: MoleScheduler<P, S::Handle>,
    countdown: PeriodicTask<S::Handle>,
    phase: Phase,
    score: u32,
    seconds_remaining: u32,
    high_score: u32,
    listeners: Vec<Listener>,
}

impl<S, H, P> RoundController<S, H, P>
where
    S: Scheduler,
    H: HighScoreStore,
    P: CellPicker,
{
    /// Builds an idle controller. The high score is read from `store` once here.
    pub fn new(config: GameConfig, scheduler: S, store: H, picker: P) -> Self {
        let high_score = store.load();
        let mole = MoleScheduler::new(picker, config.pace);
        Self {
            seconds_remaining: config.round_length_secs,
            config,
            scheduler,
            store,
            mole,
            countdown: PeriodicTask::new(TimerKind::Countdown),
            phase: Phase::Idle,
            score: 0,
            high_score,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Starts (or restarts) a round from a clean slate.
    pub fn start_round(&mut self) {
        self.stop_timers();
        self.phase = Phase::Running;
        self.score = 0;
        self.seconds_remaining = self.config.round_length_secs;
        self.countdown
            .rearm(&mut self.scheduler, self.config.countdown_period_ms);
        self.mole.start(&mut self.scheduler, self.score);
        info!(
            round_length_secs = self.seconds_remaining,
            high_score = self.high_score,
            "round started"
        );
        self.emit_snapshot();
    }

    /// Returns whether the click scored. Wrong cells, out-of-range indices and
    /// clicks while idle are ignored.
    pub fn on_cell_clicked(&mut self, index: usize) -> bool {
        if self.phase != Phase::Running || self.mole.active_cell() != Some(index) {
            debug!(index, running = self.is_running(), "click ignored");
            return false;
        }
        self.score += 1;
        self.mole.set_score(&mut self.scheduler, self.score);
        if self.config.rehighlight_on_score {
            self.mole.tick();
        }
        debug!(score = self.score, period_ms = ?self.mole.period_ms(), "hit");
        self.emit_snapshot();
        true
    }

    pub fn on_countdown_tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.end_round();
        } else {
            self.emit_snapshot();
        }
    }

    pub fn on_mole_tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.mole.tick();
        self.emit_snapshot();
    }

    /// Routes a fired timer to its handler.
    pub fn on_timer(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Countdown => self.on_countdown_tick(),
            TimerKind::Mole => self.on_mole_tick(),
        }
    }

    /// Stops the round, records the high score and notifies subscribers.
    /// Returns `None` when no round was running.
    pub fn end_round(&mut self) -> Option<RoundSummary> {
        if self.phase != Phase::Running {
            return None;
        }
        self.phase = Phase::Idle;
        self.stop_timers();
        self.mole.clear();

        let stored = self.store.load();
        let new_record = self.score > stored;
        if new_record {
            self.store.save(self.score);
            info!(previous = stored, high_score = self.score, "new high score");
        }
        self.high_score = stored.max(self.score);

        let summary = RoundSummary {
            final_score: self.score,
            high_score: self.high_score,
            new_record,
        };
        info!(final_score = summary.final_score, "round ended");
        self.emit_snapshot();
        self.emit(GameEvent::RoundEnded(summary));
        Some(summary)
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let running = self.is_running();
        RoundSnapshot {
            is_running: running,
            score: self.score,
            high_score: self.high_score,
            seconds_remaining: self.seconds_remaining,
            active_cell: if running { self.mole.active_cell() } else { None },
            grid: if running { self.mole.grid().cells() } else { [false; GRID_CELLS] },
            mole_period_ms: self.mole.period_ms(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn active_cell(&self) -> Option<usize> {
        self.mole.active_cell()
    }

    pub fn store(&self) -> &H {
        &self.store
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn stop_timers(&mut self) {
        self.countdown.cancel(&mut self.scheduler);
        self.mole.stop(&mut self.scheduler);
    }

    fn emit_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.emit(GameEvent::Changed(snapshot));
    }

    fn emit(&mut self, event: GameEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl<H, P> RoundController<ManualScheduler, H, P>
where
    H: HighScoreStore,
    P: CellPicker,
{
    /// Moves the virtual clock forward by `ms`, delivering every timer that
    /// falls due on the way.
    pub fn advance(&mut self, ms: u64) {
        let deadline = self.scheduler.now_ms() + ms;
        while let Some(kind) = self.scheduler.next_fire(deadline) {
            self.on_timer(kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Fixed(usize);

    impl CellPicker for Fixed {
        fn pick(&mut self, _cells: usize) -> usize {
            self.0
        }
    }

    fn controller(store: MemoryStore) -> RoundController<ManualScheduler, MemoryStore, Fixed> {
        RoundController::new(GameConfig::default(), ManualScheduler::new(), store, Fixed(3))
    }

    #[test]
    fn starts_idle_with_stored_high_score() {
        let ctl = controller(MemoryStore::with_raw("12"));
        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(ctl.high_score(), 12);
        assert_eq!(ctl.seconds_remaining(), 30);
        assert_eq!(ctl.snapshot().grid, [false; GRID_CELLS]);
    }

    #[test]
    fn start_arms_both_timers() {
        let mut ctl = controller(MemoryStore::new());
        ctl.start_round();
        assert!(ctl.is_running());
        assert_eq!(ctl.scheduler().armed(TimerKind::Countdown), 1);
        assert_eq!(ctl.scheduler().armed(TimerKind::Mole), 1);
        assert_eq!(ctl.active_cell(), Some(3));
    }

    #[test]
    fn restart_does_not_duplicate_timers() {
        let mut ctl = controller(MemoryStore::new());
        ctl.start_round();
        ctl.on_cell_clicked(3);
        ctl.start_round();
        assert_eq!(ctl.score(), 0);
        assert_eq!(ctl.scheduler().armed(TimerKind::Countdown), 1);
        assert_eq!(ctl.scheduler().armed(TimerKind::Mole), 1);
        assert_eq!(ctl.scheduler().period_of(TimerKind::Mole), Some(1000));
    }

    #[test]
    fn hit_rearms_mole_with_faster_period() {
        let mut ctl = controller(MemoryStore::new());
        ctl.start_round();
        assert!(ctl.on_cell_clicked(3));
        assert!(ctl.on_cell_clicked(3));
        assert_eq!(ctl.score(), 2);
        assert_eq!(ctl.scheduler().period_of(TimerKind::Mole), Some(900));
        assert_eq!(ctl.scheduler().armed(TimerKind::Mole), 1);
    }

    #[test]
    fn ignored_clicks() {
        let mut ctl = controller(MemoryStore::new());
        assert!(!ctl.on_cell_clicked(3));
        ctl.start_round();
        assert!(!ctl.on_cell_clicked(0));
        assert!(!ctl.on_cell_clicked(99));
        assert_eq!(ctl.score(), 0);
    }

    #[test]
    fn end_round_while_idle_is_noop() {
        let mut ctl = controller(MemoryStore::new());
        assert_eq!(ctl.end_round(), None);
        assert_eq!(ctl.store().writes(), 0);
    }

    #[test]
    fn end_round_clears_grid_and_stops_timers() {
        let mut ctl = controller(MemoryStore::new());
        ctl.start_round();
        ctl.on_cell_clicked(3);
        let summary = ctl.end_round().expect("round was running");
        assert_eq!(summary, RoundSummary { final_score: 1, high_score: 1, new_record: true });
        assert_eq!(ctl.scheduler().armed(TimerKind::Countdown), 0);
        assert_eq!(ctl.scheduler().armed(TimerKind::Mole), 0);
        assert_eq!(ctl.active_cell(), None);
        assert!(!ctl.snapshot().is_running);
    }

    #[test]
    fn listeners_see_snapshots_and_round_end() {
        let events: Rc<RefCell<Vec<GameEvent>>> = Rc::default();
        let sink = events.clone();
        let mut ctl = controller(MemoryStore::new());
        ctl.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        ctl.start_round();
        ctl.on_cell_clicked(3);
        ctl.end_round();

        let events = events.borrow();
        assert!(matches!(events[0], GameEvent::Changed(ref s) if s.is_running && s.score == 0));
        assert!(matches!(events[1], GameEvent::Changed(ref s) if s.score == 1));
        assert!(matches!(events[2], GameEvent::Changed(ref s) if !s.is_running));
        assert_eq!(
            events[3],
            GameEvent::RoundEnded(RoundSummary { final_score: 1, high_score: 1, new_record: true })
        );
    }

    struct Seq(usize);

    impl CellPicker for Seq {
        fn pick(&mut self, cells: usize) -> usize {
            self.0 = (self.0 + 1) % cells;
            self.0
        }
    }

    #[test]
    fn hit_moves_mole_by_default() {
        let mut ctl = RoundController::new(
            GameConfig::default(),
            ManualScheduler::new(),
            MemoryStore::new(),
            Seq(0),
        );
        ctl.start_round();
        assert_eq!(ctl.active_cell(), Some(1));
        assert!(ctl.on_cell_clicked(1));
        assert_eq!(ctl.active_cell(), Some(2));
        assert!(!ctl.on_cell_clicked(1));
        assert_eq!(ctl.score(), 1);
    }

    #[test]
    fn hit_keeps_mole_when_rehighlight_is_off() {
        let config = GameConfig { rehighlight_on_score: false, ..GameConfig::default() };
        let mut ctl =
            RoundController::new(config, ManualScheduler::new(), MemoryStore::new(), Seq(0));
        ctl.start_round();
        assert!(ctl.on_cell_clicked(1));
        assert_eq!(ctl.active_cell(), Some(1));
        assert_eq!(ctl.scheduler().period_of(TimerKind::Mole), Some(950));
    }
}
