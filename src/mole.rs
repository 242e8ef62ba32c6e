//! Mole placement and highlight pacing.
//!
//! The scheduler owns the grid and the mole timer slot. It picks a uniformly
//! random cell on every tick (repeats allowed) and re-arms its timer whenever
//! the score changes, following [`MolePace`].

use crate::config::MolePace;
use crate::error::GameError;
use crate::grid::{GRID_CELLS, Grid};
use crate::timer::{PeriodicTask, Scheduler, TimerKind};

/// Source of cell indices. `pick(n)` must return a value in `0..n`.
pub trait CellPicker {
    fn pick(&mut self, cells: usize) -> usize;
}

/// xorshift64* generator with rejection sampling so every cell is equally likely.
#[derive(Clone, Debug)]
pub struct RandomCells {
    state: u64,
}

impl RandomCells {
    pub fn seeded(seed: u64) -> Self {
        // xorshift has a fixed point at zero
        let state = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        Self { state }
    }

    /// Seeds from the platform entropy source (`crypto.getRandomValues` in the browser).
    pub fn from_entropy() -> Result<Self, GameError> {
        let mut seed = [0u8; 8];
        getrandom::getrandom(&mut seed).map_err(GameError::Entropy)?;
        Ok(Self::seeded(u64::from_le_bytes(seed)))
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}

impl CellPicker for RandomCells {
    fn pick(&mut self, cells: usize) -> usize {
        if cells == 0 {
            return 0;
        }
        let n = cells as u64;
        let zone = u64::MAX - (u64::MAX % n);
        loop {
            let v = self.next_u64();
            if v < zone {
                return (v % n) as usize;
            }
        }
    }
}

pub struct MoleScheduler<P, H> {
    picker: P,
    pace: MolePace,
    grid: Grid,
    task: PeriodicTask<H>,
}

impl<P: CellPicker, H> MoleScheduler<P, H> {
    pub fn new(picker: P, pace: MolePace) -> Self {
        Self {
            picker,
            pace,
            grid: Grid::default(),
            task: PeriodicTask::new(TimerKind::Mole),
        }
    }

    /// Highlights a cell right away, then arms the timer at the pace for `initial_score`.
    pub fn start<S>(&mut self, scheduler: &mut S, initial_score: u32)
    where
        S: Scheduler<Handle = H>,
    {
        self.tick();
        self.task.rearm(scheduler, self.pace.period_for(initial_score));
    }

    pub fn tick(&mut self) {
        let cell = self.picker.pick(GRID_CELLS);
        self.grid.highlight(cell);
    }

    /// Re-arms the timer with the period for `score`. The active cell is kept;
    /// only the timer phase restarts.
    pub fn set_score<S>(&mut self, scheduler: &mut S, score: u32)
    where
        S: Scheduler<Handle = H>,
    {
        self.task.rearm(scheduler, self.pace.period_for(score));
    }

    /// Cancels the timer. The grid is left as is.
    pub fn stop<S>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<Handle = H>,
    {
        self.task.cancel(scheduler);
    }

    pub fn clear(&mut self) {
        self.grid.clear();
    }

    pub fn active_cell(&self) -> Option<usize> {
        self.grid.active()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current period, or `None` while stopped.
    pub fn period_ms(&self) -> Option<u32> {
        self.task.period_ms()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_armed()
    }
}
