//! Cancellable periodic tasks.
//!
//! A [`Scheduler`] arms repeating timers tagged with a [`TimerKind`]; the host
//! routes each firing back to the controller via `on_timer(kind)`.
//! [`PeriodicTask`] wraps one timer slot so that cancelling is idempotent and
//! re-arming always cancels first: at most one live timer per slot.
//!
//! [`ManualScheduler`] is a virtual clock for native hosts and tests. The
//! browser build uses `web::IntervalScheduler` (`setInterval`).

use std::collections::BTreeMap;

/// Which periodic task a timer drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Countdown,
    Mole,
}

pub trait Scheduler {
    type Handle;

    /// Arms a timer that fires `kind` every `period_ms` until cancelled.
    fn arm(&mut self, kind: TimerKind, period_ms: u32) -> Self::Handle;

    fn cancel(&mut self, handle: Self::Handle);
}

/// One timer slot.
#[derive(Debug)]
pub struct PeriodicTask<H> {
    kind: TimerKind,
    live: Option<(H, u32)>,
}

impl<H> PeriodicTask<H> {
    pub fn new(kind: TimerKind) -> Self {
        Self { kind, live: None }
    }

    /// Cancels the current timer (if any) and arms a fresh one.
    pub fn rearm<S>(&mut self, scheduler: &mut S, period_ms: u32)
    where
        S: Scheduler<Handle = H>,
    {
        self.cancel(scheduler);
        let handle = scheduler.arm(self.kind, period_ms);
        self.live = Some((handle, period_ms));
    }

    /// No-op when already stopped.
    pub fn cancel<S>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<Handle = H>,
    {
        if let Some((handle, _)) = self.live.take() {
            scheduler.cancel(handle);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.live.is_some()
    }

    pub fn period_ms(&self) -> Option<u32> {
        self.live.as_ref().map(|(_, period)| *period)
    }
}

// --- Virtual clock ----------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
pub struct ManualHandle(u64);

#[derive(Debug)]
struct ManualTimer {
    kind: TimerKind,
    period_ms: u32,
    next_due_ms: u64,
}

/// Deterministic scheduler: time only moves when [`ManualScheduler::next_fire`]
/// is asked to move it.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_id: u64,
    timers: BTreeMap<u64, ManualTimer>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Live timers of the given kind.
    pub fn armed(&self, kind: TimerKind) -> usize {
        self.timers.values().filter(|t| t.kind == kind).count()
    }

    pub fn period_of(&self, kind: TimerKind) -> Option<u32> {
        self.timers
            .values()
            .find(|t| t.kind == kind)
            .map(|t| t.period_ms)
    }

    /// Fires the earliest timer due at or before `deadline_ms`, moving the clock
    /// to its due time and scheduling its next repetition. When nothing is due
    /// the clock moves to `deadline_ms` and `None` is returned. Timers due at
    /// the same instant fire in the order they were armed.
    pub fn next_fire(&mut self, deadline_ms: u64) -> Option<TimerKind> {
        let due = self
            .timers
            .iter()
            .min_by_key(|(id, t)| (t.next_due_ms, **id))
            .filter(|(_, t)| t.next_due_ms <= deadline_ms)
            .map(|(id, _)| *id);
        match due.and_then(|id| self.timers.get_mut(&id)) {
            Some(timer) => {
                self.now_ms = timer.next_due_ms;
                timer.next_due_ms += u64::from(timer.period_ms);
                Some(timer.kind)
            }
            None => {
                self.now_ms = self.now_ms.max(deadline_ms);
                None
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn arm(&mut self, kind: TimerKind, period_ms: u32) -> ManualHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.timers.insert(
            id,
            ManualTimer {
                kind,
                period_ms: period_ms.max(1),
                next_due_ms: self.now_ms + u64::from(period_ms.max(1)),
            },
        );
        ManualHandle(id)
    }

    fn cancel(&mut self, handle: ManualHandle) {
        self.timers.remove(&handle.0);
    }
}
