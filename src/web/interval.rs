use std::collections::HashMap;

use tracing::error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::timer::{Scheduler, TimerKind};

#[derive(Debug)]
pub struct IntervalHandle(Option<i32>);

/// `setInterval`-backed scheduler. Each firing calls `dispatch(kind)`, which
/// re-enters the game through its thread-local cell.
pub struct IntervalScheduler {
    window: Window,
    dispatch: fn(TimerKind),
    live: HashMap<i32, Closure<dyn FnMut()>>,
    // A closure cancelled from inside its own callback must outlive that call.
    retired: Vec<Closure<dyn FnMut()>>,
}

impl IntervalScheduler {
    pub fn new(window: Window, dispatch: fn(TimerKind)) -> Self {
        Self {
            window,
            dispatch,
            live: HashMap::new(),
            retired: Vec::new(),
        }
    }

    /// Drops closures of cancelled intervals. Call at the start of an event,
    /// before any timer can be cancelled from the current stack.
    pub fn collect_retired(&mut self) {
        self.retired.clear();
    }
}

impl Scheduler for IntervalScheduler {
    type Handle = IntervalHandle;

    fn arm(&mut self, kind: TimerKind, period_ms: u32) -> IntervalHandle {
        let dispatch = self.dispatch;
        let closure = Closure::wrap(Box::new(move || dispatch(kind)) as Box<dyn FnMut()>);
        let timeout = i32::try_from(period_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                timeout,
            ) {
            Ok(id) => {
                self.live.insert(id, closure);
                IntervalHandle(Some(id))
            }
            Err(err) => {
                error!(?kind, error = ?err, "setInterval failed");
                IntervalHandle(None)
            }
        }
    }

    fn cancel(&mut self, handle: IntervalHandle) {
        let Some(id) = handle.0 else {
            return;
        };
        self.window.clear_interval_with_handle(id);
        if let Some(closure) = self.live.remove(&id) {
            self.retired.push(closure);
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        for id in self.live.keys() {
            self.window.clear_interval_with_handle(*id);
        }
    }
}
