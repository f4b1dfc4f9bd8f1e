//! Periodic task timing
//!
//! The scheduler side of [`PeriodicTask`]: accumulates tick deltas and
//! hands the task the time since it last actually ran.

use crate::traits::{PeriodicTask, TaskOutcome};

/// Time since a periodic task last ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskTimer {
    since_last_run_ms: u32,
}

impl TaskTimer {
    /// Create a timer that has just run
    pub const fn new() -> Self {
        Self {
            since_last_run_ms: 0,
        }
    }

    /// Add elapsed time, returning the total since the last run
    pub fn advance(&mut self, delta_ms: u32) -> u32 {
        self.since_last_run_ms = self.since_last_run_ms.saturating_add(delta_ms);
        self.since_last_run_ms
    }

    /// Time since the last run (ms)
    pub fn elapsed_ms(&self) -> u32 {
        self.since_last_run_ms
    }

    /// Reset after the task ran
    pub fn mark_run(&mut self) {
        self.since_last_run_ms = 0;
    }

    /// Advance by `delta_ms` and run `task` if it is enabled
    ///
    /// The timer resets only when the task actually ran, so a task that is
    /// not yet due sees the accumulated time on the next tick.
    pub fn tick<T: PeriodicTask>(&mut self, task: &mut T, delta_ms: u32) -> TaskOutcome<T::Report> {
        if !task.is_enabled() {
            self.mark_run();
            return TaskOutcome::Disabled;
        }

        let elapsed = self.advance(delta_ms);
        let outcome = task.run_task(elapsed);
        if outcome.ran() {
            self.mark_run();
        }
        outcome
    }
}
