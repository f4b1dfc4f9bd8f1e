//! Periodic task trait
//!
//! A periodic task is driven by an external scheduler that tracks the time
//! since the task last ran and calls [`PeriodicTask::run_task`] on its own
//! cadence. The task decides whether enough time has passed.

use crate::config::TaskConfig;

/// Result of a single `run_task` call
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskOutcome<R> {
    /// Task disabled, nothing done
    Disabled,
    /// Period has not elapsed yet
    NotDue,
    /// Ran, nothing to report
    Idle,
    /// Ran and produced a report
    Reported(R),
}

impl<R> TaskOutcome<R> {
    /// True if the task actually ran (the scheduler should reset its timer)
    pub fn ran(&self) -> bool {
        matches!(self, TaskOutcome::Idle | TaskOutcome::Reported(_))
    }

    /// Take the report, if any
    pub fn report(self) -> Option<R> {
        match self {
            TaskOutcome::Reported(r) => Some(r),
            _ => None,
        }
    }
}

/// Cooperatively scheduled periodic task
pub trait PeriodicTask {
    /// Report type produced when the task has something to say
    type Report;

    /// Scheduling identity and cadence
    fn task_config(&self) -> &TaskConfig;

    /// Start or stop invocation
    fn enable_task(&mut self, enabled: bool);

    /// Run one cycle
    ///
    /// # Arguments
    /// - `elapsed_ms`: Time since the task last ran
    fn run_task(&mut self, elapsed_ms: u32) -> TaskOutcome<Self::Report>;

    /// Check if the task is enabled
    fn is_enabled(&self) -> bool {
        self.task_config().enabled
    }

    /// Check if `elapsed_ms` reaches the configured period
    fn is_due(&self, elapsed_ms: u32) -> bool {
        elapsed_ms >= self.task_config().period_ms
    }
}
