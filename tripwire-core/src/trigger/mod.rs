//! Interrupt-to-task handoff
//!
//! Latches the first matching edge from interrupt context and hands it to
//! the polling task as a wall-clock report.

pub mod report;
pub mod state;

pub use report::TriggerReport;
pub use state::{Baseline, TriggerSnapshot, TriggerState};
