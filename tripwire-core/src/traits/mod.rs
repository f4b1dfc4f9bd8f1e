//! Collaborator traits
//!
//! These traits define the interface between the monitor logic and the
//! board, clock, and scheduler implementations it runs on.

pub mod input;
pub mod task;
pub mod time;

pub use input::{InputError, InterruptInput};
pub use task::{PeriodicTask, TaskOutcome};
pub use time::{EpochSource, MonotonicClock};
