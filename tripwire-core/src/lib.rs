//! Board-agnostic core logic for the Tripwire input monitor
//!
//! This crate contains all logic that does not depend on specific
//! hardware implementations:
//!
//! - Trigger state shared between interrupt and task context
//! - The input monitor (poll/report cycle, startup time sync)
//! - Configuration types and their JSON / postcard forms
//! - Collaborator traits (pins, clocks, periodic tasks)
//! - Periodic task timing

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod monitor;
pub mod scheduler;
pub mod traits;
pub mod trigger;

pub use monitor::{InputMonitor, MonitorError, TimeSyncPolicy};
pub use trigger::{TriggerReport, TriggerState};
