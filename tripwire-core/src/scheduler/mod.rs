//! Periodic task scheduling
//!
//! Drives [`PeriodicTask`](crate::traits::PeriodicTask) implementations
//! from a fixed tick.

pub mod timer;

pub use timer::TaskTimer;
