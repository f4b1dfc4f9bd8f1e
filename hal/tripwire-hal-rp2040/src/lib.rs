//! RP2040-specific HAL for the Tripwire input monitor
//!
//! This crate provides RP2040-specific implementations of the shared
//! `tripwire-hal` and `tripwire-core` traits:
//!
//! - Dynamic pin allocation for config-driven setup
//! - Interrupt arming (implements `tripwire_core::traits::InterruptInput`)
//! - Monotonic and wall clocks backed by the embassy time driver
//! - Flash storage driver (implements `tripwire_hal::FlashStorage`)

#![no_std]

pub mod clock;
pub mod flash;
pub mod input;
pub mod pins;
