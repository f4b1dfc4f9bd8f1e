//! Tripwire Hardware Abstraction Layer
//!
//! Storage traits that chip-specific HALs implement, and the configuration
//! store built on them, so configuration is persisted the same way on
//! every board.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (tripwire-firmware)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tripwire-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ tripwire-hal- │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`flash::FlashStorage`] - Persistent key-value storage
//!
//! [`config::ConfigStore`] loads and saves the input configuration through
//! any [`FlashStorage`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod flash;

// Re-export key traits at crate root for convenience
pub use config::{ConfigError, ConfigSource, ConfigStore};
pub use flash::{FlashError, FlashStorage, StorageKey};
