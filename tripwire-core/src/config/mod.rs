//! Configuration types
//!
//! Monitor configuration, its JSON document form, and its postcard binary
//! form for flash persistence.

pub mod document;
pub mod types;

pub use document::{decode, encode, DecodeError};
pub use types::*;
