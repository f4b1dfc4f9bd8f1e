//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! [`crate::channels`].

pub mod edge;
pub mod poll;

pub use edge::edge_task;
pub use poll::poll_task;
