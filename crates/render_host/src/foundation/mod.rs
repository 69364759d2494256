//! Foundation utilities
//!
//! Math type aliases, frame timing, and logging setup shared by the rest of
//! the crate.

pub mod logging;
pub mod math;
pub mod time;
