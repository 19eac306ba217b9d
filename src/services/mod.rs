//! Cross-thread services and process-level setup
//!
//! This module contains the code that crosses thread boundaries or touches
//! the process environment (logging).

#[cfg(feature = "runtime")]
pub mod tracing_setup;
pub mod ui_queue;
