//! Shared utilities for bucket-census CLI binaries.
//!
//! Logging setup, the log-level argument, and the value formatting used
//! when rendering reports.

pub mod args;
pub mod format;
pub mod logging;

pub use args::LogLevel;
pub use format::{format_bytes, format_number, format_timestamp};
pub use logging::init_logging;
