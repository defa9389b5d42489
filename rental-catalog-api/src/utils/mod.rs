//! Utility modules.

/// Log truncation so large response bodies stay readable in debug output.
pub mod log_sanitizer;
