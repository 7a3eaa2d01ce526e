//! Utility modules.

/// Date/time serialization helpers for API timestamps.
pub mod datetime;

/// Log sanitization utilities to keep key material out of logs.
pub mod log_sanitizer;
