//! Utility functions for string formatting and comparison.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{contains_ignore_case, format_clock, format_user_count, locale_cmp, truncate};
