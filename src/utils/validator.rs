//! # Text Input Validation Utilities
//!
//! Regex patterns used by the `validator` derives on request payloads.

use std::sync::LazyLock;

use regex::Regex;

/// Email validation pattern
///
/// Accepts any syntactically plausible address; the marketplace does not
/// restrict signup to particular domains.
pub static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("Failed to compile email regex")
});
