//! Maps raw identity-provider failures onto a fixed set of user-facing
//! error categories.
//!
//! DESIGN
//! ======
//! Matching is first-match-wins over an ordered table of case-insensitive
//! substring patterns. Order matters: some raw messages could match more than
//! one pattern (an "invalid ... email ..." message must not be claimed by a
//! later row), so the table is data, not a set. Unmatched messages fall
//! through to [`ErrorCategory::Unknown`] with the raw text preserved
//! verbatim, never replaced with a generic string while the original exists.

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;

use super::provider::ProviderError;

/// Stable category assigned to every provider failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    DuplicateAccount,
    InvalidCredentials,
    UnconfirmedEmail,
    WeakPassword,
    InvalidEmail,
    RateLimited,
    ExpiredLink,
    AccountNotFound,
    Unknown,
}

/// A provider failure after normalization; `message` is user-presentable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CategorizedError {
    pub category: ErrorCategory,
    pub message: String,
}

/// Ordered (pattern, category, friendly message) rows. First match wins.
const PATTERNS: &[(&str, ErrorCategory, &str)] = &[
    (
        "User already registered",
        ErrorCategory::DuplicateAccount,
        "This email is already registered. Please login instead.",
    ),
    (
        "Invalid login credentials",
        ErrorCategory::InvalidCredentials,
        "Invalid email or password.",
    ),
    (
        "Email not confirmed",
        ErrorCategory::UnconfirmedEmail,
        "Please confirm your email before logging in.",
    ),
    (
        "Password should be at least 6 characters",
        ErrorCategory::WeakPassword,
        "Password must be at least 6 characters.",
    ),
    (
        "Invalid email",
        ErrorCategory::InvalidEmail,
        "Please enter a valid email address.",
    ),
    (
        "Email rate limit exceeded",
        ErrorCategory::RateLimited,
        "Too many attempts. Please try again later.",
    ),
    (
        "Email link is invalid or has expired",
        ErrorCategory::ExpiredLink,
        "The email link is invalid or has expired. Please request a new one.",
    ),
    (
        "Password is too weak",
        ErrorCategory::WeakPassword,
        "Password is too weak. Please choose a stronger password.",
    ),
    (
        "User not found",
        ErrorCategory::AccountNotFound,
        "Account not found. Please check your email or register.",
    ),
];

/// Normalize a raw provider error into a [`CategorizedError`].
///
/// Network-level failures are not specially categorized; they surface as
/// [`ErrorCategory::Unknown`] with the underlying message preserved.
#[must_use]
pub fn normalize(raw: &ProviderError) -> CategorizedError {
    match raw {
        ProviderError::Rejected { message, .. } => normalize_message(message),
        other => CategorizedError {
            category: ErrorCategory::Unknown,
            message: other.to_string(),
        },
    }
}

/// Normalize a raw provider failure message. First pattern whose text is a
/// case-insensitive substring of `raw` wins.
#[must_use]
pub fn normalize_message(raw: &str) -> CategorizedError {
    let haystack = raw.to_lowercase();
    for (pattern, category, friendly) in PATTERNS {
        if haystack.contains(&pattern.to_lowercase()) {
            return CategorizedError {
                category: *category,
                message: (*friendly).to_owned(),
            };
        }
    }
    CategorizedError {
        category: ErrorCategory::Unknown,
        message: if raw.is_empty() {
            "An unexpected error occurred. Please try again.".to_owned()
        } else {
            raw.to_owned()
        },
    }
}
