use super::*;

// =============================================================
// Table mappings
// =============================================================

#[test]
fn duplicate_account_maps_to_friendly_message() {
    let err = normalize_message("User already registered");
    assert_eq!(err.category, ErrorCategory::DuplicateAccount);
    assert_eq!(err.message, "This email is already registered. Please login instead.");
}

#[test]
fn matching_is_case_insensitive_substring() {
    let err = normalize_message("signup failed: USER ALREADY REGISTERED (code 422)");
    assert_eq!(err.category, ErrorCategory::DuplicateAccount);
}

#[test]
fn invalid_credentials_maps() {
    let err = normalize_message("Invalid login credentials");
    assert_eq!(err.category, ErrorCategory::InvalidCredentials);
    assert_eq!(err.message, "Invalid email or password.");
}

#[test]
fn unconfirmed_email_maps() {
    let err = normalize_message("Email not confirmed");
    assert_eq!(err.category, ErrorCategory::UnconfirmedEmail);
}

#[test]
fn short_password_maps_to_weak_password() {
    let err = normalize_message("Password should be at least 6 characters");
    assert_eq!(err.category, ErrorCategory::WeakPassword);
    assert_eq!(err.message, "Password must be at least 6 characters.");
}

#[test]
fn weak_password_variant_keeps_its_own_message() {
    let err = normalize_message("Password is too weak");
    assert_eq!(err.category, ErrorCategory::WeakPassword);
    assert_eq!(err.message, "Password is too weak. Please choose a stronger password.");
}

#[test]
fn rate_limit_maps() {
    let err = normalize_message("Email rate limit exceeded");
    assert_eq!(err.category, ErrorCategory::RateLimited);
}

#[test]
fn expired_link_maps() {
    let err = normalize_message("Email link is invalid or has expired");
    assert_eq!(err.category, ErrorCategory::ExpiredLink);
}

#[test]
fn unknown_user_maps_to_account_not_found() {
    let err = normalize_message("User not found");
    assert_eq!(err.category, ErrorCategory::AccountNotFound);
}

// =============================================================
// Ordering and fallthrough
// =============================================================

#[test]
fn first_match_wins_when_two_patterns_apply() {
    // Matches both "Invalid email" and "Email rate limit exceeded";
    // the earlier table row must claim it.
    let err = normalize_message("Invalid email: Email rate limit exceeded");
    assert_eq!(err.category, ErrorCategory::InvalidEmail);
    assert_eq!(err.message, "Please enter a valid email address.");
}

#[test]
fn unmatched_message_is_preserved_verbatim() {
    let err = normalize_message("disk on fire");
    assert_eq!(err.category, ErrorCategory::Unknown);
    assert_eq!(err.message, "disk on fire");
}

#[test]
fn empty_message_gets_generic_fallback() {
    let err = normalize_message("");
    assert_eq!(err.category, ErrorCategory::Unknown);
    assert_eq!(err.message, "An unexpected error occurred. Please try again.");
}

#[test]
fn normalization_is_deterministic() {
    let a = normalize_message("User already registered");
    let b = normalize_message("User already registered");
    assert_eq!(a, b);
}

// =============================================================
// ProviderError entry point
// =============================================================

#[test]
fn rejected_errors_go_through_the_table() {
    let raw = ProviderError::Rejected { status: 400, message: "Invalid email".to_owned() };
    assert_eq!(normalize(&raw).category, ErrorCategory::InvalidEmail);
}

#[test]
fn network_failures_surface_as_unknown_with_message_preserved() {
    let raw = ProviderError::Network("dns lookup failed".to_owned());
    let err = normalize(&raw);
    assert_eq!(err.category, ErrorCategory::Unknown);
    assert_eq!(err.message, "network error: dns lookup failed");
}
