use futures::executor::block_on;

use super::*;
use crate::net::provider::{ProfilePatch, ProviderError, SessionEvent, SignUpOutcome};
use crate::net::testing::{FakeProvider, session, user};

fn rejected(message: &str) -> ProviderError {
    ProviderError::Rejected { status: 400, message: message.to_owned() }
}

// =============================================================
// Derived state
// =============================================================

#[test]
fn derive_auth_state_anonymous_has_no_token() {
    let snapshot = AuthSnapshot { phase: SessionPhase::Anonymous, loading: false };
    let state = derive_auth_state(&snapshot);
    assert!(!state.is_authenticated);
    assert_eq!(state.token, None);
}

#[test]
fn derive_auth_state_authenticated_exposes_token() {
    let snapshot = AuthSnapshot {
        phase: SessionPhase::Authenticated(session("tok-1")),
        loading: true,
    };
    let state = derive_auth_state(&snapshot);
    assert!(state.is_authenticated);
    assert!(state.loading);
    assert_eq!(state.token.as_deref(), Some("tok-1"));
}

// =============================================================
// initialize
// =============================================================

#[test]
fn initialize_with_live_session_authenticates() {
    let fake = FakeProvider::new();
    fake.set_session(Some(session("tok-init")));
    let store = SessionStore::new(fake);

    block_on(store.initialize());

    let state = store.auth_state();
    assert!(state.is_authenticated);
    assert_eq!(state.token.as_deref(), Some("tok-init"));
    assert!(!state.loading);
}

#[test]
fn initialize_without_session_lands_anonymous() {
    let store = SessionStore::new(FakeProvider::new());

    block_on(store.initialize());

    let state = store.auth_state();
    assert!(!state.is_authenticated);
    assert_eq!(state.token, None);
    assert!(!state.loading);
}

#[test]
fn initialize_twice_with_unchanged_session_is_idempotent() {
    let fake = FakeProvider::new();
    fake.set_session(Some(session("tok-same")));
    let store = SessionStore::new(fake.clone());

    block_on(store.initialize());
    let first = store.auth_state();
    block_on(store.initialize());
    let second = store.auth_state();

    assert_eq!(first, second);
    assert_eq!(fake.get_session_calls(), 2);
}

#[test]
fn initialize_refetch_picks_up_external_expiry() {
    let fake = FakeProvider::new();
    fake.set_session(Some(session("tok-old")));
    let store = SessionStore::new(fake.clone());

    block_on(store.initialize());
    assert!(store.is_authenticated());

    fake.set_session(None);
    block_on(store.initialize());
    assert!(!store.is_authenticated());
}

#[test]
fn initialize_provider_failure_lands_anonymous_not_loading() {
    let fake = FakeProvider::new();
    fake.script_get_session(Err(ProviderError::Network("offline".to_owned())));
    let store = SessionStore::new(fake);

    block_on(store.initialize());

    let state = store.auth_state();
    assert!(!state.is_authenticated);
    assert!(!state.loading);
}

// =============================================================
// login
// =============================================================

#[test]
fn login_success_authenticates_with_token() {
    let fake = FakeProvider::new();
    fake.script_sign_in(Ok(session("tok-login")));
    let store = SessionStore::new(fake);

    let result = block_on(store.login("alice@example.com", "hunter22"));

    assert!(result.is_ok());
    let state = store.auth_state();
    assert!(state.is_authenticated);
    assert_eq!(state.token.as_deref(), Some("tok-login"));
    assert!(!state.loading);
}

#[test]
fn login_failure_keeps_prior_anonymous_state_and_raises() {
    let fake = FakeProvider::new();
    fake.script_sign_in(Err(rejected("Invalid login credentials")));
    let store = SessionStore::new(fake);
    block_on(store.initialize());

    let err = block_on(store.login("alice@example.com", "wrong")).unwrap_err();

    assert_eq!(err.category(), Some(crate::net::errors::ErrorCategory::InvalidCredentials));
    assert_eq!(err.to_string(), "Invalid email or password.");
    let state = store.auth_state();
    assert!(!state.is_authenticated);
    assert!(!state.loading);
}

#[test]
fn login_failure_keeps_prior_authenticated_session() {
    let fake = FakeProvider::new();
    fake.set_session(Some(session("tok-existing")));
    let store = SessionStore::new(fake.clone());
    block_on(store.initialize());

    fake.script_sign_in(Err(rejected("Invalid login credentials")));
    let result = block_on(store.login("alice@example.com", "wrong"));

    assert!(result.is_err());
    let state = store.auth_state();
    assert!(state.is_authenticated);
    assert_eq!(state.token.as_deref(), Some("tok-existing"));
    assert!(!state.loading);
}

// =============================================================
// signup
// =============================================================

#[test]
fn signup_autoconfirm_authenticates() {
    let fake = FakeProvider::new();
    fake.script_sign_up(Ok(SignUpOutcome::Active { session: session("tok-new") }));
    let store = SessionStore::new(fake);

    let status = block_on(store.signup("a@x.com", "longenough", "Alice")).unwrap();

    assert_eq!(status, SignupStatus::SignedIn);
    assert!(store.is_authenticated());
    assert!(!store.auth_state().loading);
}

#[test]
fn signup_confirmation_pending_does_not_authenticate() {
    let fake = FakeProvider::new();
    fake.script_sign_up(Ok(SignUpOutcome::ConfirmationPending {
        user: user("Alice"),
        message: "Please check your email to confirm your registration.".to_owned(),
    }));
    let store = SessionStore::new(fake);

    let status = block_on(store.signup("a@x.com", "longenough", "Alice")).unwrap();

    assert_eq!(
        status,
        SignupStatus::ConfirmationPending {
            message: "Please check your email to confirm your registration.".to_owned(),
        }
    );
    let state = store.auth_state();
    assert!(!state.is_authenticated);
    assert_eq!(state.token, None);
    assert!(!state.loading);
}

#[test]
fn signup_short_password_maps_to_weak_password() {
    let fake = FakeProvider::new();
    fake.script_sign_up(Err(rejected("Password should be at least 6 characters")));
    let store = SessionStore::new(fake);

    let err = block_on(store.signup("a@x.com", "short", "Alice")).unwrap_err();

    assert_eq!(err.category(), Some(crate::net::errors::ErrorCategory::WeakPassword));
    assert_eq!(err.to_string(), "Password must be at least 6 characters.");
    let state = store.auth_state();
    assert!(!state.is_authenticated);
    assert!(!state.loading);
}

// =============================================================
// logout
// =============================================================

#[test]
fn logout_lands_anonymous() {
    let fake = FakeProvider::new();
    fake.set_session(Some(session("tok-bye")));
    let store = SessionStore::new(fake);
    block_on(store.initialize());

    block_on(store.logout());

    let state = store.auth_state();
    assert!(!state.is_authenticated);
    assert_eq!(state.token, None);
    assert!(!state.loading);
}

#[test]
fn logout_lands_anonymous_even_when_provider_fails() {
    let fake = FakeProvider::new();
    fake.set_session(Some(session("tok-stuck")));
    let store = SessionStore::new(fake.clone());
    block_on(store.initialize());

    fake.script_sign_out(Err(ProviderError::Network("offline".to_owned())));
    block_on(store.logout());

    let state = store.auth_state();
    assert!(!state.is_authenticated);
    assert_eq!(state.token, None);
    assert!(!state.loading);
}

// =============================================================
// update_profile
// =============================================================

#[test]
fn update_profile_replaces_user_and_keeps_token() {
    let fake = FakeProvider::new();
    fake.set_session(Some(session("tok-keep")));
    let store = SessionStore::new(fake.clone());
    block_on(store.initialize());

    fake.script_update_profile(Ok(user("Alicia")));
    let patch = ProfilePatch { name: Some("Alicia".to_owned()), avatar_url: None };
    let updated = block_on(store.update_profile(&patch)).unwrap();

    assert_eq!(updated.name, "Alicia");
    assert_eq!(store.current_user().unwrap().name, "Alicia");
    assert_eq!(store.token().as_deref(), Some("tok-keep"));
    assert!(!store.auth_state().loading);
}

#[test]
fn update_profile_while_anonymous_is_a_reported_precondition_violation() {
    let fake = FakeProvider::new();
    let store = SessionStore::new(fake);
    block_on(store.initialize());

    let patch = ProfilePatch { name: Some("Alicia".to_owned()), avatar_url: None };
    let err = block_on(store.update_profile(&patch)).unwrap_err();

    assert_eq!(err, AuthFlowError::NotAuthenticated);
    let state = store.auth_state();
    assert!(!state.is_authenticated);
    assert!(!state.loading);
}

#[test]
fn update_profile_failure_keeps_current_session() {
    let fake = FakeProvider::new();
    fake.set_session(Some(session("tok-keep")));
    let store = SessionStore::new(fake.clone());
    block_on(store.initialize());

    fake.script_update_profile(Err(ProviderError::Network("offline".to_owned())));
    let patch = ProfilePatch { name: Some("Alicia".to_owned()), avatar_url: None };
    let result = block_on(store.update_profile(&patch));

    assert!(result.is_err());
    assert_eq!(store.current_user().unwrap().name, "Alice");
    assert_eq!(store.token().as_deref(), Some("tok-keep"));
    assert!(!store.auth_state().loading);
}

// =============================================================
// Passive event path
// =============================================================

#[test]
fn signed_out_event_clears_session() {
    let fake = FakeProvider::new();
    fake.set_session(Some(session("tok-ev")));
    let store = SessionStore::new(fake);
    block_on(store.initialize());

    store.apply_event(SessionEvent::SignedOut);

    assert!(!store.is_authenticated());
    assert!(!store.auth_state().loading);
}

#[test]
fn token_refreshed_event_replaces_whole_session() {
    let fake = FakeProvider::new();
    fake.set_session(Some(session("tok-old")));
    let store = SessionStore::new(fake);
    block_on(store.initialize());

    store.apply_event(SessionEvent::TokenRefreshed(session("tok-fresh")));

    assert_eq!(store.token().as_deref(), Some("tok-fresh"));
}

#[test]
fn user_updated_event_replaces_user_and_keeps_token() {
    let fake = FakeProvider::new();
    fake.set_session(Some(session("tok-keep")));
    let store = SessionStore::new(fake);
    block_on(store.initialize());

    store.apply_event(SessionEvent::UserUpdated(user("Alicia")));

    assert_eq!(store.current_user().unwrap().name, "Alicia");
    assert_eq!(store.token().as_deref(), Some("tok-keep"));
}

#[test]
fn user_updated_event_while_anonymous_is_ignored() {
    let store = SessionStore::new(FakeProvider::new());
    block_on(store.initialize());

    store.apply_event(SessionEvent::UserUpdated(user("Nobody")));

    assert!(!store.is_authenticated());
    assert_eq!(store.current_user(), None);
}

#[test]
fn signed_in_event_authenticates_without_explicit_transition() {
    let store = SessionStore::new(FakeProvider::new());
    block_on(store.initialize());

    store.apply_event(SessionEvent::SignedIn(session("tok-passive")));

    assert!(store.is_authenticated());
    assert_eq!(store.token().as_deref(), Some("tok-passive"));
    assert!(!store.auth_state().loading);
}

// =============================================================
// Live reads for the request pipeline and the route guard
// =============================================================

#[test]
fn live_token_reads_fresh_provider_session() {
    let fake = FakeProvider::new();
    let store = SessionStore::new(fake.clone());
    block_on(store.initialize());
    assert_eq!(block_on(store.live_token()), None);

    // Provider-side refresh that never went through a store transition.
    fake.set_session(Some(session("tok-silent")));

    assert_eq!(block_on(store.live_token()).as_deref(), Some("tok-silent"));
}
