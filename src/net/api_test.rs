use futures::executor::block_on;

use super::*;
use crate::net::testing::{FakeProvider, session};

fn config() -> AppConfig {
    AppConfig {
        api_origin: "http://api.test".to_owned(),
        provider_origin: "http://id.test".to_owned(),
        provider_key: "publishable-key".to_owned(),
    }
}

// =============================================================
// Request construction
// =============================================================

#[test]
fn urls_join_origin_and_path() {
    let store = SessionStore::new(FakeProvider::new());
    let client = ApiClient::new(&config(), store);
    assert_eq!(client.url("/recipes"), "http://api.test/recipes");
    assert_eq!(client.url("/users/me"), "http://api.test/users/me");
}

// =============================================================
// Response classification
// =============================================================

#[test]
fn only_401_signals_credential_rejection() {
    assert!(is_credential_rejection(401));
    assert!(!is_credential_rejection(200));
    assert!(!is_credential_rejection(403));
    assert!(!is_credential_rejection(500));
}

#[test]
fn api_error_message_reads_fastapi_detail() {
    assert_eq!(api_error_message(r#"{ "detail": "Recipe not found" }"#, 404), "Recipe not found");
}

#[test]
fn api_error_message_falls_back_to_status() {
    assert_eq!(api_error_message("<html>oops</html>", 500), "request failed: 500");
    assert_eq!(api_error_message(r#"{ "detail": 42 }"#, 422), "request failed: 422");
}

// =============================================================
// 401 teardown
// =============================================================

#[test]
fn credential_rejection_forces_store_to_anonymous() {
    let fake = FakeProvider::new();
    fake.set_session(Some(session("tok-rejected")));
    let store = SessionStore::new(fake.clone());
    block_on(store.initialize());
    assert!(store.is_authenticated());

    block_on(credential_rejected(&store));

    let state = store.auth_state();
    assert!(!state.is_authenticated);
    assert_eq!(state.token, None);
    assert!(!state.loading);
    // The provider-side session is gone too, so the next live read is empty.
    assert_eq!(fake.stored_session(), None);
}

#[test]
fn credential_rejection_while_anonymous_stays_anonymous() {
    let store = SessionStore::new(FakeProvider::new());
    block_on(store.initialize());

    block_on(credential_rejected(&store));

    assert!(!store.is_authenticated());
    assert!(!store.auth_state().loading);
}
