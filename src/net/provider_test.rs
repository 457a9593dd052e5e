use super::*;

fn client() -> IdentityClient {
    IdentityClient::new(&AppConfig {
        api_origin: "http://api.test".to_owned(),
        provider_origin: "http://id.test".to_owned(),
        provider_key: "publishable-key".to_owned(),
    })
}

// =============================================================
// Response-body classification
// =============================================================

#[test]
fn signup_body_with_session_is_active() {
    let body = r#"{
        "access_token": "jwt-abc",
        "expires_at": 10,
        "user": { "id": "u-1", "email": "a@x.com", "user_metadata": { "name": "Alice" } }
    }"#;
    match parse_signup_body(body).unwrap() {
        SignUpOutcome::Active { session } => {
            assert_eq!(session.access_token, "jwt-abc");
            assert_eq!(session.user.name, "Alice");
        }
        SignUpOutcome::ConfirmationPending { .. } => panic!("expected active session"),
    }
}

#[test]
fn signup_body_with_bare_user_is_confirmation_pending() {
    let body = r#"{ "id": "u-1", "email": "a@x.com", "user_metadata": { "name": "Alice" } }"#;
    match parse_signup_body(body).unwrap() {
        SignUpOutcome::ConfirmationPending { user, message } => {
            assert_eq!(user.id, "u-1");
            assert_eq!(message, CONFIRMATION_MESSAGE);
        }
        SignUpOutcome::Active { .. } => panic!("expected confirmation pending"),
    }
}

#[test]
fn signup_body_garbage_is_a_decode_error() {
    let err = parse_signup_body("not json").unwrap_err();
    assert!(matches!(err, ProviderError::Decode(_)));
}

// =============================================================
// Error payload extraction
// =============================================================

#[test]
fn error_message_prefers_msg_field() {
    let body = r#"{ "msg": "Invalid login credentials", "error": "invalid_grant" }"#;
    assert_eq!(error_message_from_body(body).as_deref(), Some("Invalid login credentials"));
}

#[test]
fn error_message_falls_back_through_known_fields() {
    let body = r#"{ "error_description": "Email not confirmed" }"#;
    assert_eq!(error_message_from_body(body).as_deref(), Some("Email not confirmed"));
}

#[test]
fn error_message_is_none_for_unparseable_bodies() {
    assert_eq!(error_message_from_body("<html>502</html>"), None);
}

#[test]
fn rejected_synthesizes_message_from_status_when_body_is_opaque() {
    let err = rejected(503, "<html>bad gateway</html>");
    assert_eq!(
        err,
        ProviderError::Rejected { status: 503, message: "provider request failed: 503".to_owned() }
    );
}

#[test]
fn bearer_formats_header_value() {
    assert_eq!(bearer("jwt-abc"), "Bearer jwt-abc");
}

// =============================================================
// Profile patch serialization
// =============================================================

#[test]
fn profile_patch_includes_only_set_fields() {
    let patch = ProfilePatch { name: Some("Alice".to_owned()), avatar_url: None };
    assert_eq!(patch.to_metadata(), serde_json::json!({ "name": "Alice" }));

    let empty = ProfilePatch::default();
    assert_eq!(empty.to_metadata(), serde_json::json!({}));
}

// =============================================================
// Event subscription
// =============================================================

#[test]
fn subscribers_receive_emitted_events() {
    let client = client();
    let mut rx = client.subscribe();

    client.emit(&SessionEvent::SignedOut);

    assert_eq!(rx.try_next().unwrap(), Some(SessionEvent::SignedOut));
}

#[test]
fn dropped_subscribers_are_pruned_on_emit() {
    let client = client();
    let rx = client.subscribe();
    drop(rx);

    client.emit(&SessionEvent::SignedOut);

    assert!(client.subscribers.borrow().is_empty());
}

#[test]
fn each_subscriber_gets_its_own_copy() {
    let client = client();
    let mut a = client.subscribe();
    let mut b = client.subscribe();

    client.emit(&SessionEvent::SignedOut);

    assert_eq!(a.try_next().unwrap(), Some(SessionEvent::SignedOut));
    assert_eq!(b.try_next().unwrap(), Some(SessionEvent::SignedOut));
}
