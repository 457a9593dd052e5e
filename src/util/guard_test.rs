use super::*;

fn live_session() -> Session {
    Session {
        access_token: "tok-live".to_owned(),
        expires_at: 0,
        user: crate::net::types::User {
            id: "u-1".to_owned(),
            email: None,
            name: "Alice".to_owned(),
            metadata: serde_json::Value::Null,
        },
    }
}

// =============================================================
// Route contract
// =============================================================

#[test]
fn protected_routes_are_flagged() {
    assert!(route_requires_auth("/recipes"));
    assert!(route_requires_auth("/groups"));
}

#[test]
fn open_routes_are_not_flagged() {
    assert!(!route_requires_auth("/"));
    assert!(!route_requires_auth("/login"));
    assert!(!route_requires_auth("/register"));
}

#[test]
fn unknown_paths_fall_through_open() {
    assert!(!route_requires_auth("/does-not-exist"));
}

#[test]
fn login_route_matches_the_table() {
    assert!(ROUTE_TABLE.iter().any(|spec| spec.path == LOGIN_ROUTE && !spec.requires_auth));
}

// =============================================================
// Gate decision
// =============================================================

#[test]
fn missing_session_redirects_to_login() {
    assert_eq!(gate_outcome(None), GateOutcome::RedirectLogin);
}

#[test]
fn live_session_admits_the_navigation() {
    assert_eq!(gate_outcome(Some(&live_session())), GateOutcome::Proceed);
}
