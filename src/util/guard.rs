//! Route guarding for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route declares whether it requires authentication (see
//! [`ROUTE_TABLE`]). Protected views are wrapped in [`RequireAuth`], which
//! holds back rendering of the target until a *live* session check against
//! the provider settles; the store cache is deliberately not consulted, so
//! an externally-expired session cannot slip a stale navigation through.
//! If a newer navigation supersedes a pending check, the old check is
//! abandoned: its verdict lands on a disposed signal and is dropped.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use leptos::prelude::*;

use crate::net::types::Session;

/// One row of the route contract: path plus its `requires_auth` flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteSpec {
    pub path: &'static str,
    pub requires_auth: bool,
}

/// The application route table. `app.rs` mounts views to match; unflagged
/// routes always proceed unconditionally.
pub const ROUTE_TABLE: &[RouteSpec] = &[
    RouteSpec { path: "/", requires_auth: false },
    RouteSpec { path: "/login", requires_auth: false },
    RouteSpec { path: "/register", requires_auth: false },
    RouteSpec { path: "/recipes", requires_auth: true },
    RouteSpec { path: "/groups", requires_auth: true },
];

/// Route clients are sent to when a protected navigation is refused.
pub const LOGIN_ROUTE: &str = "/login";

/// Whether `path` is marked as requiring authentication. Unknown paths are
/// open (the router's fallback handles them).
#[must_use]
pub fn route_requires_auth(path: &str) -> bool {
    ROUTE_TABLE
        .iter()
        .find(|spec| spec.path == path)
        .is_some_and(|spec| spec.requires_auth)
}

/// Verdict of a settled session check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    Proceed,
    RedirectLogin,
}

/// Pure gate decision: presence of a live session admits the navigation.
#[must_use]
pub fn gate_outcome(session: Option<&Session>) -> GateOutcome {
    if session.is_some() {
        GateOutcome::Proceed
    } else {
        GateOutcome::RedirectLogin
    }
}

/// Wrapper for protected route views. Renders nothing until the live session
/// check settles; absence of a session redirects to the login route instead
/// of completing the navigation.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let verdict = RwSignal::new(None::<GateOutcome>);

    #[cfg(feature = "hydrate")]
    {
        use leptos_router::NavigateOptions;
        use leptos_router::hooks::use_navigate;

        let store = expect_context::<crate::app::AppSessionStore>();
        let navigate = use_navigate();
        leptos::task::spawn_local(async move {
            let session = store.live_session().await;
            let outcome = gate_outcome(session.as_ref());
            // try_set fails when the guard was superseded and disposed;
            // an abandoned check must not redirect the newer navigation.
            if verdict.try_set(Some(outcome)).is_none()
                && matches!(outcome, GateOutcome::RedirectLogin)
            {
                navigate(LOGIN_ROUTE, NavigateOptions::default());
            }
        });
    }

    move || {
        if matches!(verdict.get(), Some(GateOutcome::Proceed)) {
            Some(children())
        } else {
            None
        }
    }
}
