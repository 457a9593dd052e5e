//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Single source of truth for "is the user signed in, and with what
//! credential". The route guard, the API request pipeline, and user-aware
//! components all read from here; asynchronous credential invalidation
//! (expiry, sign-out, a server-rejected token) flows back in through
//! [`SessionStore::logout`] or the provider event channel.
//!
//! DESIGN
//! ======
//! The store is an explicitly constructed, dependency-injected container
//! (no ambient singleton): `App` builds one over the real [`IdentityClient`]
//! and provides it via context. Every transition atomically replaces the
//! whole phase; session and user always travel together, so interleaved
//! async transitions degrade to last-completion-wins without partial state.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;

use crate::net::errors::{CategorizedError, ErrorCategory, normalize};
use crate::net::provider::{ProfilePatch, SessionEvent, SessionProvider, SignUpOutcome};
use crate::net::types::{Session, User};

/// Where the session lifecycle currently stands.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionPhase {
    /// Store constructed, `initialize` not yet settled.
    #[default]
    Uninitialized,
    /// No live session.
    Anonymous,
    /// Live session; the bundle is replaced wholesale, never patched.
    Authenticated(Session),
}

/// Store snapshot: the phase plus the explicit in-flight flag.
///
/// `loading` is true only while a transition is in flight; every transition
/// resets it on every exit path, success or failure.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthSnapshot {
    pub phase: SessionPhase,
    pub loading: bool,
}

/// Derived view consumed by components; never independently mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub loading: bool,
    pub is_authenticated: bool,
    pub token: Option<String>,
}

/// Pure derivation of [`AuthState`] from a snapshot.
/// `is_authenticated` is true iff a session is present.
#[must_use]
pub fn derive_auth_state(snapshot: &AuthSnapshot) -> AuthState {
    match &snapshot.phase {
        SessionPhase::Authenticated(session) => AuthState {
            loading: snapshot.loading,
            is_authenticated: true,
            token: Some(session.access_token.clone()),
        },
        SessionPhase::Uninitialized | SessionPhase::Anonymous => AuthState {
            loading: snapshot.loading,
            is_authenticated: false,
            token: None,
        },
    }
}

/// Failure surfaced by a session transition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthFlowError {
    /// The transition requires a live session (e.g. profile update while
    /// anonymous). The store state is left untouched.
    #[error("not signed in")]
    NotAuthenticated,
    /// The provider rejected the transition; already normalized.
    #[error(transparent)]
    Provider(#[from] CategorizedError),
}

impl AuthFlowError {
    #[must_use]
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Self::NotAuthenticated => None,
            Self::Provider(err) => Some(err.category),
        }
    }
}

/// Outcome of a sign-up transition; `ConfirmationPending` is a success that
/// does NOT authenticate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignupStatus {
    SignedIn,
    ConfirmationPending { message: String },
}

/// Authoritative holder of the current session, generic over the identity
/// provider so tests can script one.
#[derive(Clone)]
pub struct SessionStore<P: SessionProvider> {
    provider: P,
    snapshot: RwSignal<AuthSnapshot>,
}

impl<P: SessionProvider> SessionStore<P> {
    /// Build the store and kick off its process-wide lifecycle: the initial
    /// session fetch and the provider event loop (browser builds only).
    /// There is no teardown; the store lives as long as the process.
    #[must_use]
    pub fn new(provider: P) -> Self {
        let store = Self { provider, snapshot: RwSignal::new(AuthSnapshot::default()) };
        store.spawn_lifecycle();
        store
    }

    /// The underlying snapshot signal, for reactive consumers.
    #[must_use]
    pub fn signal(&self) -> RwSignal<AuthSnapshot> {
        self.snapshot
    }

    /// Direct access to the injected provider, for operations that are not
    /// store transitions (password reset, live session checks in the guard).
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn spawn_lifecycle(&self) {
        #[cfg(feature = "hydrate")]
        {
            use futures::StreamExt;

            let init = self.clone();
            leptos::task::spawn_local(async move {
                init.initialize().await;
            });

            let mut events = self.provider.subscribe();
            let store = self.clone();
            leptos::task::spawn_local(async move {
                while let Some(event) = events.next().await {
                    store.apply_event(event);
                }
            });
        }
    }

    /// Re-fetch the provider session and settle into `Authenticated` or
    /// `Anonymous`. Idempotent; a later call may flip the phase if the
    /// external session changed (e.g. expired in the meantime).
    pub async fn initialize(&self) {
        self.begin();
        match self.provider.get_session().await {
            Ok(Some(session)) => self.settle(Some(SessionPhase::Authenticated(session))),
            Ok(None) => self.settle(Some(SessionPhase::Anonymous)),
            Err(err) => {
                leptos::logging::warn!("session initialize failed: {err}");
                self.settle(Some(SessionPhase::Anonymous));
            }
        }
    }

    /// Sign in with an email/password pair. On failure the prior phase is
    /// kept and the normalized error is re-raised to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthFlowError> {
        self.begin();
        match self.provider.sign_in(email, password).await {
            Ok(session) => {
                self.settle(Some(SessionPhase::Authenticated(session)));
                Ok(())
            }
            Err(err) => {
                leptos::logging::warn!("login rejected: {err}");
                self.settle(None);
                Err(normalize(&err).into())
            }
        }
    }

    /// Create an account. `ConfirmationPending` leaves the session unset;
    /// callers must distinguish it from both failure and full login.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<SignupStatus, AuthFlowError> {
        self.begin();
        match self.provider.sign_up(email, password, name).await {
            Ok(SignUpOutcome::Active { session }) => {
                self.settle(Some(SessionPhase::Authenticated(session)));
                Ok(SignupStatus::SignedIn)
            }
            Ok(SignUpOutcome::ConfirmationPending { message, .. }) => {
                self.settle(None);
                Ok(SignupStatus::ConfirmationPending { message })
            }
            Err(err) => {
                leptos::logging::warn!("signup rejected: {err}");
                self.settle(None);
                Err(normalize(&err).into())
            }
        }
    }

    /// End the session. Local state always lands in `Anonymous`; a provider
    /// sign-out failure is advisory (logged, not surfaced) so the forced
    /// teardown path on a rejected credential can never itself fail.
    pub async fn logout(&self) {
        self.begin();
        let result = self.provider.sign_out().await;
        self.settle(Some(SessionPhase::Anonymous));
        if let Err(err) = result {
            leptos::logging::warn!("provider sign-out failed, local session cleared: {err}");
        }
    }

    /// Replace the current user from the provider's response. Requires an
    /// authenticated phase; otherwise reports the precondition violation
    /// without touching state.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<User, AuthFlowError> {
        let current = match self.snapshot.with_untracked(|s| s.phase.clone()) {
            SessionPhase::Authenticated(session) => session,
            SessionPhase::Uninitialized | SessionPhase::Anonymous => {
                return Err(AuthFlowError::NotAuthenticated);
            }
        };
        self.begin();
        match self.provider.update_profile(patch).await {
            Ok(user) => {
                let refreshed = Session {
                    access_token: current.access_token,
                    expires_at: current.expires_at,
                    user: user.clone(),
                };
                self.settle(Some(SessionPhase::Authenticated(refreshed)));
                Ok(user)
            }
            Err(err) => {
                leptos::logging::warn!("profile update rejected: {err}");
                self.settle(None);
                Err(normalize(&err).into())
            }
        }
    }

    /// Apply an externally-driven session change. This passive path never
    /// touches `loading` and follows the same whole-phase replacement rule
    /// as explicit transitions.
    pub fn apply_event(&self, event: SessionEvent) {
        self.snapshot.update(|snap| match event {
            SessionEvent::SignedIn(session) | SessionEvent::TokenRefreshed(session) => {
                snap.phase = SessionPhase::Authenticated(session);
            }
            SessionEvent::SignedOut => {
                snap.phase = SessionPhase::Anonymous;
            }
            SessionEvent::UserUpdated(user) => {
                if let SessionPhase::Authenticated(current) = &snap.phase {
                    snap.phase = SessionPhase::Authenticated(Session {
                        access_token: current.access_token.clone(),
                        expires_at: current.expires_at,
                        user,
                    });
                }
            }
        });
    }

    /// Derived view of the current snapshot (untracked read).
    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        self.snapshot.with_untracked(derive_auth_state)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth_state().is_authenticated
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.auth_state().token
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.snapshot.with_untracked(|s| match &s.phase {
            SessionPhase::Authenticated(session) => Some(session.user.clone()),
            SessionPhase::Uninitialized | SessionPhase::Anonymous => None,
        })
    }

    /// Fresh session from the provider, bypassing the store cache. Used by
    /// the navigation gate and the per-request token snapshot so a
    /// provider-side silent refresh is always honored.
    pub async fn live_session(&self) -> Option<Session> {
        self.provider.get_session().await.ok().flatten()
    }

    /// Fresh token for exactly one outbound call.
    pub async fn live_token(&self) -> Option<String> {
        self.live_session().await.map(|s| s.access_token)
    }

    fn begin(&self) {
        self.snapshot.update(|s| s.loading = true);
    }

    /// Settle a transition: apply the new phase (if any) and drop the
    /// in-flight flag in one atomic snapshot update.
    fn settle(&self, phase: Option<SessionPhase>) {
        self.snapshot.update(|s| {
            if let Some(phase) = phase {
                s.phase = phase;
            }
            s.loading = false;
        });
    }
}
