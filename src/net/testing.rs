//! Scripted identity provider for session-layer tests.
//!
//! Mirrors the real adapter's externally visible behavior: sign-in persists
//! the session it returns, sign-out drops the local session even when the
//! network call is scripted to fail.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};

use super::provider::{
    ProfilePatch, ProviderError, SessionEvent, SessionProvider, SignUpOutcome,
};
use super::types::{Session, User};

/// Sample user with `name` in the display-name slot.
#[must_use]
pub fn user(name: &str) -> User {
    User {
        id: "u-1".to_owned(),
        email: Some("alice@example.com".to_owned()),
        name: name.to_owned(),
        metadata: serde_json::json!({ "name": name }),
    }
}

/// Sample live session carrying `token`.
#[must_use]
pub fn session(token: &str) -> Session {
    Session { access_token: token.to_owned(), expires_at: 0, user: user("Alice") }
}

#[derive(Default)]
struct FakeState {
    session: Option<Session>,
    sign_in: Option<Result<Session, ProviderError>>,
    sign_up: Option<Result<SignUpOutcome, ProviderError>>,
    sign_out: Option<Result<(), ProviderError>>,
    get_session: Option<Result<Option<Session>, ProviderError>>,
    update_profile: Option<Result<User, ProviderError>>,
    update_password: Option<Result<User, ProviderError>>,
    get_session_calls: usize,
    subscribers: Vec<UnboundedSender<SessionEvent>>,
}

/// Cloneable handle over shared scripted state.
#[derive(Clone, Default)]
pub struct FakeProvider {
    inner: Rc<RefCell<FakeState>>,
}

impl FakeProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_session(&self, session: Option<Session>) {
        self.inner.borrow_mut().session = session;
    }

    pub fn script_sign_in(&self, result: Result<Session, ProviderError>) {
        self.inner.borrow_mut().sign_in = Some(result);
    }

    pub fn script_sign_up(&self, result: Result<SignUpOutcome, ProviderError>) {
        self.inner.borrow_mut().sign_up = Some(result);
    }

    pub fn script_sign_out(&self, result: Result<(), ProviderError>) {
        self.inner.borrow_mut().sign_out = Some(result);
    }

    pub fn script_get_session(&self, result: Result<Option<Session>, ProviderError>) {
        self.inner.borrow_mut().get_session = Some(result);
    }

    pub fn script_update_profile(&self, result: Result<User, ProviderError>) {
        self.inner.borrow_mut().update_profile = Some(result);
    }

    pub fn script_update_password(&self, result: Result<User, ProviderError>) {
        self.inner.borrow_mut().update_password = Some(result);
    }

    #[must_use]
    pub fn get_session_calls(&self) -> usize {
        self.inner.borrow().get_session_calls
    }

    #[must_use]
    pub fn stored_session(&self) -> Option<Session> {
        self.inner.borrow().session.clone()
    }

    fn unscripted<T>(op: &str) -> Result<T, ProviderError> {
        Err(ProviderError::Network(format!("no scripted response for {op}")))
    }
}

impl SessionProvider for FakeProvider {
    fn subscribe(&self) -> UnboundedReceiver<SessionEvent> {
        let (tx, rx) = unbounded();
        self.inner.borrow_mut().subscribers.push(tx);
        rx
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _name: &str,
    ) -> Result<SignUpOutcome, ProviderError> {
        let result = self.inner.borrow().sign_up.clone();
        let result = result.unwrap_or_else(|| Self::unscripted("sign_up"));
        if let Ok(SignUpOutcome::Active { session }) = &result {
            self.inner.borrow_mut().session = Some(session.clone());
        }
        result
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Session, ProviderError> {
        let result = self.inner.borrow().sign_in.clone();
        let result = result.unwrap_or_else(|| Self::unscripted("sign_in"));
        if let Ok(session) = &result {
            self.inner.borrow_mut().session = Some(session.clone());
        }
        result
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let mut state = self.inner.borrow_mut();
        state.session = None;
        state.sign_out.clone().unwrap_or(Ok(()))
    }

    async fn get_session(&self) -> Result<Option<Session>, ProviderError> {
        let mut state = self.inner.borrow_mut();
        state.get_session_calls += 1;
        match &state.get_session {
            Some(result) => result.clone(),
            None => Ok(state.session.clone()),
        }
    }

    async fn get_user(&self) -> Result<Option<User>, ProviderError> {
        Ok(self.inner.borrow().session.as_ref().map(|s| s.user.clone()))
    }

    async fn update_profile(&self, _patch: &ProfilePatch) -> Result<User, ProviderError> {
        let result = self.inner.borrow().update_profile.clone();
        result.unwrap_or_else(|| Self::unscripted("update_profile"))
    }

    async fn reset_password(&self, _email: &str) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn update_password(&self, _new_password: &str) -> Result<User, ProviderError> {
        let result = self.inner.borrow().update_password.clone();
        result.unwrap_or_else(|| Self::unscripted("update_password"))
    }
}
