//! Session Provider Adapter — thin boundary to the external identity service.
//!
//! SYSTEM CONTEXT
//! ==============
//! Speaks the GoTrue-style REST surface (`/auth/v1/*`) and owns session
//! persistence in `localStorage`. Operations return *raw* provider errors;
//! normalization happens in callers (see `net::errors`). Every
//! state-affecting call also emits a [`SessionEvent`] on the subscription
//! channel so the session store can apply passive updates.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs; there is no browser session on the server.

#[cfg(test)]
#[path = "provider_test.rs"]
mod provider_test;

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};

use super::types::{Session, User};
#[cfg(any(test, feature = "hydrate"))]
use super::types::{WireSession, WireUser};
use crate::config::AppConfig;

/// Raw failure from the identity service. Passed unmodified to the error
/// normalizer by callers; this adapter never normalizes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The service rejected the request and returned an error payload.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The service could not be reached at all.
    #[error("network error: {0}")]
    Network(String),
    /// The service answered with a payload we could not decode.
    #[error("malformed provider response: {0}")]
    Decode(String),
    /// Operation attempted outside the browser (SSR build).
    #[error("not available on server")]
    Unavailable,
}

/// Session-change notifications consumed passively by the session store.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
    TokenRefreshed(Session),
    UserUpdated(User),
}

/// Branching success contract of sign-up.
///
/// `ConfirmationPending` (message present, session absent) is a non-error
/// success state distinct from both failure and full-login success; callers
/// must handle it explicitly.
#[derive(Clone, Debug, PartialEq)]
pub enum SignUpOutcome {
    /// Provider auto-confirmed the account and issued a session.
    Active { session: Session },
    /// Account created; email confirmation required before login.
    ConfirmationPending { user: User, message: String },
}

/// Partial profile patch applied to the provider's `user_metadata`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfilePatch {
    #[cfg(any(test, feature = "hydrate"))]
    fn to_metadata(&self) -> serde_json::Value {
        let mut data = serde_json::Map::new();
        if let Some(name) = &self.name {
            data.insert("name".to_owned(), serde_json::Value::String(name.clone()));
        }
        if let Some(url) = &self.avatar_url {
            data.insert("avatar_url".to_owned(), serde_json::Value::String(url.clone()));
        }
        serde_json::Value::Object(data)
    }
}

/// Operations the session layer needs from an identity service.
///
/// Dependency-injection seam: the session store, request authenticator, and
/// navigation gate all work against this trait, so tests can substitute a
/// scripted fake for the real [`IdentityClient`].
#[allow(async_fn_in_trait)]
pub trait SessionProvider: Clone + 'static {
    /// Open a channel of session-change events. The channel stays live for
    /// the lifetime of the client.
    fn subscribe(&self) -> UnboundedReceiver<SessionEvent>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<SignUpOutcome, ProviderError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ProviderError>;
    async fn sign_out(&self) -> Result<(), ProviderError>;
    async fn get_session(&self) -> Result<Option<Session>, ProviderError>;
    async fn get_user(&self) -> Result<Option<User>, ProviderError>;
    async fn update_profile(&self, patch: &ProfilePatch) -> Result<User, ProviderError>;
    async fn reset_password(&self, email: &str) -> Result<(), ProviderError>;
    async fn update_password(&self, new_password: &str) -> Result<User, ProviderError>;
}

/// `localStorage` key holding the persisted session JSON.
const SESSION_STORAGE_KEY: &str = "potluck.auth.session";

/// Instruction shown when sign-up requires email confirmation.
pub const CONFIRMATION_MESSAGE: &str = "Please check your email to confirm your registration.";

/// Identity-service client backed by `gloo-net` and `localStorage`.
#[derive(Clone)]
pub struct IdentityClient {
    origin: String,
    api_key: String,
    subscribers: Rc<RefCell<Vec<UnboundedSender<SessionEvent>>>>,
}

impl IdentityClient {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            origin: config.provider_origin.clone(),
            api_key: config.provider_key.clone(),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn emit(&self, event: &SessionEvent) {
        self.subscribers
            .borrow_mut()
            .retain(|tx| tx.unbounded_send(event.clone()).is_ok());
    }

    #[cfg(any(test, feature = "hydrate"))]
    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.origin)
    }

    /// Read the persisted session, dropping it if the token has expired.
    fn stored_session(&self) -> Option<Session> {
        let session: Session = storage_load(SESSION_STORAGE_KEY)?;
        if session.is_expired(now_unix()) {
            storage_remove(SESSION_STORAGE_KEY);
            return None;
        }
        Some(session)
    }

    fn persist_session(&self, session: &Session) {
        storage_save(SESSION_STORAGE_KEY, session);
    }

    fn discard_session(&self) {
        storage_remove(SESSION_STORAGE_KEY);
    }
}

impl SessionProvider for IdentityClient {
    fn subscribe(&self) -> UnboundedReceiver<SessionEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.borrow_mut().push(tx);
        rx
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<SignUpOutcome, ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            let body = serde_json::json!({
                "email": email,
                "password": password,
                "data": { "name": name },
            });
            let resp = gloo_net::http::Request::post(&self.auth_url("signup"))
                .header("apikey", &self.api_key)
                .json(&body)
                .map_err(|e| ProviderError::Network(e.to_string()))?
                .send()
                .await
                .map_err(|e| ProviderError::Network(e.to_string()))?;
            let status = resp.status();
            let text = resp
                .text()
                .await
                .map_err(|e| ProviderError::Network(e.to_string()))?;
            if !(200..300).contains(&status) {
                return Err(rejected(status, &text));
            }
            let outcome = parse_signup_body(&text)?;
            if let SignUpOutcome::Active { session } = &outcome {
                self.persist_session(session);
                self.emit(&SessionEvent::SignedIn(session.clone()));
            }
            Ok(outcome)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email, password, name);
            Err(ProviderError::Unavailable)
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            let body = serde_json::json!({ "email": email, "password": password });
            let resp =
                gloo_net::http::Request::post(&self.auth_url("token?grant_type=password"))
                    .header("apikey", &self.api_key)
                    .json(&body)
                    .map_err(|e| ProviderError::Network(e.to_string()))?
                    .send()
                    .await
                    .map_err(|e| ProviderError::Network(e.to_string()))?;
            let status = resp.status();
            let text = resp
                .text()
                .await
                .map_err(|e| ProviderError::Network(e.to_string()))?;
            if !(200..300).contains(&status) {
                return Err(rejected(status, &text));
            }
            let wire: WireSession =
                serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))?;
            let session = Session::from(wire);
            self.persist_session(&session);
            self.emit(&SessionEvent::SignedIn(session.clone()));
            Ok(session)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email, password);
            Err(ProviderError::Unavailable)
        }
    }

    /// Local sign-out is never gated on the provider round-trip: the stored
    /// session is discarded and `SignedOut` emitted before the revocation
    /// call, so a network failure cannot leave a live local credential.
    async fn sign_out(&self) -> Result<(), ProviderError> {
        let token = self.stored_session().map(|s| s.access_token);
        self.discard_session();
        self.emit(&SessionEvent::SignedOut);
        #[cfg(feature = "hydrate")]
        {
            if let Some(token) = token {
                let resp = gloo_net::http::Request::post(&self.auth_url("logout"))
                    .header("apikey", &self.api_key)
                    .header("Authorization", &bearer(&token))
                    .send()
                    .await
                    .map_err(|e| ProviderError::Network(e.to_string()))?;
                let status = resp.status();
                if !(200..300).contains(&status) {
                    let text = resp.text().await.unwrap_or_default();
                    return Err(rejected(status, &text));
                }
            }
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
            Ok(())
        }
    }

    async fn get_session(&self) -> Result<Option<Session>, ProviderError> {
        Ok(self.stored_session())
    }

    async fn get_user(&self) -> Result<Option<User>, ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            let Some(session) = self.stored_session() else {
                return Ok(None);
            };
            let resp = gloo_net::http::Request::get(&self.auth_url("user"))
                .header("apikey", &self.api_key)
                .header("Authorization", &bearer(&session.access_token))
                .send()
                .await
                .map_err(|e| ProviderError::Network(e.to_string()))?;
            let status = resp.status();
            let text = resp
                .text()
                .await
                .map_err(|e| ProviderError::Network(e.to_string()))?;
            if !(200..300).contains(&status) {
                return Err(rejected(status, &text));
            }
            let wire: WireUser =
                serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))?;
            Ok(Some(User::from(wire)))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Ok(None)
        }
    }

    async fn update_profile(&self, patch: &ProfilePatch) -> Result<User, ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            let body = serde_json::json!({ "data": patch.to_metadata() });
            self.update_user(&body).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = patch;
            Err(ProviderError::Unavailable)
        }
    }

    async fn reset_password(&self, email: &str) -> Result<(), ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            let body = serde_json::json!({ "email": email });
            let resp = gloo_net::http::Request::post(&self.auth_url("recover"))
                .header("apikey", &self.api_key)
                .json(&body)
                .map_err(|e| ProviderError::Network(e.to_string()))?
                .send()
                .await
                .map_err(|e| ProviderError::Network(e.to_string()))?;
            let status = resp.status();
            if !(200..300).contains(&status) {
                let text = resp.text().await.unwrap_or_default();
                return Err(rejected(status, &text));
            }
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = email;
            Err(ProviderError::Unavailable)
        }
    }

    async fn update_password(&self, new_password: &str) -> Result<User, ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            let body = serde_json::json!({ "password": new_password });
            self.update_user(&body).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = new_password;
            Err(ProviderError::Unavailable)
        }
    }
}

#[cfg(feature = "hydrate")]
impl IdentityClient {
    /// Shared `PUT /auth/v1/user` path for profile and password updates.
    /// On success the persisted session is re-written with the fresh user so
    /// storage stays consistent, and `UserUpdated` is emitted.
    async fn update_user(&self, body: &serde_json::Value) -> Result<User, ProviderError> {
        let Some(session) = self.stored_session() else {
            return Err(ProviderError::Rejected {
                status: 401,
                message: "Auth session missing!".to_owned(),
            });
        };
        let resp = gloo_net::http::Request::put(&self.auth_url("user"))
            .header("apikey", &self.api_key)
            .header("Authorization", &bearer(&session.access_token))
            .json(body)
            .map_err(|e| ProviderError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(rejected(status, &text));
        }
        let wire: WireUser =
            serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))?;
        let user = User::from(wire);
        let refreshed = Session {
            access_token: session.access_token,
            expires_at: session.expires_at,
            user: user.clone(),
        };
        self.persist_session(&refreshed);
        self.emit(&SessionEvent::UserUpdated(user.clone()));
        Ok(user)
    }
}

/// Format a bearer header value for `token`.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Build a `Rejected` error from a non-2xx response body.
#[cfg(any(test, feature = "hydrate"))]
fn rejected(status: u16, body: &str) -> ProviderError {
    ProviderError::Rejected {
        status,
        message: error_message_from_body(body)
            .unwrap_or_else(|| format!("provider request failed: {status}")),
    }
}

/// Extract a human-readable message from a provider error payload.
///
/// GoTrue has used several field names across versions (`msg`, `message`,
/// `error_description`, `error`); take the first one present.
#[cfg(any(test, feature = "hydrate"))]
fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    for field in ["msg", "message", "error_description", "error"] {
        if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
            return Some(text.to_owned());
        }
    }
    None
}

/// Classify a sign-up response body: a session payload means auto-confirm is
/// on; a bare user object means the account awaits email confirmation.
#[cfg(any(test, feature = "hydrate"))]
fn parse_signup_body(body: &str) -> Result<SignUpOutcome, ProviderError> {
    if let Ok(wire) = serde_json::from_str::<WireSession>(body) {
        return Ok(SignUpOutcome::Active { session: Session::from(wire) });
    }
    let wire: WireUser =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;
    Ok(SignUpOutcome::ConfirmationPending {
        user: User::from(wire),
        message: CONFIRMATION_MESSAGE.to_owned(),
    })
}

/// Current Unix time in seconds; zero outside the browser.
#[allow(clippy::cast_possible_truncation)]
fn now_unix() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        (js_sys::Date::now() / 1000.0) as i64
    }
    #[cfg(not(feature = "hydrate"))]
    {
        0
    }
}

fn storage_load<T: serde::de::DeserializeOwned>(key: &str) -> Option<T> {
    #[cfg(feature = "hydrate")]
    {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
        let raw = storage.get_item(key).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = key;
        None
    }
}

fn storage_save<T: serde::Serialize>(key: &str, value: &T) {
    #[cfg(feature = "hydrate")]
    {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return;
        };
        let Ok(raw) = serde_json::to_string(value) else {
            return;
        };
        let _ = storage.set_item(key, &raw);
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (key, value);
    }
}

fn storage_remove(key: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.remove_item(key);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = key;
    }
}
