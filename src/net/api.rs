//! Authenticated REST pipeline for the Potluck API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every outbound call passes through two interception points:
//!
//! 1. Pre-send: a fresh token snapshot is read from the session store's
//!    live provider query (never a cached copy, so a provider-side silent
//!    refresh is honored) and attached as a bearer credential. The read
//!    completes before any bytes are transmitted, and each in-flight call
//!    carries its own snapshot.
//! 2. Post-receive: an HTTP 401 forces a global session teardown (logout +
//!    redirect to `/login`) and the original rejection still propagates to
//!    the caller. A rejected credential is never just one call's problem.
//!
//! Client-side (hydrate): real HTTP via `gloo-net`. Server-side (SSR):
//! stubs; these endpoints are only meaningful in the browser.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::provider::SessionProvider;
#[cfg(feature = "hydrate")]
use super::provider::bearer;
use super::types::{Profile, ProfileUpdate};
use crate::config::AppConfig;
use crate::state::auth::SessionStore;

/// Failure of an outbound API call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The server rejected the call's credential (HTTP 401). By the time the
    /// caller sees this, the global session teardown has already run.
    #[error("credential rejected: {message}")]
    Unauthorized { message: String },
    /// Any other non-2xx response.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// A 2xx response whose body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Clone, Copy, Debug)]
enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// HTTP status that signals a rejected credential.
#[must_use]
pub(crate) fn is_credential_rejection(status: u16) -> bool {
    status == 401
}

/// Global teardown on a rejected credential: force the store to Anonymous
/// and send the client back to the login entry point. The triggering call's
/// failure is propagated separately by the caller.
pub(crate) async fn credential_rejected<P: SessionProvider>(store: &SessionStore<P>) {
    leptos::logging::warn!("credential rejected by API, tearing down session");
    store.logout().await;
    redirect_to_login();
}

/// Navigate the browser to `/login`. No-op outside the browser.
pub(crate) fn redirect_to_login() {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href("/login");
        }
    }
}

/// Extract a display message from an API error body (FastAPI-style
/// `{"detail": ...}`, with fallbacks), or synthesize one from the status.
#[cfg(any(test, feature = "hydrate"))]
pub(super) fn api_error_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["detail", "message", "error"] {
            if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                return text.to_owned();
            }
        }
    }
    format!("request failed: {status}")
}

/// Potluck API client carrying the injected session store.
#[derive(Clone)]
pub struct ApiClient<P: SessionProvider> {
    origin: String,
    store: SessionStore<P>,
}

impl<P: SessionProvider> ApiClient<P> {
    #[must_use]
    pub fn new(config: &AppConfig, store: SessionStore<P>) -> Self {
        Self { origin: config.api_origin.clone(), store }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore<P> {
        &self.store
    }

    #[cfg(any(test, feature = "hydrate"))]
    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.origin)
    }

    /// Fetch the caller's profile from `GET /users/me`.
    pub async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        self.request_json(HttpMethod::Get, "/users/me", None).await
    }

    /// Update the caller's profile via `PUT /users/me`.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        self.request_json(HttpMethod::Put, "/users/me", Some(to_body(update)?)).await
    }

    /// Send a JSON request and decode a JSON response, applying both
    /// authenticator interception points.
    async fn request_json<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = self.dispatch(method, path, body).await?;
            let status = resp.status();
            let text = resp
                .text()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            if !(200..300).contains(&status) {
                return Err(ApiError::Status { status, message: api_error_message(&text, status) });
            }
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (method, path, body);
            Err(ApiError::Transport("not available on server".to_owned()))
        }
    }

    /// Send a JSON request where only the status matters (deletes).
    async fn request_unit(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = self.dispatch(method, path, body).await?;
            let status = resp.status();
            if !(200..300).contains(&status) {
                let text = resp.text().await.unwrap_or_default();
                return Err(ApiError::Status { status, message: api_error_message(&text, status) });
            }
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (method, path, body);
            Err(ApiError::Transport("not available on server".to_owned()))
        }
    }

    /// Build and send one request: fresh token snapshot, bearer attach,
    /// transmit, then the 401 interception. The snapshot is read before the
    /// request is built, so it is complete before any bytes go out.
    #[cfg(feature = "hydrate")]
    async fn dispatch(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<gloo_net::http::Response, ApiError> {
        let url = self.url(path);
        let token = self.store.live_token().await;
        let mut builder = match method {
            HttpMethod::Get => gloo_net::http::Request::get(&url),
            HttpMethod::Post => gloo_net::http::Request::post(&url),
            HttpMethod::Put => gloo_net::http::Request::put(&url),
            HttpMethod::Delete => gloo_net::http::Request::delete(&url),
        };
        if let Some(token) = &token {
            builder = builder.header("Authorization", &bearer(token));
        }
        let request = match body {
            Some(value) => builder
                .json(&value)
                .map_err(|e| ApiError::Transport(e.to_string()))?,
            None => builder.build().map_err(|e| ApiError::Transport(e.to_string()))?,
        };
        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        self.intercept_response(resp).await
    }

    /// Post-receive hook: runs exactly once per response, independently of
    /// any other in-flight call.
    #[cfg(feature = "hydrate")]
    pub(super) async fn intercept_response(
        &self,
        resp: gloo_net::http::Response,
    ) -> Result<gloo_net::http::Response, ApiError> {
        let status = resp.status();
        if is_credential_rejection(status) {
            let text = resp.text().await.unwrap_or_default();
            let message = api_error_message(&text, status);
            credential_rejected(&self.store).await;
            return Err(ApiError::Unauthorized { message });
        }
        Ok(resp)
    }
}

// CRUD helpers shared by the recipes and groups endpoint modules.
impl<P: SessionProvider> ApiClient<P> {
    pub(super) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json(HttpMethod::Get, path, None).await
    }

    pub(super) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request_json(HttpMethod::Post, path, Some(to_body(body)?)).await
    }

    pub(super) async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request_json(HttpMethod::Put, path, Some(to_body(body)?)).await
    }

    pub(super) async fn delete_path(&self, path: &str) -> Result<(), ApiError> {
        self.request_unit(HttpMethod::Delete, path, None).await
    }
}

fn to_body<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Transport(e.to_string()))
}
