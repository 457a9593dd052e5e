//! Wire DTOs for the identity-provider and Potluck API boundaries.
//!
//! DESIGN
//! ======
//! Provider-side types mirror the GoTrue session payload
//! (`{access_token, user: {id, email, user_metadata}}`) so serde round-trips
//! stay lossless; API-side types mirror the backend schemas. Domain types
//! (`Session`, `User`) are what the rest of the crate handles; the `Wire*`
//! shapes never leave the `net` layer.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provider session payload as returned by token-grant and signup endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireSession {
    /// Bearer credential for outbound API calls.
    pub access_token: String,
    /// Unix timestamp (seconds) at which the access token expires.
    #[serde(default)]
    pub expires_at: i64,
    /// Opaque credential used by the provider for silent refresh.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Identity the session was issued for.
    pub user: WireUser,
}

/// Provider user payload (`user_metadata` carries profile fields).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// Credential bundle owned by the session store.
///
/// Treated as immutable: transitions replace the whole value, never patch
/// fields in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub expires_at: i64,
    pub user: User,
}

impl Session {
    /// Whether the token expiry has passed at `now` (Unix seconds).
    /// A zero `expires_at` means the provider sent no expiry; treat as live.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at != 0 && self.expires_at <= now
    }
}

/// Identity attached to a [`Session`]; absent whenever the session is absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    /// Display name, lifted out of the provider metadata for convenience.
    pub name: String,
    /// Full provider `user_metadata` object (avatar URL and friends).
    pub metadata: serde_json::Value,
}

impl From<WireUser> for User {
    fn from(wire: WireUser) -> Self {
        let name = wire
            .user_metadata
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_owned();
        Self { id: wire.id, email: wire.email, name, metadata: wire.user_metadata }
    }
}

impl From<WireSession> for Session {
    fn from(wire: WireSession) -> Self {
        Self {
            access_token: wire.access_token,
            expires_at: wire.expires_at,
            user: User::from(wire.user),
        }
    }
}

/// A recipe as served by the Potluck API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub group_id: Uuid,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub image_url: Option<String>,
    pub created_at: String,
}

/// Recipe payload for create and update calls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub group_id: Uuid,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub image_url: Option<String>,
}

/// Fields the server managed to extract from an uploaded recipe photo.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecipe {
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: String,
}

/// A recipe-sharing group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: String,
}

/// Membership record linking a user to a group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub joined_at: String,
}

/// The caller's profile as served by `/users/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_verified: bool,
    pub created_at: String,
}

/// Partial profile update for `PUT /users/me`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
