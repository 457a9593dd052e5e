//! Group CRUD and membership passthrough — mechanical plumbing over the
//! authenticated pipeline in [`super::api`].

#[cfg(test)]
#[path = "groups_test.rs"]
mod groups_test;

use serde::Serialize;
use uuid::Uuid;

use super::api::{ApiClient, ApiError};
use super::provider::SessionProvider;
use super::types::{Group, GroupMember};

fn group_path(id: Uuid) -> String {
    format!("/groups/{id}")
}

fn members_path(group_id: Uuid) -> String {
    format!("/groups/{group_id}/members")
}

#[derive(Debug, Serialize)]
struct GroupBody<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct MemberBody<'a> {
    email: &'a str,
}

impl<P: SessionProvider> ApiClient<P> {
    /// List the caller's groups.
    pub async fn groups(&self) -> Result<Vec<Group>, ApiError> {
        self.get_json("/groups").await
    }

    pub async fn create_group(&self, name: &str) -> Result<Group, ApiError> {
        self.post_json("/groups", &GroupBody { name }).await
    }

    pub async fn update_group(&self, id: Uuid, name: &str) -> Result<Group, ApiError> {
        self.put_json(&group_path(id), &GroupBody { name }).await
    }

    pub async fn delete_group(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete_path(&group_path(id)).await
    }

    pub async fn group_members(&self, group_id: Uuid) -> Result<Vec<GroupMember>, ApiError> {
        self.get_json(&members_path(group_id)).await
    }

    /// Invite a member by email.
    pub async fn add_group_member(
        &self,
        group_id: Uuid,
        email: &str,
    ) -> Result<GroupMember, ApiError> {
        self.post_json(&members_path(group_id), &MemberBody { email }).await
    }

    pub async fn remove_group_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), ApiError> {
        self.delete_path(&format!("{}/{user_id}", members_path(group_id))).await
    }
}
