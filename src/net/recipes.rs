//! Recipe CRUD passthrough — mechanical request/response plumbing over the
//! authenticated pipeline in [`super::api`].

#[cfg(test)]
#[path = "recipes_test.rs"]
mod recipes_test;

use uuid::Uuid;

use super::api::{ApiClient, ApiError};
use super::provider::SessionProvider;
#[cfg(feature = "hydrate")]
use super::types::ParsedRecipe;
use super::types::{Recipe, RecipeDraft};

fn recipe_path(id: Uuid) -> String {
    format!("/recipes/{id}")
}

impl<P: SessionProvider> ApiClient<P> {
    /// List all recipes visible to the caller's groups.
    pub async fn recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        self.get_json("/recipes").await
    }

    pub async fn recipe(&self, id: Uuid) -> Result<Recipe, ApiError> {
        self.get_json(&recipe_path(id)).await
    }

    pub async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe, ApiError> {
        self.post_json("/recipes", draft).await
    }

    pub async fn update_recipe(&self, id: Uuid, draft: &RecipeDraft) -> Result<Recipe, ApiError> {
        self.put_json(&recipe_path(id), draft).await
    }

    pub async fn delete_recipe(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete_path(&recipe_path(id)).await
    }

    /// Upload a photo of a recipe and get back the fields the server could
    /// extract. This is the one multipart endpoint; the browser sets the
    /// content type (with boundary) itself.
    #[cfg(feature = "hydrate")]
    pub async fn parse_recipe_image(&self, file: &web_sys::File) -> Result<ParsedRecipe, ApiError> {
        use super::provider::bearer;

        let form = web_sys::FormData::new()
            .map_err(|_| ApiError::Transport("form data allocation failed".to_owned()))?;
        form.append_with_blob_and_filename("image", file, &file.name())
            .map_err(|_| ApiError::Transport("form data append failed".to_owned()))?;

        let token = self.store().live_token().await;
        let mut builder = gloo_net::http::Request::post(&self.url("/recipes/parse-image"));
        if let Some(token) = &token {
            builder = builder.header("Authorization", &bearer(token));
        }
        let resp = builder
            .body(form)
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let resp = self.intercept_response(resp).await?;
        let status = resp.status();
        if !(200..300).contains(&status) {
            let text = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status,
                message: super::api::api_error_message(&text, status),
            });
        }
        resp.json::<ParsedRecipe>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
