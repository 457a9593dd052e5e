//! Build-time configuration for the API and identity-service origins.
//!
//! WASM has no process environment at runtime, so values are baked in at
//! compile time via `option_env!`, with localhost defaults for development.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Origins and keys the network layer talks to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Potluck API origin (recipes, groups, profiles).
    pub api_origin: String,
    /// Identity-service origin serving `/auth/v1/*`.
    pub provider_origin: String,
    /// Publishable key sent as the `apikey` header on provider calls.
    pub provider_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_origin: option_env!("POTLUCK_API_ORIGIN")
                .unwrap_or("http://localhost:8000")
                .to_owned(),
            provider_origin: option_env!("POTLUCK_PROVIDER_ORIGIN")
                .unwrap_or("http://localhost:54321")
                .to_owned(),
            provider_key: option_env!("POTLUCK_PROVIDER_KEY")
                .unwrap_or("dev-publishable-key")
                .to_owned(),
        }
    }
}
