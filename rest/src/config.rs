//! Remote service location and public key.

use thiserror::Error;

/// Environment variable holding the service base URL
pub const URL_VAR: &str = "SUPABASE_URL";

/// Environment variable holding the public (anon) API key
pub const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";

/// Errors from loading remote configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or empty
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
}

/// Where the remote store lives and how to identify the application to it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Base URL without trailing slash, e.g. `https://abc.supabase.co`
    pub url: String,
    /// Public key sent as the `apikey` header on every request
    pub anon_key: String,
}

impl RemoteConfig {
    /// Create a config, normalizing the URL
    #[must_use]
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Load from `SUPABASE_URL` and `SUPABASE_ANON_KEY`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if either variable is absent or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if either variable is absent or blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        Ok(Self::new(required(URL_VAR)?, required(ANON_KEY_VAR)?))
    }

    /// URL of a table endpoint
    #[must_use]
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.url)
    }

    /// URL of an auth endpoint
    #[must_use]
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.url)
    }
}
