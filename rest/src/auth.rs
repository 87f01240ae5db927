//! [`IdentityProvider`] over the hosted auth API.
//!
//! The auth API only knows who a token belongs to. The role comes from the
//! caller's own row in the `users` collection; accounts without a row there
//! are plain users.

use crate::config::RemoteConfig;
use crate::http::{RemoteClient, SINGLE_OBJECT};
use crate::rows::{USER_COLUMNS, UserMeta, UserRow};
use async_trait::async_trait;
use helpdesk_core::{IdentityProvider, Principal, Role, Session, StoreError, UserId};
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMeta>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

/// Password sign-in and token resolution against the auth API
#[derive(Clone, Debug)]
pub struct RestIdentityProvider {
    remote: RemoteClient,
}

impl RestIdentityProvider {
    /// Create a provider with a default reqwest [`Client`]
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a provider reusing an existing reqwest [`Client`]
    #[must_use]
    pub fn with_client(client: Client, config: RemoteConfig) -> Self {
        Self {
            remote: RemoteClient::new(client, config),
        }
    }

    async fn session(&self, access_token: String, user: AuthUser) -> Result<Session, StoreError> {
        let id = user.id.to_string();
        let request = self
            .remote
            .table(Method::GET, "users", &access_token)
            .query(&[("id", format!("eq.{id}").as_str()), ("select", USER_COLUMNS)])
            .header("Accept", SINGLE_OBJECT);

        let row = match self.remote.fetch::<UserRow>("user", Some(&id), request).await {
            Ok(row) => Some(row),
            Err(StoreError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };

        let metadata_name = user
            .user_metadata
            .and_then(|meta| meta.name)
            .filter(|name| !name.trim().is_empty());
        let email = user.email.unwrap_or_default();

        let principal = match row {
            Some(row) => {
                let profile = row.into_user();
                Principal {
                    user_id: user.id,
                    email: if email.is_empty() { profile.email } else { email },
                    name: profile.name,
                    role: profile.role,
                }
            },
            None => Principal {
                user_id: user.id,
                name: metadata_name.unwrap_or_else(|| email.clone()),
                email,
                role: Role::User,
            },
        };

        Ok(Session::new(access_token, principal))
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    #[tracing::instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        let request = self
            .remote
            .auth(Method::POST, "token")
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let token: TokenResponse = match self.remote.fetch("auth", None, request).await {
            Ok(token) => token,
            // GoTrue answers bad credentials with 400 invalid_grant
            Err(StoreError::Rejected { status: 400, .. }) => return Err(StoreError::Unauthorized),
            Err(e) => return Err(e),
        };

        let session = self.session(token.access_token, token.user).await?;
        tracing::info!(user_id = %session.user_id(), role = %session.principal.role, "Signed in");
        Ok(session)
    }

    #[tracing::instrument(skip_all)]
    async fn resolve(&self, access_token: &str) -> Result<Session, StoreError> {
        let request = self
            .remote
            .auth(Method::GET, "user")
            .bearer_auth(access_token);

        let user: AuthUser = match self.remote.fetch("auth", None, request).await {
            Ok(user) => user,
            Err(StoreError::Rejected { status: 403, .. }) => return Err(StoreError::Unauthorized),
            Err(e) => return Err(e),
        };

        self.session(access_token.to_string(), user).await
    }
}
