//! Caller identity.
//!
//! Every store call receives the caller's [`Session`] as an argument. There
//! is no ambient "current user": handlers and reducers pass the session they
//! were given.

use crate::error::StoreError;
use crate::types::{Role, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The authenticated account behind a session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Account ID
    pub user_id: UserId,
    /// Login email
    pub email: String,
    /// Display name
    pub name: String,
    /// Access role
    pub role: Role,
}

impl Principal {
    /// Whether the principal may use admin operations
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Explicit caller credential: an access token plus the principal it
/// identifies
///
/// `Debug` redacts the token so sessions can appear in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token forwarded to the remote store
    pub access_token: String,
    /// Who the token belongs to
    pub principal: Principal,
}

impl Session {
    /// Create a session
    #[must_use]
    pub fn new(access_token: impl Into<String>, principal: Principal) -> Self {
        Self {
            access_token: access_token.into(),
            principal,
        }
    }

    /// Account ID of the caller
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.principal.user_id
    }

    /// Whether the caller is an admin
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.principal.is_admin()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("principal", &self.principal)
            .finish()
    }
}

/// External authentication service
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange email and password for a session
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unauthorized`] for bad credentials and other
    /// [`StoreError`] variants when the provider cannot be reached.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, StoreError>;

    /// Rebuild a session from an access token
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unauthorized`] for unknown or expired tokens.
    async fn resolve(&self, access_token: &str) -> Result<Session, StoreError>;
}
