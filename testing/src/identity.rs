//! Canned identity provider

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity

use async_trait::async_trait;
use helpdesk_core::{IdentityProvider, Principal, Session, StoreError, User};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Accounts {
    passwords: HashMap<String, (String, Principal)>,
    tokens: HashMap<String, Session>,
}

/// Identity provider backed by a fixed set of accounts
///
/// Tokens are deterministic (`token-<user id>`), so tests can build bearer
/// headers without signing in first.
#[derive(Clone, Debug, Default)]
pub struct StaticIdentityProvider {
    accounts: Arc<RwLock<Accounts>>,
}

impl StaticIdentityProvider {
    /// Create a provider with no accounts
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `user` with `password` and return the session it signs in to
    pub fn register(&self, user: &User, password: &str) -> Session {
        let session = crate::fixtures::session_for(user);
        let mut accounts = self.accounts.write().unwrap();
        accounts.passwords.insert(
            user.email.clone(),
            (password.to_string(), session.principal.clone()),
        );
        accounts
            .tokens
            .insert(session.access_token.clone(), session.clone());
        session
    }

    /// Builder form of [`Self::register`]
    #[must_use]
    pub fn with_account(self, user: &User, password: &str) -> Self {
        self.register(user, password);
        self
    }

    /// Forget every token issued for `user`
    pub fn revoke(&self, user: &User) {
        self.accounts
            .write()
            .unwrap()
            .tokens
            .retain(|_, session| session.user_id() != user.id);
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        let accounts = self.accounts.read().unwrap();
        let (expected, principal) = accounts
            .passwords
            .get(email)
            .ok_or(StoreError::Unauthorized)?;
        if expected != password {
            return Err(StoreError::Unauthorized);
        }
        let token = crate::fixtures::token_for(principal.user_id);
        accounts
            .tokens
            .get(&token)
            .cloned()
            .ok_or(StoreError::Unauthorized)
    }

    async fn resolve(&self, access_token: &str) -> Result<Session, StoreError> {
        self.accounts
            .read()
            .unwrap()
            .tokens
            .get(access_token)
            .cloned()
            .ok_or(StoreError::Unauthorized)
    }
}
