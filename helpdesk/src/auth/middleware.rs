//! Authentication extractors for the helpdesk API.
//!
//! - [`SessionUser`]: any signed-in caller
//! - [`RequireAdmin`]: signed-in caller with the `admin` role
//!
//! # Usage
//!
//! ```rust,ignore
//! async fn list_users(
//!     RequireAdmin(session): RequireAdmin,
//!     State(state): State<AppState>,
//! ) -> Result<Json<Vec<User>>, AppError> {
//!     Ok(Json(state.store.list_users(&session).await?))
//! }
//! ```

use crate::server::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use helpdesk_core::Session;
use helpdesk_web::{AppError, BearerToken};

/// Authenticated caller.
///
/// Resolves the bearer token through the identity provider. Missing,
/// malformed or rejected tokens answer 401.
#[derive(Debug, Clone)]
pub struct SessionUser(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let session = state.identity.resolve(&token).await?;
        Ok(Self(session))
    }
}

/// Authenticated caller with the `admin` role.
///
/// Answers 403 for signed-in non-admins.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionUser(session) = SessionUser::from_request_parts(parts, state).await?;
        if !session.is_admin() {
            tracing::warn!(user_id = %session.user_id(), "Admin route refused");
            return Err(AppError::forbidden("Admin role required"));
        }
        Ok(Self(session))
    }
}
