//! User administration endpoints (admin only):
//! - GET /api/admin/users
//! - POST /api/admin/users
//! - PATCH /api/admin/users/:id
//! - DELETE /api/admin/users/:id

use crate::auth::RequireAdmin;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use helpdesk_core::{NewUser, User, UserChanges, UserId};
use helpdesk_web::AppError;
use uuid::Uuid;

/// List all accounts.
pub async fn list_users(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.store.list_users(&session).await?))
}

/// Create an account.
pub async fn create_user(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    request.validate()?;
    let user = state.store.create_user(&session, request).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Edit an account.
pub async fn update_user(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<UserChanges>,
) -> Result<Json<User>, AppError> {
    changes.validate()?;
    let user = state
        .store
        .update_user(&session, UserId::from_uuid(id), changes)
        .await?;
    Ok(Json(user))
}

/// Delete an account. Its tickets stay.
pub async fn delete_user(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let id = UserId::from_uuid(id);
    state.store.delete_user(&session, id).await?;
    tracing::info!(user_id = %id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
