//! Sign-in endpoints:
//! - POST /api/auth/login - Exchange email and password for a token
//! - GET /api/me - Current principal

use crate::auth::SessionUser;
use crate::server::state::AppState;
use axum::{Json, extract::State};
use helpdesk_core::{Principal, ValidationError};
use helpdesk_web::AppError;
use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent calls
    pub access_token: String,
    /// Who signed in
    pub user: Principal,
}

/// Sign in.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"email": "ada@example.com", "password": "secret"}'
/// ```
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = request.email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingField("email").into());
    }
    if request.password.is_empty() {
        return Err(ValidationError::MissingField("password").into());
    }

    let session = state.identity.sign_in(email, &request.password).await?;
    tracing::info!(user_id = %session.user_id(), role = %session.principal.role, "Signed in");

    Ok(Json(LoginResponse {
        access_token: session.access_token,
        user: session.principal,
    }))
}

/// Current principal.
pub async fn me(SessionUser(session): SessionUser) -> Json<Principal> {
    Json(session.principal)
}
