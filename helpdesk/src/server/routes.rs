//! Router configuration for the helpdesk.

use super::state::AppState;
use crate::api::{auth, tickets, users};
use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::{get, patch, post},
};
use helpdesk_web::{correlation_id_layer, handlers::Health};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

// Header names must be lowercase for `from_static`.
const CORRELATION_ID_HEADER_LOWER: &str = "x-correlation-id";

async fn health() -> Json<Health> {
    helpdesk_web::handlers::liveness(env!("CARGO_PKG_VERSION"))
}

/// Build the complete Axum router.
///
/// - `/health`: liveness, no authentication
/// - `/api/auth/login`, `/api/me`: sign-in and current principal
/// - `/api/tickets`: customer ticket routes
/// - `/api/admin/...`: admin-only ticket and user routes
pub fn build_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/tickets/:id/status", patch(tickets::update_status))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            patch(users::update_user).delete(users::delete_user),
        );

    let api_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/me", get(auth::me))
        .route(
            "/tickets",
            get(tickets::list_tickets).post(tickets::create_ticket),
        )
        .route("/tickets/:id/messages", post(tickets::post_message))
        .nest("/admin", admin_routes);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes)
        .layer(correlation_id_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for browser front ends.
///
/// An empty origin list allows any origin. Entries that are not valid
/// header values are skipped with a warning.
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::HeaderName::from_static(CORRELATION_ID_HEADER_LOWER)]);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}
