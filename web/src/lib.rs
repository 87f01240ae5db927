//! # Helpdesk Web
//!
//! Axum plumbing shared by the helpdesk HTTP facade.
//!
//! Handlers stay thin: extract the caller, call the ticket store, map the
//! result. This crate supplies the pieces every handler needs:
//!
//! - [`AppError`]: JSON error responses mapped from store and validation errors
//! - [`BearerToken`] and [`CorrelationId`] extractors
//! - [`correlation_id_layer`]: correlation IDs on spans and responses
//! - [`handlers::liveness`]: the `/health` body
//!
//! # Example
//!
//! ```ignore
//! use helpdesk_web::{AppError, BearerToken, correlation_id_layer};
//! use axum::{Router, routing::get, Json};
//!
//! async fn me(token: BearerToken) -> Result<Json<Principal>, AppError> {
//!     let session = identity.resolve(&token.0).await?;
//!     Ok(Json(session.principal))
//! }
//!
//! let app = Router::new()
//!     .route("/api/me", get(me))
//!     .layer(correlation_id_layer());
//! ```

#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{BearerToken, CorrelationId};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};

