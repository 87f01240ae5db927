//! HTTP server module for the helpdesk.
//!
//! JSON facade over the ticket store for browser front ends.

pub mod routes;
pub mod state;

pub use routes::{build_router, cors_layer};
pub use state::AppState;
