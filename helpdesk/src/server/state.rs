//! Application state for the helpdesk HTTP server.

use helpdesk_core::{IdentityProvider, TicketStore, TransitionPolicy};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Immutable after startup; cloning copies two `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Remote ticket store
    pub store: Arc<dyn TicketStore>,
    /// Sign-in and token resolution
    pub identity: Arc<dyn IdentityProvider>,
    /// Status changes the admin routes accept
    pub policy: TransitionPolicy,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        store: Arc<dyn TicketStore>,
        identity: Arc<dyn IdentityProvider>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            store,
            identity,
            policy,
        }
    }
}
