//! Caller authentication for the HTTP facade.
//!
//! Sign-in itself is delegated to the configured
//! [`IdentityProvider`](helpdesk_core::IdentityProvider); this module only
//! turns bearer tokens back into sessions.

pub mod middleware;

pub use middleware::{RequireAdmin, SessionUser};
