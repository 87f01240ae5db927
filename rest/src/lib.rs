//! # Helpdesk REST
//!
//! Client for the hosted backend that owns all helpdesk data: a PostgREST
//! table API under `/rest/v1` and an auth API under `/auth/v1`.
//!
//! - [`RestTicketStore`] implements [`TicketStore`](helpdesk_core::TicketStore)
//! - [`RestIdentityProvider`] implements [`IdentityProvider`](helpdesk_core::IdentityProvider)
//!
//! ## Example
//!
//! ```rust,no_run
//! use helpdesk_core::{IdentityProvider, TicketStore};
//! use helpdesk_rest::{RemoteConfig, RestIdentityProvider, RestTicketStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RemoteConfig::from_env()?;
//! let identity = RestIdentityProvider::new(config.clone());
//! let store = RestTicketStore::new(config);
//!
//! let session = identity.sign_in("ada@example.com", "secret").await?;
//! let tickets = store.list_tickets(&session).await?;
//! println!("{} tickets", tickets.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
mod http;
pub mod rows;
pub mod store;

pub use auth::RestIdentityProvider;
pub use config::{ConfigError, RemoteConfig};
pub use store::RestTicketStore;
