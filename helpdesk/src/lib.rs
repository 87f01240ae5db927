//! # Helpdesk
//!
//! Customer-support helpdesk on top of a hosted relational backend.
//!
//! - [`admin_panel`], [`ticket_form`], [`chat`]: reducer-driven view models
//! - [`server`]: JSON HTTP facade for browser front ends
//! - [`config`]: environment configuration shared by the binaries
//!
//! All durable state lives in the remote store behind
//! [`TicketStore`](helpdesk_core::TicketStore). Mutations are always followed
//! by a fresh fetch of the affected collection.

#![allow(clippy::module_name_repetitions)]

pub mod admin_panel;
pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod server;
pub mod ticket_form;

pub use config::{Config, ConfigError, ServerConfig};
pub use server::{AppState, build_router, cors_layer};
