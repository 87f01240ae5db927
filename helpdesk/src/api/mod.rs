//! JSON API handlers.

pub mod auth;
pub mod tickets;
pub mod users;
