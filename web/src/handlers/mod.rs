//! Shared HTTP handlers.

pub mod health;

pub use health::{Health, liveness};
