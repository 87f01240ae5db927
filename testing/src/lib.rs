//! # Helpdesk Testing
//!
//! Testing utilities for the helpdesk.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - [`InMemoryTicketStore`], a [`TicketStore`](helpdesk_core::TicketStore) with failure injection
//! - [`StaticIdentityProvider`] with deterministic tokens
//! - [`FixedClock`] and ready-made [`fixtures`]
//!
//! ## Example
//!
//! ```ignore
//! use helpdesk_testing::{InMemoryTicketStore, fixtures, test_clock};
//! use helpdesk_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_refresh_loads_tickets() {
//!     let remote = InMemoryTicketStore::with_clock(test_clock());
//!     let admin = fixtures::session_for(&remote.seed_user(fixtures::admin()));
//!     let store = Store::new(AdminPanelState::default(), AdminPanelReducer, env(remote, admin));
//!
//!     store.send(AdminPanelAction::Refresh).await?.wait().await;
//!
//!     assert!(store.state(|s| s.error().is_none()).await);
//! }
//! ```

use chrono::{DateTime, Utc};
use helpdesk_core::environment::Clock;

pub mod fixtures;
pub mod identity;
pub mod memory_store;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use helpdesk_testing::mocks::FixedClock;
    /// use helpdesk_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use identity::StaticIdentityProvider;
pub use memory_store::InMemoryTicketStore;
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions, collect_actions};
