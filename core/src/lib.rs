//! # Helpdesk Core
//!
//! Domain model and core abstractions for the helpdesk.
//!
//! The helpdesk keeps no durable state of its own. Users, tickets and
//! messages live in a hosted relational backend reached through the
//! [`store_client::TicketStore`] trait; this crate defines the shape of that
//! contract and the types that flow through it.
//!
//! ## Core Concepts
//!
//! - **Entities**: [`types::User`], [`types::Ticket`], [`types::Message`]
//! - **Store Client**: [`store_client::TicketStore`], every call takes an explicit
//!   [`identity::Session`]
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//!   used by the view models
//! - **Effect**: Side effect descriptions executed by the runtime
//!
//! ## Example
//!
//! ```ignore
//! use helpdesk_core::{reducer::Reducer, effect::Effect, SmallVec};
//!
//! impl Reducer for ChatReducer {
//!     type State = ChatState;
//!     type Action = ChatAction;
//!     type Environment = ChatEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut ChatState,
//!         action: ChatAction,
//!         env: &ChatEnvironment,
//!     ) -> SmallVec<[Effect<ChatAction>; 4]> {
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

pub mod error;
pub mod identity;
pub mod store_client;
pub mod types;
pub mod workflow;

pub use error::{StoreError, ValidationError};
pub use identity::{IdentityProvider, Principal, Session};
pub use store_client::TicketStore;
pub use types::{
    Category, Message, MessageAuthor, MessageId, NewMessage, NewTicket, NewUser, Priority, Role,
    Ticket, TicketDetails, TicketId, TicketStatus, User, UserChanges, UserId,
};
pub use workflow::TransitionPolicy;

/// Reducer module - The core trait for view-model logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They hold all screen logic and are deterministic and testable. Remote
/// calls are described as [`Effect::Future`](crate::effect::Effect::Future)
/// values and executed by the runtime.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for screen logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The view state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap an async block as an effect
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock used in production
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
