//! Ready-made accounts and sessions

use crate::mocks::test_clock;
use helpdesk_core::environment::Clock;
use helpdesk_core::{Principal, Role, Session, User, UserId};

/// A `user`-role account with the given name and email
#[must_use]
pub fn user(name: &str, email: &str) -> User {
    User {
        id: UserId::new(),
        email: email.to_string(),
        name: name.to_string(),
        role: Role::User,
        created_at: test_clock().now(),
    }
}

/// A regular customer account
#[must_use]
pub fn customer() -> User {
    user("Casey Customer", "casey@example.com")
}

/// An admin account
#[must_use]
pub fn admin() -> User {
    User {
        role: Role::Admin,
        ..user("Ada Admin", "ada@example.com")
    }
}

/// Deterministic access token for an account
#[must_use]
pub fn token_for(id: UserId) -> String {
    format!("token-{id}")
}

/// Session for `user`, carrying [`token_for`] as its access token
#[must_use]
pub fn session_for(user: &User) -> Session {
    Session::new(
        token_for(user.id),
        Principal {
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        },
    )
}
