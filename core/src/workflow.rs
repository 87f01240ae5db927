//! Ticket status transitions.
//!
//! The store accepts any status after any other. Callers that want a stricter
//! workflow pick [`TransitionPolicy::Strict`]:
//!
//! ```text
//! new ──▶ in_progress ──▶ resolved ──▶ closed
//!               │                        ▲
//!               └────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::TicketStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which status changes callers allow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Every status is reachable from every other status
    #[default]
    Unrestricted,
    /// Forward-only workflow shown in the module docs
    Strict,
}

impl TransitionPolicy {
    /// Whether `from → to` is allowed
    ///
    /// Setting a ticket to the status it already has is always allowed.
    #[must_use]
    pub const fn allows(self, from: TicketStatus, to: TicketStatus) -> bool {
        use TicketStatus::{Closed, InProgress, New, Resolved};

        if from as u8 == to as u8 {
            return true;
        }
        match self {
            Self::Unrestricted => true,
            Self::Strict => matches!(
                (from, to),
                (New, InProgress) | (InProgress, Resolved | Closed) | (Resolved, Closed)
            ),
        }
    }

    /// Check a transition
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TransitionNotAllowed`] when the policy
    /// forbids the change.
    pub const fn check(self, from: TicketStatus, to: TicketStatus) -> Result<(), ValidationError> {
        if self.allows(from, to) {
            Ok(())
        } else {
            Err(ValidationError::TransitionNotAllowed { from, to })
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unrestricted" => Ok(Self::Unrestricted),
            "strict" => Ok(Self::Strict),
            other => Err(ValidationError::UnknownValue {
                field: "status policy",
                value: other.to_string(),
            }),
        }
    }
}
