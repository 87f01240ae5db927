//! State and actions for the admin panel.

use helpdesk_core::{
    Message, NewUser, StoreError, Ticket, TicketDetails, TicketId, TicketStatus, User,
    UserChanges, UserId, ValidationError,
};
use std::fmt;
use std::str::FromStr;

/// Which list the panel shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    /// Support tickets
    #[default]
    Tickets,
    /// User accounts
    Users,
}

/// Status filter over the ticket list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Show every ticket
    #[default]
    All,
    /// Show tickets in one status
    Only(TicketStatus),
}

impl StatusFilter {
    /// Whether a ticket in `status` passes the filter
    #[must_use]
    pub fn matches(self, status: TicketStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => status.fmt(f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Everything the admin panel shows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminPanelState {
    /// Active tab
    pub tab: Tab,
    /// Free-text search over the active list
    pub search: String,
    /// Ticket status filter
    pub status_filter: StatusFilter,
    /// Ticket opened in the detail view
    pub selected_ticket: Option<TicketId>,
    /// Last fetched tickets, newest first
    pub tickets: Vec<TicketDetails>,
    /// Last fetched users
    pub users: Vec<User>,
    /// A ticket fetch is in flight
    pub loading_tickets: bool,
    /// A user fetch is in flight
    pub loading_users: bool,
    /// Failed ticket read or ticket write; cleared by the next success
    pub tickets_error: Option<String>,
    /// Failed user read; cleared by the next successful user read
    pub users_error: Option<String>,
    /// Message shown in the user create/edit form
    pub user_form_error: Option<String>,
    /// The session is not allowed to use the panel
    pub access_denied: bool,
}

impl AdminPanelState {
    /// First error to show, tickets before users
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.tickets_error
            .as_deref()
            .or(self.users_error.as_deref())
    }

    /// Tickets after applying search and status filter
    ///
    /// Search is case-insensitive over the title and the owner's name and
    /// email.
    #[must_use]
    pub fn visible_tickets(&self) -> Vec<&TicketDetails> {
        let needle = self.search.trim().to_lowercase();
        self.tickets
            .iter()
            .filter(|t| self.status_filter.matches(t.ticket.status))
            .filter(|t| {
                needle.is_empty()
                    || contains(&t.ticket.title, &needle)
                    || contains(&t.user.name, &needle)
                    || contains(&t.user.email, &needle)
            })
            .collect()
    }

    /// Users whose name or email matches the search
    #[must_use]
    pub fn visible_users(&self) -> Vec<&User> {
        let needle = self.search.trim().to_lowercase();
        self.users
            .iter()
            .filter(|u| needle.is_empty() || contains(&u.name, &needle) || contains(&u.email, &needle))
            .collect()
    }

    /// The ticket open in the detail view, if it is still listed
    #[must_use]
    pub fn selected(&self) -> Option<&TicketDetails> {
        let id = self.selected_ticket?;
        self.tickets.iter().find(|t| t.id() == id)
    }

    /// Look up a listed ticket
    #[must_use]
    pub fn ticket(&self, id: TicketId) -> Option<&TicketDetails> {
        self.tickets.iter().find(|t| t.id() == id)
    }
}

fn contains(haystack: &str, lowercase_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_needle)
}

/// Admin panel actions
///
/// Commands come from the operator; the `*Loaded`, `*Changed`, `*Sent`,
/// `*Saved` and `*Deleted` variants carry results of remote calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdminPanelAction {
    // Navigation
    /// Switch tabs
    SelectTab(Tab),
    /// Update the search text
    Search(String),
    /// Update the status filter
    FilterStatus(StatusFilter),
    /// Open or close a ticket's detail view
    SelectTicket(Option<TicketId>),

    // Reads
    /// Fetch tickets and users
    Refresh,
    /// Fetch tickets only
    LoadTickets,
    /// Fetch users only
    LoadUsers,
    /// Ticket fetch finished
    TicketsLoaded(Result<Vec<TicketDetails>, StoreError>),
    /// User fetch finished
    UsersLoaded(Result<Vec<User>, StoreError>),

    // Ticket writes
    /// Move a ticket to another status
    ChangeStatus {
        /// Ticket to change
        ticket_id: TicketId,
        /// Requested status
        status: TicketStatus,
    },
    /// The current status, read from the store, does not allow the change
    StatusRefused(ValidationError),
    /// Status update finished
    StatusChanged(Result<Ticket, StoreError>),
    /// Post a support reply on a ticket
    Reply {
        /// Ticket to answer
        ticket_id: TicketId,
        /// Reply text
        content: String,
    },
    /// Reply finished
    ReplySent(Result<Message, StoreError>),

    // User writes
    /// Create an account
    CreateUser(NewUser),
    /// Edit an account
    UpdateUser {
        /// Account to edit
        id: UserId,
        /// Fields to change
        changes: UserChanges,
    },
    /// Delete an account
    DeleteUser(UserId),
    /// Create or edit finished
    UserSaved(Result<User, StoreError>),
    /// Delete finished
    UserDeleted(Result<UserId, StoreError>),
}
