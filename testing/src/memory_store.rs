//! In-memory ticket store for fast, deterministic tests
//!
//! [`InMemoryTicketStore`] implements [`TicketStore`] over plain vectors and
//! mirrors the remote store closely enough for view-model and HTTP tests:
//! - tickets are listed newest first with owner and thread embedded
//! - users only see their own tickets, admins see all of them
//! - deleting a user leaves their tickets and messages in place
//! - reads and writes can be made to fail on demand

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only follows a test panic

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use helpdesk_core::environment::{Clock, SystemClock};
use helpdesk_core::{
    Message, MessageAuthor, MessageId, NewMessage, NewTicket, NewUser, Session, StoreError,
    Ticket, TicketDetails, TicketId, TicketStatus, TicketStore, User, UserChanges, UserId,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    tickets: Vec<Ticket>,
    messages: Vec<Message>,
    fail_reads: Option<StoreError>,
    fail_writes: Option<StoreError>,
}

/// In-memory stand-in for the remote ticket store
///
/// Clones share the same tables.
///
/// # Example
///
/// ```
/// use helpdesk_testing::{InMemoryTicketStore, fixtures};
/// use helpdesk_core::{NewTicket, TicketStatus, TicketStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryTicketStore::new();
/// let customer = store.seed_user(fixtures::customer());
/// let session = fixtures::session_for(&customer);
///
/// let ticket = store
///     .create_ticket(&session, NewTicket::new("Printer", "It is on fire"))
///     .await?;
/// assert_eq!(ticket.status, TicketStatus::New);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct InMemoryTicketStore {
    tables: Arc<RwLock<Tables>>,
    clock: Arc<dyn Clock>,
    reads: Arc<AtomicUsize>,
}

impl InMemoryTicketStore {
    /// Create an empty store using the wall clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Create an empty store stamping records with `clock`
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            clock: Arc::new(clock),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Insert a user as-is and return it
    pub fn seed_user(&self, user: User) -> User {
        self.tables.write().unwrap().users.push(user.clone());
        user
    }

    /// Insert a ticket as-is and return it
    ///
    /// Use this to control `created_at` when ordering matters.
    pub fn seed_ticket(&self, ticket: Ticket) -> Ticket {
        self.tables.write().unwrap().tickets.push(ticket.clone());
        ticket
    }

    /// Make every read fail with `error` until [`Self::heal`] is called
    pub fn fail_reads(&self, error: StoreError) {
        self.tables.write().unwrap().fail_reads = Some(error);
    }

    /// Make every write fail with `error` until [`Self::heal`] is called
    pub fn fail_writes(&self, error: StoreError) {
        self.tables.write().unwrap().fail_writes = Some(error);
    }

    /// Clear injected failures
    pub fn heal(&self) {
        let mut tables = self.tables.write().unwrap();
        tables.fail_reads = None;
        tables.fail_writes = None;
    }

    /// Number of list calls served so far (successful or not)
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of stored tickets
    #[must_use]
    pub fn ticket_count(&self) -> usize {
        self.tables.read().unwrap().tickets.len()
    }

    /// Number of stored messages
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.tables.read().unwrap().messages.len()
    }

    /// Look up a stored user
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<User> {
        self.tables
            .read()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    /// Look up a stored ticket
    #[must_use]
    pub fn ticket(&self, id: TicketId) -> Option<Ticket> {
        self.tables
            .read()
            .unwrap()
            .tickets
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn check_read(&self) -> Result<(), StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.tables
            .read()
            .unwrap()
            .fail_reads
            .clone()
            .map_or(Ok(()), Err)
    }

    fn check_write(&self) -> Result<(), StoreError> {
        self.tables
            .read()
            .unwrap()
            .fail_writes
            .clone()
            .map_or(Ok(()), Err)
    }
}

impl Default for InMemoryTicketStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryTicketStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read().unwrap();
        f.debug_struct("InMemoryTicketStore")
            .field("users", &tables.users.len())
            .field("tickets", &tables.tickets.len())
            .field("messages", &tables.messages.len())
            .finish_non_exhaustive()
    }
}

impl Tables {
    fn owner(&self, id: UserId) -> User {
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .unwrap_or_else(|| User::deleted(id))
    }

    fn author(&self, id: UserId) -> MessageAuthor {
        let owner = self.owner(id);
        MessageAuthor {
            id,
            name: owner.name,
        }
    }

    fn details(&self, ticket: &Ticket) -> TicketDetails {
        let mut messages: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| m.ticket_id == ticket.id)
            .map(|m| Message {
                author: self.author(m.author.id),
                ..m.clone()
            })
            .collect();
        messages.sort_by_key(|m| m.created_at);

        TicketDetails {
            ticket: ticket.clone(),
            user: self.owner(ticket.user_id),
            messages,
        }
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn list_tickets(&self, session: &Session) -> Result<Vec<TicketDetails>, StoreError> {
        self.check_read()?;
        let tables = self.tables.read().unwrap();

        let mut tickets: Vec<TicketDetails> = tables
            .tickets
            .iter()
            .rev()
            .filter(|t| session.is_admin() || t.user_id == session.user_id())
            .map(|t| tables.details(t))
            .collect();
        // Stable: equal timestamps keep newest-inserted first
        tickets.sort_by(|a, b| b.ticket.created_at.cmp(&a.ticket.created_at));
        Ok(tickets)
    }

    async fn create_ticket(
        &self,
        session: &Session,
        ticket: NewTicket,
    ) -> Result<Ticket, StoreError> {
        self.check_write()?;
        let created = Ticket {
            id: TicketId::new(),
            title: ticket.title,
            category: ticket.category,
            priority: ticket.priority,
            status: TicketStatus::New,
            description: ticket.description,
            created_at: self.now(),
            user_id: session.user_id(),
        };
        self.tables.write().unwrap().tickets.push(created.clone());
        Ok(created)
    }

    async fn update_ticket_status(
        &self,
        _session: &Session,
        id: TicketId,
        status: TicketStatus,
    ) -> Result<Ticket, StoreError> {
        self.check_write()?;
        let mut tables = self.tables.write().unwrap();
        let ticket = tables
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found("ticket", id))?;
        ticket.status = status;
        Ok(ticket.clone())
    }

    async fn create_message(
        &self,
        _session: &Session,
        message: NewMessage,
    ) -> Result<Message, StoreError> {
        self.check_write()?;
        let now = self.now();
        let mut tables = self.tables.write().unwrap();
        if !tables.tickets.iter().any(|t| t.id == message.ticket_id) {
            return Err(StoreError::not_found("ticket", message.ticket_id));
        }

        let created = Message {
            id: MessageId::new(),
            ticket_id: message.ticket_id,
            content: message.content,
            created_at: now,
            is_admin: message.is_admin,
            author: tables.author(message.author_id),
        };
        tables.messages.push(created.clone());
        Ok(created)
    }

    async fn list_users(&self, _session: &Session) -> Result<Vec<User>, StoreError> {
        self.check_read()?;
        let mut users = self.tables.read().unwrap().users.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn create_user(&self, _session: &Session, user: NewUser) -> Result<User, StoreError> {
        self.check_write()?;
        let now = self.now();
        let mut tables = self.tables.write().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Rejected {
                status: 409,
                message: format!("duplicate key value: email {} already exists", user.email),
            });
        }

        let created = User {
            id: UserId::new(),
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: now,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn update_user(
        &self,
        _session: &Session,
        id: UserId,
        changes: UserChanges,
    ) -> Result<User, StoreError> {
        self.check_write()?;
        let mut tables = self.tables.write().unwrap();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::not_found("user", id))?;
        changes.apply_to(user);
        Ok(user.clone())
    }

    async fn delete_user(&self, _session: &Session, id: UserId) -> Result<(), StoreError> {
        self.check_write()?;
        self.tables.write().unwrap().users.retain(|u| u.id != id);
        Ok(())
    }
}
