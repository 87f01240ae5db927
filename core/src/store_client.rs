//! The Ticket Store Client contract.
//!
//! Translates application intents into calls against the remote
//! collections (`tickets`, `messages`, `users`) and normalizes the results
//! into domain types.
//!
//! # Contract
//!
//! - Every call is a fresh round trip: no caching, no retry.
//! - Every call takes the caller's [`Session`] explicitly.
//! - Callers re-fetch the affected collection after each mutation instead of
//!   patching local state.
//! - Required-field checks happen in the caller (see
//!   [`NewTicket::validate`](crate::types::NewTicket::validate)); implementations
//!   do not validate.

use crate::error::StoreError;
use crate::identity::Session;
use crate::types::{
    Message, NewMessage, NewTicket, NewUser, Ticket, TicketDetails, TicketId, TicketStatus, User,
    UserChanges, UserId,
};
use async_trait::async_trait;

/// Read/write access to tickets, messages and users
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// All tickets visible to the caller, newest first
    ///
    /// Each ticket carries its owning user and its thread ordered oldest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the remote call fails.
    async fn list_tickets(&self, session: &Session) -> Result<Vec<TicketDetails>, StoreError>;

    /// Open a ticket owned by the caller, with status `new`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the remote call fails.
    async fn create_ticket(
        &self,
        session: &Session,
        ticket: NewTicket,
    ) -> Result<Ticket, StoreError>;

    /// Move a ticket to another status
    ///
    /// Any status may follow any other; transition rules belong to callers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown tickets and other
    /// [`StoreError`] variants if the remote call fails.
    async fn update_ticket_status(
        &self,
        session: &Session,
        id: TicketId,
        status: TicketStatus,
    ) -> Result<Ticket, StoreError>;

    /// Append a message to a ticket thread
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the remote call fails.
    async fn create_message(
        &self,
        session: &Session,
        message: NewMessage,
    ) -> Result<Message, StoreError>;

    /// All user accounts
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the remote call fails.
    async fn list_users(&self, session: &Session) -> Result<Vec<User>, StoreError>;

    /// Create a user account
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the remote call fails.
    async fn create_user(&self, session: &Session, user: NewUser) -> Result<User, StoreError>;

    /// Edit an existing user account
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown users and other
    /// [`StoreError`] variants if the remote call fails.
    async fn update_user(
        &self,
        session: &Session,
        id: UserId,
        changes: UserChanges,
    ) -> Result<User, StoreError>;

    /// Delete a user account
    ///
    /// Tickets owned by the user are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the remote call fails.
    async fn delete_user(&self, session: &Session, id: UserId) -> Result<(), StoreError>;
}
