//! Domain types for the helpdesk.
//!
//! Three collections make up the data model: users, tickets and the
//! append-only message thread attached to each ticket. Ticket reads embed
//! the owning [`User`] and the ordered [`Message`] list, see
//! [`TicketDetails`].

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Creates a new random `TicketId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `TicketId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TicketId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Unique identifier for a user account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `UserId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Unique identifier for a message in a ticket thread
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random `MessageId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `MessageId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Account role. Only admins may open the admin panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer
    #[default]
    User,
    /// Support staff
    Admin,
}

impl Role {
    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(ValidationError::UnknownValue {
                field: "role",
                value: other.to_string(),
            }),
        }
    }
}

/// Ticket lifecycle status. Closed set of four values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Freshly created, nobody has picked it up yet
    #[default]
    New,
    /// An admin is working on it
    InProgress,
    /// Answer given
    Resolved,
    /// Archived
    Closed,
}

impl TicketStatus {
    /// Every status, in workflow order
    pub const ALL: [Self; 4] = [Self::New, Self::InProgress, Self::Resolved, Self::Closed];

    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownValue {
                field: "status",
                value: s.to_string(),
            })
    }
}

/// Ticket urgency
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait
    Low,
    /// Normal
    #[default]
    Medium,
    /// Needs attention today
    High,
    /// Drop everything
    Urgent,
}

impl Priority {
    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket topic
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Technical problem
    #[default]
    Technical,
    /// Payments and invoices
    Billing,
    /// Account access and settings
    Account,
    /// Anything else
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Technical => "technical",
            Self::Billing => "billing",
            Self::Account => "account",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A user account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account ID
    pub id: UserId,
    /// Login email
    pub email: String,
    /// Display name
    pub name: String,
    /// Access role
    pub role: Role,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether this account may use the admin panel
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Stand-in for an owner or author whose account was deleted
    ///
    /// Deleting a user does not cascade, so reads may reference accounts
    /// that no longer exist.
    #[must_use]
    pub fn deleted(id: UserId) -> Self {
        Self {
            id,
            email: String::new(),
            name: DELETED_USER_NAME.to_string(),
            role: Role::User,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// Display name used for accounts that no longer exist
pub const DELETED_USER_NAME: &str = "Deleted user";

/// A ticket row as stored remotely
///
/// `user_id` is the owning user and never changes after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket ID
    pub id: TicketId,
    /// Short subject
    pub title: String,
    /// Topic
    pub category: Category,
    /// Urgency
    pub priority: Priority,
    /// Lifecycle status
    pub status: TicketStatus,
    /// Problem description
    pub description: String,
    /// When the ticket was opened
    pub created_at: DateTime<Utc>,
    /// Owning user
    pub user_id: UserId,
}

/// Author metadata resolved on message reads
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAuthor {
    /// Author account
    pub id: UserId,
    /// Display name at read time
    pub name: String,
}

/// One entry in a ticket's conversation thread
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message ID
    pub id: MessageId,
    /// Ticket this message belongs to
    pub ticket_id: TicketId,
    /// Body text
    pub content: String,
    /// When the message was appended
    pub created_at: DateTime<Utc>,
    /// Written by support staff
    pub is_admin: bool,
    /// Who wrote it
    pub author: MessageAuthor,
}

/// A ticket with its owner and thread embedded, as returned by list reads
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDetails {
    /// The ticket row
    #[serde(flatten)]
    pub ticket: Ticket,
    /// Owning user
    pub user: User,
    /// Thread, oldest first
    pub messages: Vec<Message>,
}

impl TicketDetails {
    /// Ticket ID shortcut
    #[must_use]
    pub const fn id(&self) -> TicketId {
        self.ticket.id
    }

    /// Whether `user_id` owns this ticket
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.ticket.user_id == user_id
    }

    /// Most recent message in the thread
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

// ============================================================================
// Write payloads
// ============================================================================

/// Fields for opening a ticket. The owner comes from the caller's session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    /// Short subject (required)
    pub title: String,
    /// Topic
    #[serde(default)]
    pub category: Category,
    /// Urgency
    #[serde(default)]
    pub priority: Priority,
    /// Problem description (required)
    pub description: String,
}

impl NewTicket {
    /// Ticket with default category and priority
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: Category::default(),
            priority: Priority::default(),
            description: description.into(),
        }
    }

    /// Set the category
    #[must_use]
    pub const fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Check the required fields
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when the title or the
    /// description is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingField("description"));
        }
        Ok(())
    }
}

/// Fields for appending a message to a ticket thread
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    /// Target ticket
    pub ticket_id: TicketId,
    /// Body text
    pub content: String,
    /// Written by support staff
    pub is_admin: bool,
    /// Author account
    pub author_id: UserId,
}

impl NewMessage {
    /// Check the message body
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when the content is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::MissingField("content"));
        }
        Ok(())
    }
}

/// Fields for creating a user from the admin panel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Login email
    pub email: String,
    /// Display name
    pub name: String,
    /// Access role, `user` when omitted
    #[serde(default)]
    pub role: Role,
}

impl NewUser {
    /// Check the required fields
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] for a blank name or email and
    /// [`ValidationError::InvalidEmail`] when the email has no `@`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        validate_email(&self.email)
    }
}

/// Partial update of a user account
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChanges {
    /// New login email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserChanges {
    /// Nothing to change
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.role.is_none()
    }

    /// Check the fields that are present
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an empty change set, a blank name or a
    /// malformed email.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NothingToUpdate);
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::MissingField("name"));
            }
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    /// Apply these changes to a local copy
    pub fn apply_to(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(name) = &self.name {
            user.name.clone_from(name);
        }
        if let Some(role) = self.role {
            user.role = role;
        }
    }
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidEmail(email.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&TicketStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        assert_eq!("resolved".parse::<TicketStatus>().unwrap(), TicketStatus::Resolved);
        assert!("reopened".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn test_new_ticket_defaults() {
        let ticket = NewTicket::new("Cannot log in", "Second day in a row");
        assert_eq!(ticket.category, Category::Technical);
        assert_eq!(ticket.priority, Priority::Medium);
        assert!(ticket.validate().is_ok());
    }

    #[test]
    fn test_new_ticket_requires_title_and_description() {
        assert_eq!(
            NewTicket::new("  ", "body").validate(),
            Err(ValidationError::MissingField("title"))
        );
        assert_eq!(
            NewTicket::new("title", "").validate(),
            Err(ValidationError::MissingField("description"))
        );
    }

    #[test]
    fn test_new_ticket_deserializes_with_defaults() {
        let ticket: NewTicket =
            serde_json::from_str(r#"{"title":"X","description":"Y"}"#).unwrap();
        assert_eq!(ticket, NewTicket::new("X", "Y"));
    }

    #[test]
    fn test_new_user_email_checks() {
        let mut user = NewUser {
            email: "ivan@example.com".to_string(),
            name: "Ivan".to_string(),
            role: Role::User,
        };
        assert!(user.validate().is_ok());

        user.email = "ivan.example.com".to_string();
        assert!(matches!(user.validate(), Err(ValidationError::InvalidEmail(_))));
    }

    #[test]
    fn test_user_changes_apply() {
        let mut user = User {
            id: UserId::new(),
            email: "a@example.com".to_string(),
            name: "A".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        };
        let changes = UserChanges {
            role: Some(Role::Admin),
            ..UserChanges::default()
        };
        assert!(changes.validate().is_ok());
        changes.apply_to(&mut user);
        assert!(user.is_admin());
        assert_eq!(user.name, "A");

        assert_eq!(
            UserChanges::default().validate(),
            Err(ValidationError::NothingToUpdate)
        );
    }

    #[test]
    fn test_details_flatten_ticket_fields() {
        let owner = UserId::new();
        let details = TicketDetails {
            ticket: Ticket {
                id: TicketId::new(),
                title: "X".to_string(),
                category: Category::Billing,
                priority: Priority::High,
                status: TicketStatus::New,
                description: "Y".to_string(),
                created_at: Utc::now(),
                user_id: owner,
            },
            user: User {
                id: owner,
                email: "o@example.com".to_string(),
                name: "Owner".to_string(),
                role: Role::User,
                created_at: Utc::now(),
            },
            messages: Vec::new(),
        };

        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["title"], "X");
        assert_eq!(value["category"], "billing");
        assert_eq!(value["user"]["name"], "Owner");
        assert!(details.is_owned_by(owner));
        assert!(details.last_message().is_none());
    }
}
