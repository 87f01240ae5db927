//! Wire shapes returned by the remote store and their mapping into domain
//! types.
//!
//! User display names live in `raw_user_meta_data.name`. Embedded users may
//! be `null` when the account was deleted, since deletes do not cascade.

use chrono::{DateTime, Utc};
use helpdesk_core::types::DELETED_USER_NAME;
use helpdesk_core::{
    Category, Message, MessageAuthor, MessageId, Priority, Role, Ticket, TicketDetails, TicketId,
    TicketStatus, User, UserId,
};
use serde::Deserialize;

/// Columns selected for a user, embedded or not
pub const USER_COLUMNS: &str = "id,email,raw_user_meta_data,role,created_at";

/// Columns selected for a message, with its author embedded
pub const MESSAGE_COLUMNS: &str =
    "id,content,created_at,is_admin,ticket_id,user_id,user:user_id(id,email,raw_user_meta_data)";

/// `select=` for ticket reads: every column plus owner and thread
#[must_use]
pub fn ticket_select() -> String {
    format!("*,user:user_id({USER_COLUMNS}),messages({MESSAGE_COLUMNS})")
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UserMeta {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserRow {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub raw_user_meta_data: Option<UserMeta>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserRow {
    /// Metadata name, then email, then the deleted-account placeholder
    fn display_name(&self) -> String {
        self.raw_user_meta_data
            .as_ref()
            .and_then(|meta| meta.name.as_deref())
            .or(self.email.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DELETED_USER_NAME)
            .to_string()
    }

    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.display_name(),
            email: self.email.unwrap_or_default(),
            role: self.role.unwrap_or_default(),
            created_at: self.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageRow {
    pub id: MessageId,
    pub ticket_id: TicketId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user: Option<UserRow>,
}

impl MessageRow {
    pub fn into_message(self) -> Result<Message, String> {
        let author = match (self.user, self.user_id) {
            (Some(row), _) => MessageAuthor {
                id: row.id,
                name: row.display_name(),
            },
            (None, Some(id)) => MessageAuthor {
                id,
                name: DELETED_USER_NAME.to_string(),
            },
            (None, None) => return Err(format!("message {} has no author", self.id)),
        };

        Ok(Message {
            id: self.id,
            ticket_id: self.ticket_id,
            content: self.content,
            created_at: self.created_at,
            is_admin: self.is_admin,
            author,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TicketRow {
    pub id: TicketId,
    pub title: String,
    pub category: Category,
    pub priority: Priority,
    pub status: TicketStatus,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
    #[serde(default)]
    pub user: Option<UserRow>,
    #[serde(default)]
    pub messages: Vec<MessageRow>,
}

impl TicketRow {
    pub fn into_ticket(self) -> Ticket {
        Ticket {
            id: self.id,
            title: self.title,
            category: self.category,
            priority: self.priority,
            status: self.status,
            description: self.description,
            created_at: self.created_at,
            user_id: self.user_id,
        }
    }

    /// Ticket with owner and thread, thread sorted oldest first
    ///
    /// The sort is stable, so messages sharing a timestamp keep the order
    /// the store returned them in.
    pub fn into_details(mut self) -> Result<TicketDetails, String> {
        let owner_id = self.user_id;
        let user = self
            .user
            .take()
            .map_or_else(|| User::deleted(owner_id), UserRow::into_user);
        if user.id != owner_id {
            return Err(format!(
                "ticket {} embeds user {} but is owned by {owner_id}",
                self.id, user.id
            ));
        }

        let mut messages = std::mem::take(&mut self.messages)
            .into_iter()
            .map(MessageRow::into_message)
            .collect::<Result<Vec<_>, _>>()?;
        messages.sort_by_key(|m| m.created_at);

        Ok(TicketDetails {
            ticket: self.into_ticket(),
            user,
            messages,
        })
    }
}
