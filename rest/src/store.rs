//! [`TicketStore`] over the PostgREST table API.

use crate::config::RemoteConfig;
use crate::http::{RETURN_REPRESENTATION, RemoteClient, SINGLE_OBJECT};
use crate::rows::{self, MessageRow, TicketRow, UserRow, USER_COLUMNS};
use async_trait::async_trait;
use helpdesk_core::{
    Message, NewMessage, NewTicket, NewUser, Session, StoreError, Ticket, TicketDetails, TicketId,
    TicketStatus, TicketStore, User, UserChanges, UserId,
};
use reqwest::{Client, Method};
use serde_json::{Map, Value, json};

/// Remote ticket store client
///
/// Every call is one round trip authenticated with the caller's token. No
/// caching and no retries.
#[derive(Clone, Debug)]
pub struct RestTicketStore {
    remote: RemoteClient,
}

impl RestTicketStore {
    /// Create a client with a default reqwest [`Client`]
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a client reusing an existing reqwest [`Client`]
    #[must_use]
    pub fn with_client(client: Client, config: RemoteConfig) -> Self {
        Self {
            remote: RemoteClient::new(client, config),
        }
    }
}

fn eq(id: impl std::fmt::Display) -> String {
    format!("eq.{id}")
}

/// Body for `raw_user_meta_data`, which holds the display name
fn user_body(email: Option<&str>, name: Option<&str>, role: Option<&str>) -> Value {
    let mut body = Map::new();
    if let Some(email) = email {
        body.insert("email".to_string(), json!(email));
    }
    if let Some(name) = name {
        body.insert("raw_user_meta_data".to_string(), json!({ "name": name }));
    }
    if let Some(role) = role {
        body.insert("role".to_string(), json!(role));
    }
    Value::Object(body)
}

#[async_trait]
impl TicketStore for RestTicketStore {
    #[tracing::instrument(skip(self, session), fields(user_id = %session.user_id()))]
    async fn list_tickets(&self, session: &Session) -> Result<Vec<TicketDetails>, StoreError> {
        let select = rows::ticket_select();
        let request = self
            .remote
            .table(Method::GET, "tickets", &session.access_token)
            .query(&[
                ("select", select.as_str()),
                ("order", "created_at.desc"),
                ("messages.order", "created_at.asc"),
            ]);

        let rows: Vec<TicketRow> = self.remote.fetch("ticket", None, request).await?;
        let tickets = rows
            .into_iter()
            .map(TicketRow::into_details)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::Decode)?;

        tracing::debug!(count = tickets.len(), "Loaded tickets");
        Ok(tickets)
    }

    #[tracing::instrument(skip(self, session, ticket), fields(user_id = %session.user_id()))]
    async fn create_ticket(
        &self,
        session: &Session,
        ticket: NewTicket,
    ) -> Result<Ticket, StoreError> {
        let body = json!({
            "title": ticket.title,
            "category": ticket.category,
            "priority": ticket.priority,
            "description": ticket.description,
            "status": TicketStatus::New,
            "user_id": session.user_id(),
        });
        let request = self
            .remote
            .table(Method::POST, "tickets", &session.access_token)
            .header("Prefer", RETURN_REPRESENTATION)
            .header("Accept", SINGLE_OBJECT)
            .json(&body);

        let row: TicketRow = self.remote.fetch("ticket", None, request).await?;
        tracing::info!(ticket_id = %row.id, "Ticket created");
        Ok(row.into_ticket())
    }

    #[tracing::instrument(skip(self, session), fields(user_id = %session.user_id()))]
    async fn update_ticket_status(
        &self,
        session: &Session,
        id: TicketId,
        status: TicketStatus,
    ) -> Result<Ticket, StoreError> {
        let request = self
            .remote
            .table(Method::PATCH, "tickets", &session.access_token)
            .query(&[("id", eq(id))])
            .header("Prefer", RETURN_REPRESENTATION)
            .header("Accept", SINGLE_OBJECT)
            .json(&json!({ "status": status }));

        let id = id.to_string();
        let row: TicketRow = self.remote.fetch("ticket", Some(&id), request).await?;
        Ok(row.into_ticket())
    }

    #[tracing::instrument(skip(self, session, message), fields(ticket_id = %message.ticket_id))]
    async fn create_message(
        &self,
        session: &Session,
        message: NewMessage,
    ) -> Result<Message, StoreError> {
        let body = json!({
            "ticket_id": message.ticket_id,
            "content": message.content,
            "is_admin": message.is_admin,
            "user_id": message.author_id,
        });
        let request = self
            .remote
            .table(Method::POST, "messages", &session.access_token)
            .query(&[("select", rows::MESSAGE_COLUMNS)])
            .header("Prefer", RETURN_REPRESENTATION)
            .header("Accept", SINGLE_OBJECT)
            .json(&body);

        let row: MessageRow = self.remote.fetch("message", None, request).await?;
        row.into_message().map_err(StoreError::Decode)
    }

    #[tracing::instrument(skip(self, session), fields(user_id = %session.user_id()))]
    async fn list_users(&self, session: &Session) -> Result<Vec<User>, StoreError> {
        let request = self
            .remote
            .table(Method::GET, "users", &session.access_token)
            .query(&[("select", USER_COLUMNS), ("order", "created_at.desc")]);

        let rows: Vec<UserRow> = self.remote.fetch("user", None, request).await?;
        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    #[tracing::instrument(skip(self, session, user), fields(user_id = %session.user_id()))]
    async fn create_user(&self, session: &Session, user: NewUser) -> Result<User, StoreError> {
        let body = user_body(
            Some(user.email.trim()),
            Some(user.name.trim()),
            Some(user.role.as_str()),
        );
        let request = self
            .remote
            .table(Method::POST, "users", &session.access_token)
            .query(&[("select", USER_COLUMNS)])
            .header("Prefer", RETURN_REPRESENTATION)
            .header("Accept", SINGLE_OBJECT)
            .json(&body);

        let row: UserRow = self.remote.fetch("user", None, request).await?;
        tracing::info!(created = %row.id, "User created");
        Ok(row.into_user())
    }

    #[tracing::instrument(skip(self, session, changes), fields(user_id = %session.user_id()))]
    async fn update_user(
        &self,
        session: &Session,
        id: UserId,
        changes: UserChanges,
    ) -> Result<User, StoreError> {
        let body = user_body(
            changes.email.as_deref().map(str::trim),
            changes.name.as_deref().map(str::trim),
            changes.role.map(|role| role.as_str()),
        );
        let request = self
            .remote
            .table(Method::PATCH, "users", &session.access_token)
            .query(&[("id", eq(id).as_str()), ("select", USER_COLUMNS)])
            .header("Prefer", RETURN_REPRESENTATION)
            .header("Accept", SINGLE_OBJECT)
            .json(&body);

        let id = id.to_string();
        let row: UserRow = self.remote.fetch("user", Some(&id), request).await?;
        Ok(row.into_user())
    }

    #[tracing::instrument(skip(self, session), fields(user_id = %session.user_id()))]
    async fn delete_user(&self, session: &Session, id: UserId) -> Result<(), StoreError> {
        let request = self
            .remote
            .table(Method::DELETE, "users", &session.access_token)
            .query(&[("id", eq(id))]);

        let id_text = id.to_string();
        self.remote.execute("user", Some(&id_text), request).await?;
        tracing::info!(deleted = %id, "User deleted");
        Ok(())
    }
}
