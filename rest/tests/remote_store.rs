//! REST client tests against a mocked PostgREST/auth server.

#![allow(clippy::unwrap_used)]

use helpdesk_core::{
    IdentityProvider, NewMessage, NewTicket, NewUser, Principal, Role, Session, StoreError,
    TicketId, TicketStatus, TicketStore, UserChanges, UserId,
};
use helpdesk_rest::{RemoteConfig, RestIdentityProvider, RestTicketStore};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OWNER: &str = "6f1c1f0e-3b8a-4a59-9e0e-7d7cfb9f8e11";
const ADMIN: &str = "0b7f6c52-2f4e-4f0c-a4c6-5b1b0f4b3c22";
const TICKET: &str = "2d0a5e4b-8f0e-4a1b-9e7a-3c3e1f5d6a33";

fn session(id: &str, role: Role) -> Session {
    Session::new(
        "user-token",
        Principal {
            user_id: id.parse().unwrap(),
            email: "someone@example.com".to_string(),
            name: "Someone".to_string(),
            role,
        },
    )
}

fn ticket_row(status: &str) -> serde_json::Value {
    json!({
        "id": TICKET,
        "title": "X",
        "category": "technical",
        "priority": "medium",
        "status": status,
        "description": "Y",
        "created_at": "2025-01-02T10:00:00Z",
        "user_id": OWNER
    })
}

async fn setup() -> (MockServer, RestTicketStore) {
    let server = MockServer::start().await;
    let store = RestTicketStore::new(RemoteConfig::new(server.uri(), "anon-key"));
    (server, store)
}

#[tokio::test]
async fn test_list_tickets_sends_embedding_query_and_credentials() {
    let (server, store) = setup().await;

    let mut row = ticket_row("new");
    row["user"] = json!({"id": OWNER, "email": "casey@example.com", "raw_user_meta_data": {"name": "Casey"}});
    row["messages"] = json!([]);

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("messages.order", "created_at.asc"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .expect(1)
        .mount(&server)
        .await;

    let tickets = store
        .list_tickets(&session(ADMIN, Role::Admin))
        .await
        .unwrap();

    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].ticket.status, TicketStatus::New);
    assert!(tickets[0].messages.is_empty());
    assert_eq!(tickets[0].user.id, tickets[0].ticket.user_id);
    assert_eq!(tickets[0].user.name, "Casey");
}

#[tokio::test]
async fn test_create_ticket_sets_owner_and_new_status() {
    let (server, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/tickets"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!({
            "title": "X",
            "category": "technical",
            "priority": "medium",
            "description": "Y",
            "status": "new",
            "user_id": OWNER
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(ticket_row("new")))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = store
        .create_ticket(&session(OWNER, Role::User), NewTicket::new("X", "Y"))
        .await
        .unwrap();

    assert_eq!(ticket.status, TicketStatus::New);
    assert_eq!(ticket.user_id.to_string(), OWNER);
}

#[tokio::test]
async fn test_update_status_of_missing_ticket_is_not_found() {
    let (server, store) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("id", format!("eq.{TICKET}")))
        .respond_with(ResponseTemplate::new(406).set_body_json(json!({
            "code": "PGRST116",
            "message": "JSON object requested, multiple (or no) rows returned"
        })))
        .mount(&server)
        .await;

    let result = store
        .update_ticket_status(
            &session(ADMIN, Role::Admin),
            TICKET.parse::<TicketId>().unwrap(),
            TicketStatus::Resolved,
        )
        .await;

    assert_eq!(result, Err(StoreError::not_found("ticket", TICKET)));
}

#[tokio::test]
async fn test_create_message_resolves_author() {
    let (server, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/messages"))
        .and(body_json(json!({
            "ticket_id": TICKET,
            "content": "We are on it",
            "is_admin": true,
            "user_id": ADMIN
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "a1a1a1a1-0000-4000-8000-000000000002",
            "ticket_id": TICKET,
            "content": "We are on it",
            "created_at": "2025-01-02T11:00:00Z",
            "is_admin": true,
            "user_id": ADMIN,
            "user": {"id": ADMIN, "raw_user_meta_data": {"name": "Ada"}}
        })))
        .mount(&server)
        .await;

    let message = store
        .create_message(
            &session(ADMIN, Role::Admin),
            NewMessage {
                ticket_id: TICKET.parse().unwrap(),
                content: "We are on it".to_string(),
                is_admin: true,
                author_id: ADMIN.parse().unwrap(),
            },
        )
        .await
        .unwrap();

    assert!(message.is_admin);
    assert_eq!(message.author.name, "Ada");
}

#[tokio::test]
async fn test_user_administration_round_trips() {
    let (server, store) = setup().await;
    let admin = session(ADMIN, Role::Admin);
    let user_row = json!({
        "id": OWNER,
        "email": "casey@example.com",
        "raw_user_meta_data": {"name": "Casey"},
        "role": "user",
        "created_at": "2024-12-01T00:00:00Z"
    });

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .and(body_json(json!({
            "email": "casey@example.com",
            "raw_user_meta_data": {"name": "Casey"},
            "role": "user"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(user_row.clone()))
        .mount(&server)
        .await;

    let mut promoted = user_row.clone();
    promoted["role"] = json!("admin");
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", format!("eq.{OWNER}")))
        .and(body_json(json!({"role": "admin"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(promoted))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", format!("eq.{OWNER}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let created = store
        .create_user(
            &admin,
            NewUser {
                email: "casey@example.com".to_string(),
                name: "Casey".to_string(),
                role: Role::User,
            },
        )
        .await
        .unwrap();
    assert_eq!(created.name, "Casey");

    let updated = store
        .update_user(
            &admin,
            created.id,
            UserChanges {
                role: Some(Role::Admin),
                ..UserChanges::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.is_admin());

    store.delete_user(&admin, created.id).await.unwrap();
}

#[tokio::test]
async fn test_errors_are_classified() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "JWT expired"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let user = session(OWNER, Role::User);
    assert_eq!(store.list_tickets(&user).await, Err(StoreError::Unauthorized));
    assert_eq!(
        store.list_users(&user).await,
        Err(StoreError::Rejected {
            status: 500,
            message: "boom".to_string()
        })
    );
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Nothing listens on port 1
    let store = RestTicketStore::new(RemoteConfig::new("http://127.0.0.1:1", "anon-key"));
    let result = store.list_tickets(&session(OWNER, Role::User)).await;
    assert!(matches!(result, Err(StoreError::Transport(_))));
}

#[tokio::test]
async fn test_sign_in_reads_role_from_users() {
    let server = MockServer::start().await;
    let identity = RestIdentityProvider::new(RemoteConfig::new(server.uri(), "anon-key"));

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-token",
            "token_type": "bearer",
            "user": {"id": ADMIN, "email": "ada@example.com", "user_metadata": {"name": "Ada"}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", format!("eq.{ADMIN}")))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": ADMIN,
            "email": "ada@example.com",
            "raw_user_meta_data": {"name": "Ada"},
            "role": "admin",
            "created_at": "2024-12-01T00:00:00Z"
        })))
        .mount(&server)
        .await;

    let session = identity.sign_in("ada@example.com", "secret").await.unwrap();
    assert_eq!(session.access_token, "fresh-token");
    assert_eq!(session.user_id(), ADMIN.parse::<UserId>().unwrap());
    assert!(session.is_admin());
    assert_eq!(session.principal.name, "Ada");
}

#[tokio::test]
async fn test_bad_password_is_unauthorized() {
    let server = MockServer::start().await;
    let identity = RestIdentityProvider::new(RemoteConfig::new(server.uri(), "anon-key"));

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    assert_eq!(
        identity.sign_in("ada@example.com", "wrong").await,
        Err(StoreError::Unauthorized)
    );
}

#[tokio::test]
async fn test_resolve_without_profile_row_defaults_to_user_role() {
    let server = MockServer::start().await;
    let identity = RestIdentityProvider::new(RemoteConfig::new(server.uri(), "anon-key"));

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer some-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": OWNER,
            "email": "casey@example.com",
            "user_metadata": {}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(406).set_body_json(json!({"code": "PGRST116"})))
        .mount(&server)
        .await;

    let session = identity.resolve("some-token").await.unwrap();
    assert_eq!(session.principal.role, Role::User);
    assert_eq!(session.principal.name, "casey@example.com");
}
