//! Ticket API endpoints:
//! - GET /api/tickets - Tickets visible to the caller
//! - POST /api/tickets - Open a ticket
//! - POST /api/tickets/:id/messages - Append to a thread (owner or admin)
//! - PATCH /api/admin/tickets/:id/status - Change status (admin)

use crate::auth::{RequireAdmin, SessionUser};
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use helpdesk_core::{
    Message, NewMessage, NewTicket, Session, Ticket, TicketDetails, TicketId, TicketStatus,
};
use helpdesk_web::AppError;
use serde::Deserialize;
use uuid::Uuid;

// ============================================================================
// Request Types
// ============================================================================

/// Body of a new thread message
#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    /// Message text
    pub content: String,
}

/// Body of a status change
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    /// Target status
    pub status: TicketStatus,
}

// ============================================================================
// Handlers
// ============================================================================

async fn find_ticket(
    state: &AppState,
    session: &Session,
    id: TicketId,
) -> Result<TicketDetails, AppError> {
    state
        .store
        .list_tickets(session)
        .await?
        .into_iter()
        .find(|t| t.id() == id)
        .ok_or_else(|| AppError::not_found("ticket", id))
}

/// List tickets.
///
/// Admins see every ticket; everybody else only their own.
pub async fn list_tickets(
    SessionUser(session): SessionUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TicketDetails>>, AppError> {
    let mut tickets = state.store.list_tickets(&session).await?;
    if !session.is_admin() {
        tickets.retain(|t| t.is_owned_by(session.user_id()));
    }
    Ok(Json(tickets))
}

/// Open a ticket owned by the caller.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/tickets \
///   -H "Authorization: Bearer <token>" \
///   -H "Content-Type: application/json" \
///   -d '{"title": "Cannot log in", "description": "Password reset mail never arrives", "priority": "high"}'
/// ```
pub async fn create_ticket(
    SessionUser(session): SessionUser,
    State(state): State<AppState>,
    Json(request): Json<NewTicket>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    request.validate()?;
    let ticket = state.store.create_ticket(&session, request).await?;

    metrics::counter!("helpdesk.tickets.created").increment(1);
    tracing::info!(ticket_id = %ticket.id, user_id = %ticket.user_id, "Ticket opened");
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// Append a message to a ticket thread.
///
/// Customers may only write on their own tickets. `is_admin` is set from
/// the caller's role, never from the body.
pub async fn post_message(
    SessionUser(session): SessionUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let ticket_id = TicketId::from_uuid(id);
    let message = NewMessage {
        ticket_id,
        content: request.content.trim().to_string(),
        is_admin: session.is_admin(),
        author_id: session.user_id(),
    };
    message.validate()?;

    let ticket = find_ticket(&state, &session, ticket_id).await?;
    if !session.is_admin() && !ticket.is_owned_by(session.user_id()) {
        return Err(AppError::forbidden("Not your ticket"));
    }

    let created = state.store.create_message(&session, message).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Change a ticket's status.
///
/// Under the strict policy the current status is fetched first and the
/// change is refused with 422 when the workflow forbids it.
pub async fn update_status(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<Ticket>, AppError> {
    let ticket_id = TicketId::from_uuid(id);

    if state.policy != helpdesk_core::TransitionPolicy::Unrestricted {
        let current = find_ticket(&state, &session, ticket_id).await?;
        state.policy.check(current.ticket.status, request.status)?;
    }

    let ticket = state
        .store
        .update_ticket_status(&session, ticket_id, request.status)
        .await?;
    tracing::info!(ticket_id = %ticket.id, status = %ticket.status, "Ticket status changed");
    Ok(Json(ticket))
}
