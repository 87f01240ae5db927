//! Ticket creation form.
//!
//! Collects the ticket fields and an optional screenshot, validates them
//! locally and opens the ticket for the signed-in user. The attachment is
//! checked but never uploaded.

use helpdesk_core::{
    effect::Effect, reducer::Reducer, Category, NewTicket, Priority, Session, SmallVec,
    StoreError, Ticket, TicketStore, ValidationError, smallvec,
};
use std::sync::Arc;

/// Largest accepted attachment (5 MiB)
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

/// Shown when the store rejects the ticket
pub const SUBMIT_FAILED: &str = "Could not create the ticket. Please try again.";

/// File picked in the form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// Original file name
    pub file_name: String,
    /// MIME type reported by the client
    pub content_type: String,
    /// Size in bytes
    pub size: u64,
}

impl Attachment {
    /// Accept images up to [`MAX_ATTACHMENT_BYTES`]
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AttachmentTooLarge`] or
    /// [`ValidationError::UnsupportedAttachment`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.size > MAX_ATTACHMENT_BYTES {
            return Err(ValidationError::AttachmentTooLarge {
                size: self.size,
                limit: MAX_ATTACHMENT_BYTES,
            });
        }
        if !self.content_type.starts_with("image/") {
            return Err(ValidationError::UnsupportedAttachment(
                self.content_type.clone(),
            ));
        }
        Ok(())
    }
}

/// Form state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TicketFormState {
    /// Subject line
    pub title: String,
    /// Topic, `technical` by default
    pub category: Category,
    /// Urgency, `medium` by default
    pub priority: Priority,
    /// Problem description
    pub description: String,
    /// Accepted screenshot
    pub attachment: Option<Attachment>,
    /// A create call is in flight
    pub submitting: bool,
    /// Message shown above the form
    pub error: Option<String>,
    /// Ticket opened by the last successful submit
    pub created: Option<Ticket>,
}

impl TicketFormState {
    /// The fields as a create request
    #[must_use]
    pub fn to_new_ticket(&self) -> NewTicket {
        NewTicket::new(self.title.trim(), self.description.trim())
            .with_category(self.category)
            .with_priority(self.priority)
    }
}

/// Form actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TicketFormAction {
    /// Title edited
    SetTitle(String),
    /// Category picked
    SetCategory(Category),
    /// Priority picked
    SetPriority(Priority),
    /// Description edited
    SetDescription(String),
    /// File picked
    Attach(Attachment),
    /// File removed
    RemoveAttachment,
    /// Submit pressed
    Submit,
    /// Create call finished
    Submitted(Result<Ticket, StoreError>),
}

/// Form dependencies
#[derive(Clone)]
pub struct TicketFormEnvironment {
    /// Remote ticket store
    pub store: Arc<dyn TicketStore>,
    /// Customer filling in the form
    pub session: Session,
}

/// Form reducer
#[derive(Clone, Copy, Debug, Default)]
pub struct TicketFormReducer;

impl Reducer for TicketFormReducer {
    type State = TicketFormState;
    type Action = TicketFormAction;
    type Environment = TicketFormEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TicketFormAction::SetTitle(title) => state.title = title,
            TicketFormAction::SetCategory(category) => state.category = category,
            TicketFormAction::SetPriority(priority) => state.priority = priority,
            TicketFormAction::SetDescription(description) => state.description = description,
            TicketFormAction::Attach(attachment) => match attachment.validate() {
                Ok(()) => {
                    state.attachment = Some(attachment);
                    state.error = None;
                },
                Err(error) => state.error = Some(error.to_string()),
            },
            TicketFormAction::RemoveAttachment => state.attachment = None,
            TicketFormAction::Submit => {
                if state.submitting {
                    return SmallVec::new();
                }
                let ticket = state.to_new_ticket();
                if let Err(error) = ticket.validate() {
                    state.error = Some(error.to_string());
                    return SmallVec::new();
                }

                state.submitting = true;
                state.error = None;
                let store = Arc::clone(&env.store);
                let session = env.session.clone();
                return smallvec![Effect::future(async move {
                    Some(TicketFormAction::Submitted(
                        store.create_ticket(&session, ticket).await,
                    ))
                })];
            },
            TicketFormAction::Submitted(Ok(ticket)) => {
                tracing::info!(ticket_id = %ticket.id, "Ticket created");
                *state = TicketFormState {
                    created: Some(ticket),
                    ..TicketFormState::default()
                };
            },
            TicketFormAction::Submitted(Err(error)) => {
                tracing::warn!(%error, "Failed to create ticket");
                state.submitting = false;
                state.error = Some(SUBMIT_FAILED.to_string());
            },
        }
        SmallVec::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use helpdesk_core::TicketStatus;
    use helpdesk_testing::{InMemoryTicketStore, ReducerTest, assertions, collect_actions, fixtures};

    fn env(store: &InMemoryTicketStore) -> TicketFormEnvironment {
        let customer = store.seed_user(fixtures::customer());
        TicketFormEnvironment {
            store: Arc::new(store.clone()),
            session: fixtures::session_for(&customer),
        }
    }

    fn image(size: u64) -> Attachment {
        Attachment {
            file_name: "screenshot.png".to_string(),
            content_type: "image/png".to_string(),
            size,
        }
    }

    #[test]
    fn test_defaults() {
        let state = TicketFormState::default();
        assert_eq!(state.category, Category::Technical);
        assert_eq!(state.priority, Priority::Medium);
    }

    #[test]
    fn test_attachment_limits() {
        assert!(image(MAX_ATTACHMENT_BYTES).validate().is_ok());
        assert_eq!(
            image(MAX_ATTACHMENT_BYTES + 1).validate(),
            Err(ValidationError::AttachmentTooLarge {
                size: MAX_ATTACHMENT_BYTES + 1,
                limit: MAX_ATTACHMENT_BYTES,
            })
        );

        let pdf = Attachment {
            content_type: "application/pdf".to_string(),
            ..image(10)
        };
        assert_eq!(
            pdf.validate(),
            Err(ValidationError::UnsupportedAttachment("application/pdf".to_string()))
        );
    }

    #[test]
    fn test_rejected_attachment_keeps_previous() {
        let store = InMemoryTicketStore::new();

        ReducerTest::new(TicketFormReducer)
            .with_env(env(&store))
            .given_state(TicketFormState::default())
            .when_action(TicketFormAction::Attach(image(1024)))
            .when_action(TicketFormAction::Attach(image(MAX_ATTACHMENT_BYTES * 2)))
            .then_state(|state| {
                assert_eq!(state.attachment, Some(image(1024)));
                assert!(state.error.as_deref().unwrap().starts_with("Attachment is too large"));
            })
            .run();
    }

    #[test]
    fn test_submit_requires_title_and_description() {
        let store = InMemoryTicketStore::new();

        ReducerTest::new(TicketFormReducer)
            .with_env(env(&store))
            .given_state(TicketFormState::default())
            .when_action(TicketFormAction::SetTitle("   ".to_string()))
            .when_action(TicketFormAction::SetDescription("It broke".to_string()))
            .when_action(TicketFormAction::Submit)
            .then_state(|state| {
                assert_eq!(state.error.as_deref(), Some("title is required"));
                assert!(!state.submitting);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[tokio::test]
    async fn test_successful_submit_resets_form() {
        let store = InMemoryTicketStore::new();
        let env = env(&store);
        let mut state = TicketFormState {
            title: "X".to_string(),
            description: "Y".to_string(),
            priority: Priority::Urgent,
            attachment: Some(image(10)),
            ..TicketFormState::default()
        };

        let effects = TicketFormReducer.reduce(&mut state, TicketFormAction::Submit, &env);
        assert!(state.submitting);
        let actions = collect_actions(effects).await;
        for action in actions {
            TicketFormReducer.reduce(&mut state, action, &env);
        }

        let created = state.created.clone().unwrap();
        assert_eq!(created.status, TicketStatus::New);
        assert_eq!(created.priority, Priority::Urgent);
        assert_eq!(created.user_id, env.session.user_id());
        assert_eq!(
            state,
            TicketFormState {
                created: Some(created),
                ..TicketFormState::default()
            }
        );
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_input() {
        let store = InMemoryTicketStore::new();
        let env = env(&store);
        store.fail_writes(StoreError::Unauthorized);
        let mut state = TicketFormState {
            title: "X".to_string(),
            description: "Y".to_string(),
            ..TicketFormState::default()
        };

        let effects = TicketFormReducer.reduce(&mut state, TicketFormAction::Submit, &env);
        for action in collect_actions(effects).await {
            TicketFormReducer.reduce(&mut state, action, &env);
        }

        assert_eq!(state.title, "X");
        assert!(!state.submitting);
        assert_eq!(state.error.as_deref(), Some(SUBMIT_FAILED));
        assert_eq!(store.ticket_count(), 0);
    }
}
