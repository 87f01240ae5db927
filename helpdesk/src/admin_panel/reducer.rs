//! Reducer for the admin panel.
//!
//! Every remote call is an [`Effect::Future`] that feeds its result back as
//! an action. Successful writes never patch local collections: they trigger
//! a fresh fetch of the affected collection instead.

use super::types::{AdminPanelAction, AdminPanelState};
use helpdesk_core::{
    effect::Effect, reducer::Reducer, NewMessage, Session, SmallVec, StoreError, TicketId,
    TicketStatus, TicketStore, TransitionPolicy, smallvec,
};
use std::sync::Arc;

/// Shown when a ticket write fails
pub const TICKET_WRITE_FAILED: &str = "Could not update the ticket. Please try again.";

/// Shown when a user write fails
pub const USER_WRITE_FAILED: &str = "Could not save the user. Please try again.";

/// Dependencies of the admin panel
#[derive(Clone)]
pub struct AdminPanelEnvironment {
    /// Remote ticket store
    pub store: Arc<dyn TicketStore>,
    /// Operator using the panel
    pub session: Session,
    /// Allowed status changes
    pub policy: TransitionPolicy,
}

impl AdminPanelEnvironment {
    /// Creates a new `AdminPanelEnvironment`
    #[must_use]
    pub fn new(store: Arc<dyn TicketStore>, session: Session, policy: TransitionPolicy) -> Self {
        Self {
            store,
            session,
            policy,
        }
    }
}

/// Reducer for the admin panel
#[derive(Clone, Copy, Debug, Default)]
pub struct AdminPanelReducer;

impl AdminPanelReducer {
    /// Creates a new `AdminPanelReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn fetch_tickets(env: &AdminPanelEnvironment) -> Effect<AdminPanelAction> {
        let store = Arc::clone(&env.store);
        let session = env.session.clone();
        Effect::future(async move {
            Some(AdminPanelAction::TicketsLoaded(
                store.list_tickets(&session).await,
            ))
        })
    }

    fn fetch_users(env: &AdminPanelEnvironment) -> Effect<AdminPanelAction> {
        let store = Arc::clone(&env.store);
        let session = env.session.clone();
        Effect::future(async move {
            Some(AdminPanelAction::UsersLoaded(store.list_users(&session).await))
        })
    }

    /// Status update effect
    ///
    /// With `verify` the current status is read from the store and checked
    /// against the policy before the update is sent.
    fn change_status(
        env: &AdminPanelEnvironment,
        ticket_id: TicketId,
        status: TicketStatus,
        verify: bool,
    ) -> Effect<AdminPanelAction> {
        let store = Arc::clone(&env.store);
        let session = env.session.clone();
        let policy = env.policy;
        Effect::future(async move {
            if verify {
                let current = match store.list_tickets(&session).await {
                    Ok(tickets) => tickets
                        .into_iter()
                        .find(|t| t.id() == ticket_id)
                        .map(|t| t.ticket.status),
                    Err(error) => return Some(AdminPanelAction::StatusChanged(Err(error))),
                };
                let Some(current) = current else {
                    return Some(AdminPanelAction::StatusChanged(Err(StoreError::not_found(
                        "ticket", ticket_id,
                    ))));
                };
                if let Err(error) = policy.check(current, status) {
                    return Some(AdminPanelAction::StatusRefused(error));
                }
            }
            Some(AdminPanelAction::StatusChanged(
                store.update_ticket_status(&session, ticket_id, status).await,
            ))
        })
    }

    /// Admin actions are refused for non-admin sessions
    const fn requires_admin(action: &AdminPanelAction) -> bool {
        matches!(
            action,
            AdminPanelAction::Refresh
                | AdminPanelAction::LoadTickets
                | AdminPanelAction::LoadUsers
                | AdminPanelAction::ChangeStatus { .. }
                | AdminPanelAction::Reply { .. }
                | AdminPanelAction::CreateUser(_)
                | AdminPanelAction::UpdateUser { .. }
                | AdminPanelAction::DeleteUser(_)
        )
    }
}

impl Reducer for AdminPanelReducer {
    type State = AdminPanelState;
    type Action = AdminPanelAction;
    type Environment = AdminPanelEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if Self::requires_admin(&action) && !env.session.is_admin() {
            tracing::warn!(user_id = %env.session.user_id(), "Admin panel used without admin role");
            state.access_denied = true;
            return SmallVec::new();
        }

        match action {
            // ========== Navigation ==========
            AdminPanelAction::SelectTab(tab) => {
                state.tab = tab;
                SmallVec::new()
            },
            AdminPanelAction::Search(text) => {
                state.search = text;
                SmallVec::new()
            },
            AdminPanelAction::FilterStatus(filter) => {
                state.status_filter = filter;
                SmallVec::new()
            },
            AdminPanelAction::SelectTicket(id) => {
                state.selected_ticket = id;
                SmallVec::new()
            },

            // ========== Reads ==========
            AdminPanelAction::Refresh => {
                state.loading_tickets = true;
                state.loading_users = true;
                smallvec![Effect::merge(vec![
                    Self::fetch_tickets(env),
                    Self::fetch_users(env),
                ])]
            },
            AdminPanelAction::LoadTickets => {
                state.loading_tickets = true;
                smallvec![Self::fetch_tickets(env)]
            },
            AdminPanelAction::LoadUsers => {
                state.loading_users = true;
                smallvec![Self::fetch_users(env)]
            },
            AdminPanelAction::TicketsLoaded(result) => {
                state.loading_tickets = false;
                match result {
                    Ok(tickets) => {
                        state.tickets = tickets;
                        state.tickets_error = None;
                    },
                    Err(error) => {
                        // Keep showing what we had
                        tracing::warn!(%error, "Failed to fetch tickets");
                        state.tickets_error = Some(error.to_string());
                    },
                }
                SmallVec::new()
            },
            AdminPanelAction::UsersLoaded(result) => {
                state.loading_users = false;
                match result {
                    Ok(users) => {
                        state.users = users;
                        state.users_error = None;
                    },
                    Err(error) => {
                        tracing::warn!(%error, "Failed to fetch users");
                        state.users_error = Some(error.to_string());
                    },
                }
                SmallVec::new()
            },

            // ========== Ticket writes ==========
            AdminPanelAction::ChangeStatus { ticket_id, status } => {
                let listed = state.ticket(ticket_id).map(|t| t.ticket.status);
                if let Some(current) = listed {
                    if let Err(error) = env.policy.check(current, status) {
                        state.tickets_error = Some(error.to_string());
                        return SmallVec::new();
                    }
                }

                let verify = listed.is_none() && env.policy != TransitionPolicy::Unrestricted;
                smallvec![Self::change_status(env, ticket_id, status, verify)]
            },
            AdminPanelAction::StatusRefused(error) => {
                tracing::debug!(%error, "Status change refused");
                state.tickets_error = Some(error.to_string());
                SmallVec::new()
            },
            AdminPanelAction::StatusChanged(result) => match result {
                Ok(ticket) => {
                    tracing::debug!(ticket_id = %ticket.id, status = %ticket.status, "Ticket status changed");
                    state.tickets_error = None;
                    smallvec![Self::fetch_tickets(env)]
                },
                Err(error) => {
                    tracing::warn!(%error, "Failed to change ticket status");
                    state.tickets_error = Some(TICKET_WRITE_FAILED.to_string());
                    SmallVec::new()
                },
            },
            AdminPanelAction::Reply { ticket_id, content } => {
                let message = NewMessage {
                    ticket_id,
                    content: content.trim().to_string(),
                    is_admin: true,
                    author_id: env.session.user_id(),
                };
                // Blank replies are ignored
                if message.validate().is_err() {
                    return SmallVec::new();
                }

                let store = Arc::clone(&env.store);
                let session = env.session.clone();
                smallvec![Effect::future(async move {
                    Some(AdminPanelAction::ReplySent(
                        store.create_message(&session, message).await,
                    ))
                })]
            },
            AdminPanelAction::ReplySent(result) => match result {
                Ok(_) => {
                    state.tickets_error = None;
                    smallvec![Self::fetch_tickets(env)]
                },
                Err(error) => {
                    tracing::warn!(%error, "Failed to send reply");
                    state.tickets_error = Some(TICKET_WRITE_FAILED.to_string());
                    SmallVec::new()
                },
            },

            // ========== User writes ==========
            AdminPanelAction::CreateUser(user) => {
                if let Err(error) = user.validate() {
                    state.user_form_error = Some(error.to_string());
                    return SmallVec::new();
                }
                state.user_form_error = None;

                let store = Arc::clone(&env.store);
                let session = env.session.clone();
                smallvec![Effect::future(async move {
                    Some(AdminPanelAction::UserSaved(
                        store.create_user(&session, user).await,
                    ))
                })]
            },
            AdminPanelAction::UpdateUser { id, changes } => {
                if let Err(error) = changes.validate() {
                    state.user_form_error = Some(error.to_string());
                    return SmallVec::new();
                }
                state.user_form_error = None;

                let store = Arc::clone(&env.store);
                let session = env.session.clone();
                smallvec![Effect::future(async move {
                    Some(AdminPanelAction::UserSaved(
                        store.update_user(&session, id, changes).await,
                    ))
                })]
            },
            AdminPanelAction::DeleteUser(id) => {
                let store = Arc::clone(&env.store);
                let session = env.session.clone();
                smallvec![Effect::future(async move {
                    Some(AdminPanelAction::UserDeleted(
                        store.delete_user(&session, id).await.map(|()| id),
                    ))
                })]
            },
            AdminPanelAction::UserSaved(result) => match result {
                Ok(user) => {
                    tracing::debug!(user_id = %user.id, "User saved");
                    state.user_form_error = None;
                    smallvec![Self::fetch_users(env)]
                },
                Err(error) => {
                    tracing::warn!(%error, "Failed to save user");
                    state.user_form_error = Some(USER_WRITE_FAILED.to_string());
                    SmallVec::new()
                },
            },
            AdminPanelAction::UserDeleted(result) => match result {
                Ok(id) => {
                    tracing::debug!(user_id = %id, "User deleted");
                    state.user_form_error = None;
                    smallvec![Self::fetch_users(env)]
                },
                Err(error) => {
                    tracing::warn!(%error, "Failed to delete user");
                    state.user_form_error = Some(USER_WRITE_FAILED.to_string());
                    SmallVec::new()
                },
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::admin_panel::types::{StatusFilter, Tab};
    use helpdesk_core::{NewTicket, NewUser, Role, StoreError, TicketStatus};
    use helpdesk_testing::{
        InMemoryTicketStore, ReducerTest, assertions, collect_actions, fixtures,
    };

    fn env_for(store: &InMemoryTicketStore, session: Session) -> AdminPanelEnvironment {
        AdminPanelEnvironment::new(Arc::new(store.clone()), session, TransitionPolicy::default())
    }

    fn admin_env(store: &InMemoryTicketStore) -> AdminPanelEnvironment {
        let admin = store.seed_user(fixtures::admin());
        env_for(store, fixtures::session_for(&admin))
    }

    #[test]
    fn test_navigation_has_no_effects() {
        let store = InMemoryTicketStore::new();
        let id = helpdesk_core::TicketId::new();

        ReducerTest::new(AdminPanelReducer::new())
            .with_env(admin_env(&store))
            .given_state(AdminPanelState::default())
            .when_action(AdminPanelAction::SelectTab(Tab::Users))
            .when_action(AdminPanelAction::Search("casey".to_string()))
            .when_action(AdminPanelAction::FilterStatus(StatusFilter::Only(
                TicketStatus::Resolved,
            )))
            .when_action(AdminPanelAction::SelectTicket(Some(id)))
            .then_state(move |state| {
                assert_eq!(state.tab, Tab::Users);
                assert_eq!(state.search, "casey");
                assert_eq!(
                    state.status_filter,
                    StatusFilter::Only(TicketStatus::Resolved)
                );
                assert_eq!(state.selected_ticket, Some(id));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_refresh_fetches_both_collections_in_parallel() {
        let store = InMemoryTicketStore::new();

        ReducerTest::new(AdminPanelReducer::new())
            .with_env(admin_env(&store))
            .given_state(AdminPanelState::default())
            .when_action(AdminPanelAction::Refresh)
            .then_state(|state| {
                assert!(state.loading_tickets);
                assert!(state.loading_users);
            })
            .then_effects(|effects| assertions::assert_parallel_effect(effects, 2))
            .run();
    }

    #[test]
    fn test_non_admin_is_denied() {
        let store = InMemoryTicketStore::new();
        let customer = store.seed_user(fixtures::customer());

        ReducerTest::new(AdminPanelReducer::new())
            .with_env(env_for(&store, fixtures::session_for(&customer)))
            .given_state(AdminPanelState::default())
            .when_action(AdminPanelAction::Refresh)
            .then_state(|state| {
                assert!(state.access_denied);
                assert!(!state.loading_tickets);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_failed_fetch_keeps_previous_tickets() {
        let store = InMemoryTicketStore::new();
        let previous = AdminPanelState {
            users: vec![fixtures::customer()],
            loading_users: true,
            ..AdminPanelState::default()
        };
        let expected_users = previous.users.clone();

        ReducerTest::new(AdminPanelReducer::new())
            .with_env(admin_env(&store))
            .given_state(previous)
            .when_action(AdminPanelAction::UsersLoaded(Err(StoreError::Transport(
                "connection reset".to_string(),
            ))))
            .then_state(move |state| {
                assert_eq!(state.users, expected_users);
                assert!(!state.loading_users);
                assert!(state.users_error.as_deref().unwrap().contains("connection reset"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_blank_reply_is_ignored() {
        let store = InMemoryTicketStore::new();

        ReducerTest::new(AdminPanelReducer::new())
            .with_env(admin_env(&store))
            .given_state(AdminPanelState::default())
            .when_action(AdminPanelAction::Reply {
                ticket_id: helpdesk_core::TicketId::new(),
                content: "   \n".to_string(),
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_invalid_user_form_stays_local() {
        let store = InMemoryTicketStore::new();

        ReducerTest::new(AdminPanelReducer::new())
            .with_env(admin_env(&store))
            .given_state(AdminPanelState::default())
            .when_action(AdminPanelAction::CreateUser(NewUser {
                email: "no-at-sign".to_string(),
                name: "Sam".to_string(),
                role: Role::User,
            }))
            .then_state(|state| {
                assert_eq!(
                    state.user_form_error.as_deref(),
                    Some("Invalid email address: no-at-sign")
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_strict_policy_blocks_reopening() {
        let store = InMemoryTicketStore::new();
        let mut env = admin_env(&store);
        env.policy = TransitionPolicy::Strict;

        let customer = fixtures::customer();
        let details = helpdesk_core::TicketDetails {
            ticket: helpdesk_core::Ticket {
                id: helpdesk_core::TicketId::new(),
                title: "Printer".to_string(),
                category: helpdesk_core::Category::default(),
                priority: helpdesk_core::Priority::default(),
                status: TicketStatus::Closed,
                description: "Jammed".to_string(),
                created_at: customer.created_at,
                user_id: customer.id,
            },
            user: customer,
            messages: Vec::new(),
        };
        let ticket_id = details.id();

        ReducerTest::new(AdminPanelReducer::new())
            .with_env(env)
            .given_state(AdminPanelState {
                tickets: vec![details],
                ..AdminPanelState::default()
            })
            .when_action(AdminPanelAction::ChangeStatus {
                ticket_id,
                status: TicketStatus::New,
            })
            .then_state(|state| {
                assert_eq!(
                    state.tickets_error.as_deref(),
                    Some("Cannot move ticket from closed to new")
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_user_read_does_not_clear_ticket_read_error() {
        let store = InMemoryTicketStore::new();
        let admin = fixtures::admin();

        ReducerTest::new(AdminPanelReducer::new())
            .with_env(admin_env(&store))
            .given_state(AdminPanelState::default())
            .when_action(AdminPanelAction::Refresh)
            .when_action(AdminPanelAction::TicketsLoaded(Err(StoreError::Transport(
                "down".to_string(),
            ))))
            .when_action(AdminPanelAction::UsersLoaded(Ok(vec![admin])))
            .then_state(|state| {
                assert_eq!(state.users.len(), 1);
                assert_eq!(state.users_error, None);
                assert!(state.tickets_error.as_deref().unwrap().contains("down"));
                assert!(state.error().unwrap().contains("down"));
            })
            .run();
    }

    #[tokio::test]
    async fn test_strict_policy_reads_status_of_unlisted_ticket() {
        let store = InMemoryTicketStore::new();
        let mut env = admin_env(&store);
        env.policy = TransitionPolicy::Strict;
        let customer = store.seed_user(fixtures::customer());
        let ticket = store
            .create_ticket(&fixtures::session_for(&customer), NewTicket::new("X", "Y"))
            .await
            .unwrap();
        store
            .update_ticket_status(&env.session, ticket.id, TicketStatus::Closed)
            .await
            .unwrap();

        // Nothing loaded yet, so the reducer cannot know the ticket is closed
        let mut state = AdminPanelState::default();
        let effects = AdminPanelReducer.reduce(
            &mut state,
            AdminPanelAction::ChangeStatus {
                ticket_id: ticket.id,
                status: TicketStatus::New,
            },
            &env,
        );
        let actions = collect_actions(effects).await;
        assert!(matches!(
            actions.as_slice(),
            [AdminPanelAction::StatusRefused(_)]
        ));

        let follow_up = AdminPanelReducer.reduce(&mut state, actions[0].clone(), &env);
        assert!(follow_up.is_empty());
        assert_eq!(store.ticket(ticket.id).unwrap().status, TicketStatus::Closed);
        assert_eq!(
            state.tickets_error.as_deref(),
            Some("Cannot move ticket from closed to new")
        );
    }

    #[tokio::test]
    async fn test_strict_policy_allows_valid_step_on_unlisted_ticket() {
        let store = InMemoryTicketStore::new();
        let mut env = admin_env(&store);
        env.policy = TransitionPolicy::Strict;
        let customer = store.seed_user(fixtures::customer());
        let ticket = store
            .create_ticket(&fixtures::session_for(&customer), NewTicket::new("X", "Y"))
            .await
            .unwrap();

        let mut state = AdminPanelState::default();
        let effects = AdminPanelReducer.reduce(
            &mut state,
            AdminPanelAction::ChangeStatus {
                ticket_id: ticket.id,
                status: TicketStatus::InProgress,
            },
            &env,
        );
        let actions = collect_actions(effects).await;
        assert!(matches!(
            actions.as_slice(),
            [AdminPanelAction::StatusChanged(Ok(t))] if t.status == TicketStatus::InProgress
        ));
    }

    #[tokio::test]
    async fn test_strict_policy_unknown_ticket_is_a_write_failure() {
        let store = InMemoryTicketStore::new();
        let mut env = admin_env(&store);
        env.policy = TransitionPolicy::Strict;

        let mut state = AdminPanelState::default();
        let effects = AdminPanelReducer.reduce(
            &mut state,
            AdminPanelAction::ChangeStatus {
                ticket_id: helpdesk_core::TicketId::new(),
                status: TicketStatus::InProgress,
            },
            &env,
        );
        let actions = collect_actions(effects).await;
        AdminPanelReducer.reduce(&mut state, actions[0].clone(), &env);

        assert!(matches!(
            actions.as_slice(),
            [AdminPanelAction::StatusChanged(Err(StoreError::NotFound { .. }))]
        ));
        assert_eq!(state.tickets_error.as_deref(), Some(TICKET_WRITE_FAILED));
    }

    #[tokio::test]
    async fn test_status_change_feeds_back_refetch() {
        let store = InMemoryTicketStore::new();
        let env = admin_env(&store);
        let customer = store.seed_user(fixtures::customer());
        let ticket = store
            .create_ticket(&fixtures::session_for(&customer), NewTicket::new("X", "Y"))
            .await
            .unwrap();

        let mut state = AdminPanelState::default();
        let effects = AdminPanelReducer.reduce(
            &mut state,
            AdminPanelAction::ChangeStatus {
                ticket_id: ticket.id,
                status: TicketStatus::Resolved,
            },
            &env,
        );
        let actions = collect_actions(effects).await;
        assert!(matches!(
            actions.as_slice(),
            [AdminPanelAction::StatusChanged(Ok(t))] if t.status == TicketStatus::Resolved
        ));

        let follow_up = AdminPanelReducer.reduce(&mut state, actions[0].clone(), &env);
        let reloaded = collect_actions(follow_up).await;
        assert!(matches!(
            reloaded.as_slice(),
            [AdminPanelAction::TicketsLoaded(Ok(tickets))] if tickets.len() == 1
        ));
    }

    #[tokio::test]
    async fn test_failed_user_write_shows_generic_message() {
        let store = InMemoryTicketStore::new();
        let env = admin_env(&store);
        store.fail_writes(StoreError::Rejected {
            status: 409,
            message: "duplicate key".to_string(),
        });

        let mut state = AdminPanelState::default();
        let effects = AdminPanelReducer.reduce(
            &mut state,
            AdminPanelAction::DeleteUser(helpdesk_core::UserId::new()),
            &env,
        );
        let actions = collect_actions(effects).await;
        let follow_up = AdminPanelReducer.reduce(&mut state, actions[0].clone(), &env);

        assert!(follow_up.is_empty());
        assert_eq!(state.user_form_error.as_deref(), Some(USER_WRITE_FAILED));
    }
}
