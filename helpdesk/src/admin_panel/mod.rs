//! Admin panel view model.
//!
//! Two tabs over the remote store: tickets (search, status filter, detail
//! view with replies and status changes) and users (create, edit, delete).
//! Run it inside a [`Store`](helpdesk_runtime::Store):
//!
//! ```ignore
//! let store = Store::new(
//!     AdminPanelState::default(),
//!     AdminPanelReducer::new(),
//!     AdminPanelEnvironment::new(ticket_store, session, TransitionPolicy::default()),
//! );
//! store.send(AdminPanelAction::Refresh).await?.wait().await;
//! let open = store.state(|s| s.visible_tickets().len()).await;
//! ```

pub mod reducer;
pub mod types;

pub use reducer::{AdminPanelEnvironment, AdminPanelReducer};
pub use types::{AdminPanelAction, AdminPanelState, StatusFilter, Tab};

/// Store running the admin panel
pub type AdminPanelStore = helpdesk_runtime::Store<
    AdminPanelState,
    AdminPanelAction,
    AdminPanelEnvironment,
    AdminPanelReducer,
>;
