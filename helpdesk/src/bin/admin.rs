//! Helpdesk admin console
//!
//! Drives the admin panel view model from the command line.
//!
//! # Usage
//!
//! ```bash
//! helpdesk-admin --email ada@example.com --password secret tickets --status new
//! HELPDESK_ACCESS_TOKEN=<token> helpdesk-admin status <ticket-id> resolved
//! helpdesk-admin reply <ticket-id> "We are looking into it"
//! helpdesk-admin create-user --email sam@example.com --name Sam --role admin
//! ```

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use helpdesk::Config;
use helpdesk::admin_panel::{
    AdminPanelAction, AdminPanelEnvironment, AdminPanelReducer, AdminPanelState, AdminPanelStore,
    StatusFilter,
};
use helpdesk_core::{IdentityProvider, NewUser, Role, Session, TicketStatus, UserChanges};
use helpdesk_rest::{RestIdentityProvider, RestTicketStore};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long one command may take, re-fetches included
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Parser)]
#[command(name = "helpdesk-admin", version, about = "Manage helpdesk tickets and users")]
struct Cli {
    /// Access token of an admin session
    #[arg(long, env = "HELPDESK_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Admin email, used with --password when no token is given
    #[arg(long, requires = "password")]
    email: Option<String>,

    /// Admin password
    #[arg(long, env = "HELPDESK_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List tickets
    Tickets {
        /// `all` or one status
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// Case-insensitive search over title and owner
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show one ticket with its thread
    Show {
        /// Ticket id
        id: helpdesk_core::TicketId,
    },
    /// Change a ticket's status
    Status {
        /// Ticket id
        id: helpdesk_core::TicketId,
        /// new, in_progress, resolved or closed
        status: TicketStatus,
    },
    /// Post a support reply
    Reply {
        /// Ticket id
        id: helpdesk_core::TicketId,
        /// Reply text
        content: String,
    },
    /// List users
    Users {
        /// Case-insensitive search over name and email
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Create a user
    CreateUser {
        /// Login email
        #[arg(long)]
        email: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// user or admin
        #[arg(long, default_value = "user")]
        role: Role,
    },
    /// Edit a user
    UpdateUser {
        /// User id
        id: helpdesk_core::UserId,
        /// New login email
        #[arg(long)]
        email: Option<String>,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New role
        #[arg(long)]
        role: Option<Role>,
    },
    /// Delete a user; their tickets stay
    DeleteUser {
        /// User id
        id: helpdesk_core::UserId,
    },
}

async fn session(cli: &Cli, identity: &RestIdentityProvider) -> anyhow::Result<Session> {
    if let Some(token) = &cli.token {
        return identity
            .resolve(token)
            .await
            .context("access token was rejected");
    }
    match (&cli.email, &cli.password) {
        (Some(email), Some(password)) => identity
            .sign_in(email, password)
            .await
            .context("sign-in failed"),
        _ => bail!("provide --token (or HELPDESK_ACCESS_TOKEN), or --email and --password"),
    }
}

async fn run(store: &AdminPanelStore, action: AdminPanelAction) -> anyhow::Result<()> {
    let mut handle = store.send(action).await?;
    handle.wait_with_timeout(COMMAND_TIMEOUT).await?;

    let (denied, error, form_error) = store
        .state(|s| {
            (
                s.access_denied,
                s.error().map(str::to_string),
                s.user_form_error.clone(),
            )
        })
        .await;
    if denied {
        bail!("this account is not an admin");
    }
    if let Some(error) = error.or(form_error) {
        bail!(error);
    }
    Ok(())
}

fn print_tickets(state: &AdminPanelState) {
    for details in state.visible_tickets() {
        let ticket = &details.ticket;
        println!(
            "{}  {:<11} {:<7} {:<9} {}  ({}, {} messages)",
            ticket.id,
            ticket.status,
            ticket.priority,
            ticket.category,
            ticket.title,
            details.user.name,
            details.messages.len()
        );
    }
}

fn print_ticket(state: &AdminPanelState) {
    let Some(details) = state.selected() else {
        println!("Ticket not found");
        return;
    };
    let ticket = &details.ticket;
    println!("{} [{}] {}", ticket.id, ticket.status, ticket.title);
    println!("Opened by {} <{}> at {}", details.user.name, details.user.email, ticket.created_at);
    println!("{}\n", ticket.description);
    for message in &details.messages {
        let marker = if message.is_admin { "support" } else { "customer" };
        println!("[{}] {} ({marker}): {}", message.created_at, message.author.name, message.content);
    }
}

fn print_users(state: &AdminPanelState) {
    for user in state.visible_users() {
        println!("{}  {:<5} {} <{}>", user.id, user.role, user.name, user.email);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("loading configuration")?;
    let identity = RestIdentityProvider::new(config.remote.clone());
    let session = session(&cli, &identity).await?;

    let env = AdminPanelEnvironment::new(
        Arc::new(RestTicketStore::new(config.remote.clone())),
        session,
        config.status_policy,
    );
    let store = AdminPanelStore::new(AdminPanelState::default(), AdminPanelReducer::new(), env);

    match cli.command {
        Command::Tickets { status, search } => {
            store.send(AdminPanelAction::FilterStatus(status)).await?;
            store.send(AdminPanelAction::Search(search)).await?;
            run(&store, AdminPanelAction::LoadTickets).await?;
            store.state(print_tickets).await;
        },
        Command::Show { id } => {
            run(&store, AdminPanelAction::LoadTickets).await?;
            store.send(AdminPanelAction::SelectTicket(Some(id))).await?;
            store.state(print_ticket).await;
        },
        Command::Status { id, status } => {
            // Strict policy needs the current status
            run(&store, AdminPanelAction::LoadTickets).await?;
            run(&store, AdminPanelAction::ChangeStatus { ticket_id: id, status }).await?;
            println!("Ticket {id} is now {status}");
        },
        Command::Reply { id, content } => {
            run(&store, AdminPanelAction::Reply { ticket_id: id, content }).await?;
            store.send(AdminPanelAction::SelectTicket(Some(id))).await?;
            store.state(print_ticket).await;
        },
        Command::Users { search } => {
            store.send(AdminPanelAction::Search(search)).await?;
            run(&store, AdminPanelAction::LoadUsers).await?;
            store.state(print_users).await;
        },
        Command::CreateUser { email, name, role } => {
            run(&store, AdminPanelAction::CreateUser(NewUser { email, name, role })).await?;
            store.state(print_users).await;
        },
        Command::UpdateUser {
            id,
            email,
            name,
            role,
        } => {
            let changes = UserChanges { email, name, role };
            run(&store, AdminPanelAction::UpdateUser { id, changes }).await?;
            store.state(print_users).await;
        },
        Command::DeleteUser { id } => {
            run(&store, AdminPanelAction::DeleteUser(id)).await?;
            println!("Deleted user {id}");
        },
    }

    store.shutdown();
    Ok(())
}
