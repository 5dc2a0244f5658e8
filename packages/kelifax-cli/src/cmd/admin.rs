//! Submission review: login, listing, approve/reject, delete.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use dialoguer::{Input, Password};
use kelifax_client::{ActionOutcome, KelifaxClient, ResourceStatus};

use super::print_resource_line;
use crate::context::AppContext;

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Start an admin session
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },

    /// End the admin session
    Logout,

    /// List submissions awaiting review
    Pending {
        /// Status to list instead of `pending`
        #[arg(short, long)]
        status: Option<ResourceStatus>,

        /// List every submission regardless of status
        #[arg(long, conflicts_with = "status")]
        all: bool,
    },

    /// Approve a submission
    Approve { slug: String },

    /// Reject a submission
    Reject { slug: String },

    /// Delete a resource
    Delete {
        slug: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(ctx: &AppContext, command: AdminCommand) -> Result<()> {
    let client = ctx.client()?;

    match command {
        AdminCommand::Login { username } => login(ctx, &client, username).await,
        AdminCommand::Logout => {
            client.logout().context("Failed to clear the session")?;
            ctx.print_success("Logged out.");
            Ok(())
        }
        AdminCommand::Pending { status, all } => {
            require_session(&client)?;
            let status = if all {
                None
            } else {
                Some(status.unwrap_or(ResourceStatus::Pending))
            };
            let submissions = client
                .list_submissions(status)
                .await
                .context("Failed to list submissions")?;

            let heading = match status {
                Some(status) => format!("{} submission(s) {}", submissions.len(), status),
                None => format!("{} submission(s)", submissions.len()),
            };
            ctx.print_header(&heading);
            for resource in &submissions {
                print_resource_line(resource);
            }
            Ok(())
        }
        AdminCommand::Approve { slug } => {
            set_status(ctx, &client, &slug, ResourceStatus::Approved).await
        }
        AdminCommand::Reject { slug } => {
            set_status(ctx, &client, &slug, ResourceStatus::Rejected).await
        }
        AdminCommand::Delete { slug, yes } => {
            require_session(&client)?;
            if !yes && !ctx.confirm(&format!("Delete {}? This cannot be undone", slug), false)? {
                ctx.print_info("Cancelled.");
                return Ok(());
            }
            let outcome = client
                .delete_resource(&slug)
                .await
                .context("Failed to delete resource")?;
            report(ctx, outcome)
        }
    }
}

async fn login(ctx: &AppContext, client: &KelifaxClient, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::<String>::with_theme(&ctx.theme())
            .with_prompt("Username")
            .interact_text()?,
    };
    let password = Password::with_theme(&ctx.theme())
        .with_prompt("Password")
        .interact()?;

    let session = client
        .login(&username, &password)
        .await
        .context("Login failed")?;

    ctx.print_success(&format!(
        "Logged in as {} until {}",
        session.username,
        session.expires_at.format("%Y-%m-%d %H:%M UTC")
    ));
    Ok(())
}

async fn set_status(
    ctx: &AppContext,
    client: &KelifaxClient,
    slug: &str,
    status: ResourceStatus,
) -> Result<()> {
    require_session(client)?;
    let outcome = client
        .update_resource_status(slug, status)
        .await
        .context("Failed to update resource status")?;
    report(ctx, outcome)
}

fn require_session(client: &KelifaxClient) -> Result<()> {
    if !client.is_authenticated() {
        bail!("Not logged in. Run `kelifax admin login` first");
    }
    Ok(())
}

fn report(ctx: &AppContext, outcome: ActionOutcome) -> Result<()> {
    if !outcome.success {
        bail!(outcome.message);
    }
    ctx.print_success(&outcome.message);
    Ok(())
}
