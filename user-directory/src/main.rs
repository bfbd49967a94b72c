//! Command-line client for the agency user directory.
//!
//! Mounts a directory over the HTTP API, runs one command, prints the
//! outcome banner and the table, then shuts down.

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_directory::{
    AlertStatus, Config, DirectoryState, HttpUserApi, UserDirectory, UserForm, UserId,
};

#[derive(Parser)]
#[command(name = "user-directory")]
#[command(about = "Manage agency users", long_about = None)]
struct Cli {
    /// Backend base URL (overrides USER_DIRECTORY_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all users
    List,
    /// Create a user
    Create {
        /// Username of the new user
        username: String,
        /// Extra form fields as key=value (e.g. email=ana@example.com)
        fields: Vec<String>,
    },
    /// Rename a user
    Rename {
        /// Id of the user
        id: u64,
        /// New username
        username: String,
    },
    /// Delete a user
    Delete {
        /// Id of the user
        id: u64,
    },
}

fn parse_fields(username: String, fields: &[String]) -> Result<UserForm> {
    let mut form = UserForm::new(username);
    for field in fields {
        let Some((key, value)) = field.split_once('=') else {
            bail!("form field `{field}` is not in key=value form");
        };
        form = form.with_field(key.trim(), Value::String(value.to_string()));
    }
    Ok(form)
}

fn print_table(state: &DirectoryState) {
    if state.alert.is_visible() {
        let marker = match state.alert.status {
            AlertStatus::Success => "ok",
            AlertStatus::Danger => "error",
            AlertStatus::None => "",
        };
        println!("[{marker}] {}", state.alert.message);
    }

    println!("{:>6}  USERNAME", "ID");
    for user in &state.users {
        println!("{:>6}  {}", user.id, user.username);
    }
    println!(
        "{} users, {} per page, {} page(s)",
        state.user_count(),
        state.per_page,
        state.page_count()
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(base_url = %config.api.base_url, "Configuration loaded");

    let mut api = HttpUserApi::with_timeout(&config.api.base_url, config.request_timeout())
        .context("failed to build HTTP client")?;
    if let Some(token) = &config.api.api_token {
        api = api.with_api_token(token);
    }
    if let Some(token) = &config.api.bearer_token {
        api = api.with_bearer_token(token);
    }

    let directory = UserDirectory::from_config(Arc::new(api), &config);

    let mut handle = match cli.command {
        Command::List => directory.get_users().await?,
        Command::Create { username, fields } => {
            let form = parse_fields(username, &fields)?;
            directory.get_users().await?.wait().await;
            directory.create_user(form).await?
        },
        Command::Rename { id, username } => {
            let id = UserId::new(id);
            directory.get_users().await?.wait().await;
            let mut handle = directory.edit_user(id, UserForm::new(username.clone())).await?;
            handle.wait().await;
            // The server does not echo the record back, so patch the row locally
            if directory.state(|s| s.alert.status).await == AlertStatus::Success {
                directory.update_username(username, id).await?;
            }
            handle
        },
        Command::Delete { id } => {
            let id = UserId::new(id);
            directory.get_users().await?.wait().await;
            let username = directory
                .state(|s| s.get(id).map(|user| user.username.clone()))
                .await
                .unwrap_or_default();
            directory.update_user_to_delete(username, id).await?;
            directory.delete_user(id).await?
        },
    };

    handle
        .wait_with_timeout(config.request_timeout())
        .await
        .context("request did not complete")?;

    print_table(&directory.snapshot().await);

    let failed = directory.state(|s| s.alert.status == AlertStatus::Danger).await;

    directory
        .shutdown(None)
        .await
        .context("in-flight requests did not finish")?;
    info!("Shutdown complete");

    if failed {
        bail!("the request was rejected, see the log for details");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;

    #[test]
    fn fields_become_form_entries() {
        let fields = vec!["email=ana@example.com".to_string(), " role =admin=1".to_string()];
        let form = parse_fields("ana".to_string(), &fields).unwrap();

        assert_eq!(form.username, "ana");
        assert_eq!(form.fields["email"], "ana@example.com");
        assert_eq!(form.fields["role"], "admin=1");
    }

    #[test]
    fn field_without_separator_is_rejected() {
        let error = parse_fields("ana".to_string(), &["email".to_string()]).unwrap_err();
        assert_eq!(error.to_string(), "form field `email` is not in key=value form");
    }
}
