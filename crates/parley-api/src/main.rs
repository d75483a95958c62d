//! Parley CLI and REST API entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod http;
mod state;

use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use parley_core::repository::user::UserRepository;
use parley_types::error::{RepositoryError, UserError};
use parley_types::user::User;

use http::extractors::auth::{hash_token, mint_token};
use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "parley", version, about = "Authenticated chat service with pluggable reply generation")]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Emit machine-readable JSON output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the REST API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 8787)]
        port: u16,
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Create a user and print their API token (shown once)
    CreateUser {
        /// Username for the new account
        username: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate for
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,parley=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (DB, services)
    let state = AppState::init().await?;

    match cli.command {
        Commands::CreateUser { username } => {
            create_user(&state, &username, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Parley API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!(
                "  {}",
                console::style(format!(
                    "Reply generator: {}",
                    state.chat_service.generator_name()
                ))
                .dim()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Provision a user account and print the plaintext token once.
async fn create_user(state: &AppState, username: &str, json: bool) -> anyhow::Result<()> {
    let username = username.trim();
    if username.is_empty() {
        anyhow::bail!("username must not be empty");
    }

    let token = mint_token();
    let user = User {
        id: Uuid::now_v7(),
        username: username.to_string(),
        token_hash: hash_token(&token),
        created_at: Utc::now(),
        last_seen_at: None,
    };

    state.user_repo.create_user(&user).await.map_err(|e| match e {
        RepositoryError::Conflict(_) => {
            anyhow::Error::new(UserError::UsernameConflict(username.to_string()))
        }
        other => anyhow::anyhow!("failed to create user: {other}"),
    })?;

    if json {
        let out = serde_json::json!({
            "id": user.id.to_string(),
            "username": user.username,
            "token": token,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        println!(
            "  {} User '{}' created with id {}",
            console::style("✓").green(),
            console::style(&user.username).cyan(),
            user.id
        );
        println!();
        println!(
            "  {} API token (save this -- it won't be shown again):",
            console::style("🔑").bold()
        );
        println!();
        println!("  {}", console::style(&token).yellow().bold());
        println!();
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
