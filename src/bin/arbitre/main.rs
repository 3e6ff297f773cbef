//! arbitre live results client
//!
//! Follows the grading of a submission through the service's push channel and
//! prints the results as they come in:
//!
//! - **Login / Logout**: Store or forget the access token used by the channel
//! - **Watch**: Stream the results of an exercise submission
//! - **Preview**: Print a submitted file
//! - **Visited**: Show the last exercise that was watched

mod cli;
mod commands;

use arbitre_live::config::ClientConfig;
use arbitre_live::prelude::*;
use arbitre_live::state::AppState;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{
    flush_notifications, handle_login, handle_logout, handle_preview, handle_visited, handle_watch,
};

/// Main entry point.
///
/// # Examples
///
/// ```bash
/// # Remember a token
/// arbitre-live login eyJhbGciOi...
///
/// # Follow your own submission of exercise 12
/// arbitre-live watch --exercise 12 --until-done
///
/// # Follow user 4's submission on a https deployment
/// arbitre-live --api-host arbitre.example.org --https watch --exercise 12 --user 4
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arbitre_live=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let mut state = AppState::load(config.state.dir.clone())?;

    let result = match cli.command {
        Commands::Login {
            access_token,
            username,
        } => handle_login(&mut state, access_token, username),
        Commands::Logout => handle_logout(&mut state),
        Commands::Watch {
            exercise,
            user,
            grade,
            until_done,
            reveal,
        } => {
            let options = commands::WatchOptions {
                exercise,
                user,
                grade,
                until_done,
                reveal,
            };
            handle_watch(&config, &mut state, cli.token, options).await
        }
        Commands::Preview { file } => handle_preview(&config, &state, cli.token, &file).await,
        Commands::Visited => handle_visited(&state),
    };

    flush_notifications(&mut state.notifications);
    result
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(host) = &cli.api_host {
        config.server.host = host.clone();
    }
    if cli.https {
        config.server.https = true;
    }
    if let Some(dir) = &cli.state_dir {
        config.state.dir = dir.clone();
    }
    Ok(config)
}
