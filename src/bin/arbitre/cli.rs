//! Command-line interface for the arbitre live results client.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface for the arbitre live results client.
#[derive(Parser)]
#[command(name = "arbitre-live")]
#[command(about = "Follow arbitre submission results as they are graded")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "ARBITRE_CONFIG")]
    pub config: Option<PathBuf>,

    /// API host, port and optional path prefix (e.g. "localhost:8000")
    #[arg(long, env = "ARBITRE_API_HOST")]
    pub api_host: Option<String>,

    /// Talk to the API over https/wss
    #[arg(long, env = "ARBITRE_USE_HTTPS")]
    pub https: bool,

    /// Directory holding the persisted client state
    #[arg(long, env = "ARBITRE_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Access token (can also be set via ARBITRE_TOKEN environment variable)
    #[arg(short, long, env = "ARBITRE_TOKEN")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Store an access token for later commands
    Login {
        /// Access token issued by the grading service
        access_token: String,

        /// Name to remember alongside the token
        #[arg(long)]
        username: Option<String>,
    },
    /// Forget the stored access token
    Logout,
    /// Follow the results of a submission live
    Watch {
        /// Exercise id
        #[arg(short, long)]
        exercise: i64,

        /// Follow a specific user's submission instead of your own
        #[arg(short, long)]
        user: Option<i64>,

        /// Maximum grade of the exercise. Fetched from the API when omitted
        #[arg(short, long)]
        grade: Option<f64>,

        /// Exit once grading has finished
        #[arg(long)]
        until_done: bool,

        /// Show the diff of failed tests instead of hiding it
        #[arg(long)]
        reveal: bool,
    },
    /// Print a submitted file
    Preview {
        /// File reference as reported by the submission
        #[arg(short, long)]
        file: String,
    },
    /// Show the last visited exercise
    Visited,
}
