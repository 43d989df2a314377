//! CLI module for Warden
//!
//! Provides command-line interface parsing for the warden-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Warden - token authentication and role-based access server
#[derive(Parser, Debug)]
#[command(
    name = "warden-server",
    version,
    about = "Warden - token authentication and role-based access server",
    long_about = "Exchanges username/password logins for signed bearer tokens and guards\n\
                  routes by role.\n\n\
                  Run without arguments to start the server.",
    after_help = "EXAMPLES:\n    \
                  warden-server                          # Start the server (requires warden.toml)\n    \
                  warden-server --config my.toml         # Use a custom config file\n    \
                  warden-server hash-password s3cret     # Hash a password for a [[users]] entry\n    \
                  warden-server generate-secret          # Print a fresh signing secret\n    \
                  warden-server config --validate        # Check warden.toml and the secret"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "warden.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the server (the default when no subcommand is given)
    Serve,

    /// Hash a password with argon2id for use in a `[[users]]` entry
    HashPassword {
        /// Plain-text password to hash
        password: String,
    },

    /// Print a random 64-character hex secret suitable for signing tokens
    GenerateSecret,

    /// Show configuration information
    Config {
        /// Validate the configuration file and the signing secret
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
