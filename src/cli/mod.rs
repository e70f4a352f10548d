//! Command-line interface.

pub mod completions;
pub mod context;
pub mod keys;
pub mod output;
pub mod secrets;
pub mod sync;
pub mod whoami;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::domain::Mode;
use crate::error::Result;

pub use context::{Context, Globals};

/// envsync - Push local configuration into a Convex deployment.
#[derive(Parser)]
#[command(
    name = "envsync",
    about = "Push local configuration into a Convex deployment",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Credential mode (local or cloud); overrides ENVSYNC_MODE
    #[arg(long, global = true, value_name = "MODE")]
    pub mode: Option<Mode>,

    /// Preview deployment name for preview deploy keys
    #[arg(long, global = true, value_name = "NAME")]
    pub preview_name: Option<String>,

    /// Path to config file (default: .envsync.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn globals(&self) -> Globals {
        Globals {
            config: self.config.clone(),
            mode: self.mode,
            preview_name: self.preview_name.clone(),
        }
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Apply every KEY=VALUE in a file to the deployment
    Sync {
        /// Source file (default: [sync] env_file, .env.convex)
        file: Option<PathBuf>,
        /// Additional key to leave out (repeatable)
        #[arg(short, long, value_name = "KEY")]
        exclude: Vec<String>,
        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set one value
    Set {
        /// Variable name (e.g., SITE_URL)
        key: String,
        /// Value; may start with '-'
        #[arg(allow_hyphen_values = true, required_unless_present = "stdin")]
        value: Option<String>,
        /// Read the value from stdin (multi-line allowed)
        #[arg(long, conflicts_with = "value")]
        stdin: bool,
    },

    /// Print one value
    Get {
        /// Variable name
        key: String,
    },

    /// List variable names
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the token signing key
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },

    /// Show the resolved credential mode and target
    Whoami,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Signing key subcommands.
#[derive(Subcommand)]
pub enum KeysAction {
    /// Generate JWT_PRIVATE_KEY and JWKS and store them
    Generate {
        /// Replace an existing key
        #[arg(short, long)]
        force: bool,
        /// Skip the overwrite confirmation
        #[arg(short, long)]
        yes: bool,
        /// RSA modulus size (2048, 3072 or 4096)
        #[arg(long)]
        bits: Option<usize>,
        /// Also print the JWKS record
        #[arg(long)]
        print: bool,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// How a command finished, for the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything requested was done.
    Done,
    /// Completed, but some keys failed or the run was cancelled.
    Incomplete,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Done => 0,
            Outcome::Incomplete => 2,
        }
    }
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<Outcome> {
    let globals = cli.globals();

    match cli.command {
        Command::Sync {
            file,
            exclude,
            dry_run,
            json,
        } => sync::execute(&globals, file, exclude, dry_run, json),
        Command::Set { key, value, stdin } => {
            secrets::set(&globals, &key, value, stdin).map(|_| Outcome::Done)
        }
        Command::Get { key } => secrets::get(&globals, &key).map(|_| Outcome::Done),
        Command::List { json } => secrets::list(&globals, json).map(|_| Outcome::Done),
        Command::Keys { action } => match action {
            KeysAction::Generate {
                force,
                yes,
                bits,
                print,
            } => keys::generate(&globals, force, yes, bits, print).map(|_| Outcome::Done),
        },
        Command::Whoami => whoami::execute(&globals).map(|_| Outcome::Done),
        Command::Completions { shell } => completions::execute(shell).map(|_| Outcome::Done),
    }
}
