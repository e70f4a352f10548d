//! Completions command.

use clap::CommandFactory;
use clap_complete::{generate, Shell as CompletionShell};
use std::io::Write;

use crate::cli::{Cli, Shell};
use crate::error::Result;

const BIN_NAME: &str = "envsync";

impl From<Shell> for CompletionShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
        }
    }
}

/// Generate shell completions on stdout.
pub fn execute(shell: Shell) -> Result<()> {
    write(shell, &mut std::io::stdout())
}

/// Write the completion script for `shell` to `out`.
pub fn write(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    generate(CompletionShell::from(shell), &mut cmd, BIN_NAME, out);
    out.flush()?;
    Ok(())
}
