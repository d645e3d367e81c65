//! Shell completion generation

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;
use crate::error::Result;

/// Write the completion script for `shell` to stdout.
pub fn run_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "peerctl", &mut std::io::stdout());
    Ok(())
}
