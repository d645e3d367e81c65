//! peerctl
//!
//! Lists, removes, and shows VPN clients kept in a server config plus a
//! per-client key directory.

mod cli;
mod commands;
mod error;

use std::path::Path;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    tracing::debug!(config_dir = %cli.config_dir.display(), "Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cmd, &cli.config_dir),
        None => {
            println!("{} VPN client management", "peerctl".green().bold());
            println!();
            println!("Run {} for available commands.", "peerctl --help".cyan());
            Ok(())
        }
    }
}

/// Logs go to stderr. `RUST_LOG` is honoured unless `--verbose` forces debug.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}

fn execute_command(cmd: Commands, config_dir: &Path) -> Result<()> {
    match cmd {
        Commands::List { json, peers } => commands::run_list(config_dir, json, peers),
        Commands::Remove { name, dry_run, yes } => {
            commands::run_remove(config_dir, &name, dry_run, yes)
        }
        Commands::ShowQr { name } => commands::run_show_qr(config_dir, &name),
        Commands::Completions { shell } => commands::run_completions(shell),
    }
}
