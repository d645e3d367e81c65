//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// peerctl - Inspect and remove VPN clients from a server config
#[derive(Parser, Debug)]
#[command(name = "peerctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding server.conf and clients/
    #[arg(
        long,
        global = true,
        env = "PEERCTL_CONFIG_DIR",
        default_value = "./config"
    )]
    pub config_dir: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List clients and their addresses
    ///
    /// By default walks the clients/ directory and looks up each client's
    /// peer block by name, then by public key.
    ///
    /// Examples:
    ///   peerctl list              # One entry per client directory
    ///   peerctl list --peers      # One entry per [Peer] block
    ///   peerctl list --json       # Machine-readable output
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        /// List the [Peer] blocks of the server config instead
        #[arg(long)]
        peers: bool,
    },

    /// Remove a client's peer block and its key directory
    ///
    /// Examples:
    ///   peerctl remove alice --dry-run   # Show the config diff only
    ///   peerctl remove alice --yes       # No confirmation prompt
    Remove {
        /// Name of the client to remove
        name: String,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print a client's config as a terminal QR code
    ShowQr {
        /// Name of the client
        name: String,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   peerctl completions bash > ~/.local/share/bash-completion/completions/peerctl
    ///   peerctl completions zsh > ~/.zfunc/_peerctl
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
