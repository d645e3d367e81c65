//! Remove command: drop a client's peer block and key directory

use std::io::IsTerminal;
use std::path::Path;

use colored::Colorize;
use dialoguer::Confirm;
use peer_blocks::{ClientIdentity, Removal};
use peer_fs::ConfigLayout;
use similar::TextDiff;

use super::open_layout;
use crate::error::{CliError, Result};

/// Lines of context around each hunk in the dry-run diff.
const DIFF_CONTEXT: usize = 2;

/// Everything `remove` will do, computed before anything is touched.
#[derive(Debug)]
pub struct RemovalPlan {
    pub name: String,
    pub public_key: Option<String>,
    pub original: String,
    pub removal: Removal,
}

impl RemovalPlan {
    /// Whether the server config changes.
    pub fn changes_config(&self) -> bool {
        self.removal.removed
    }
}

/// Resolves the client and computes the edited server config.
///
/// # Errors
/// Fails with a user error when the client directory does not exist.
pub fn plan_removal(layout: &ConfigLayout, name: &str) -> Result<RemovalPlan> {
    if !layout.client_exists(name)? {
        return Err(CliError::user(format!("Client '{name}' not found!")));
    }

    let public_key = layout.read_public_key(name)?;
    if public_key.is_none() {
        tracing::warn!("No public key for {}, matching by name only", name);
    }

    let identity = ClientIdentity::new(name).with_optional_public_key(public_key.clone());
    let original = layout.read_server_config()?;
    let removal = peer_blocks::remove_block(&original, &identity)?;

    Ok(RemovalPlan {
        name: name.to_string(),
        public_key,
        original,
        removal,
    })
}

/// Unified diff of the server config before and after the edit.
pub fn config_diff(old: &str, new: &str, path: &Path) -> String {
    let label = path.display().to_string();
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(DIFF_CONTEXT)
        .header(&label, &label)
        .to_string()
}

/// Writes the edited config (only when a block was removed) and deletes the
/// client directory.
pub fn apply_removal(layout: &ConfigLayout, plan: &RemovalPlan) -> Result<()> {
    if plan.changes_config() {
        layout.write_server_config(&plan.removal.document)?;
        println!("{} Removed peer block from server config", "✓".green());
    } else {
        tracing::warn!(client = %plan.name, "No peer block found in server config");
        println!(
            "{} No peer block for '{}' in server config",
            "warning:".yellow().bold(),
            plan.name
        );
    }

    layout.remove_client_dir(&plan.name)?;
    println!("{} Removed client directory", "✓".green());
    Ok(())
}

/// Run the remove command
pub fn run_remove(config_dir: &Path, name: &str, dry_run: bool, yes: bool) -> Result<()> {
    let (layout, _settings) = open_layout(config_dir)?;
    let plan = plan_removal(&layout, name)?;

    if dry_run {
        println!("{} Would remove client '{}'", "[dry-run]".cyan(), plan.name);
        if plan.changes_config() {
            print!(
                "{}",
                config_diff(&plan.original, &plan.removal.document, &layout.server_config)
            );
        } else {
            println!("No peer block for '{}' in server config", plan.name);
        }
        println!(
            "Would delete {}",
            layout.client_dir(&plan.name)?.display()
        );
        return Ok(());
    }

    if !yes && !confirm(&plan.name)? {
        println!("Aborted.");
        return Ok(());
    }

    apply_removal(&layout, &plan)?;
    println!("{} Client '{}' removed", "✓".green().bold(), plan.name);
    Ok(())
}

fn confirm(name: &str) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::user(
            "Refusing to remove without confirmation in a non-interactive session; pass --yes",
        ));
    }

    Ok(Confirm::new()
        .with_prompt(format!("Remove client '{name}'?"))
        .default(false)
        .interact()?)
}
