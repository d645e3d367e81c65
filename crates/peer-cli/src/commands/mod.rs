//! Command implementations for peer-cli

pub mod completions;
pub mod list;
pub mod qr;
pub mod remove;

use std::path::Path;

use peer_fs::{ConfigLayout, Settings};

use crate::error::Result;

pub use completions::run_completions;
pub use list::run_list;
pub use qr::run_show_qr;
pub use remove::run_remove;

/// Loads settings and opens the config directory.
pub fn open_layout(config_dir: &Path) -> Result<(ConfigLayout, Settings)> {
    let settings = Settings::load_or_default(config_dir)?;
    let layout = ConfigLayout::open(config_dir, &settings)?;
    Ok((layout, settings))
}
