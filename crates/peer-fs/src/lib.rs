//! Config directory layout and safe file I/O for peer management
//!
//! Resolves the server config and per-client key directories, loads optional
//! settings, and writes the server config back atomically.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use config::{ConfigStore, DisplaySettings, SETTINGS_FILES, Settings};
pub use constants::PeerPath;
pub use error::{Error, Result};
pub use layout::ConfigLayout;
pub use path::validate_client_name;
