//! Shared test fixtures for the peer management workspace.
//!
//! Dev-dependency only; never published.
//!
//! # Modules
//!
//! - [`config_dir`]: [`TestConfigDir`] builder for a server config plus
//!   client key directories

pub mod config_dir;

pub use config_dir::{INTERFACE_SECTION, TestClient, TestConfigDir};
