//! Error types for peer-fs

use std::path::PathBuf;

/// Result type for peer-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in peer-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Server not initialized: {path} does not exist")]
    ServerNotInitialized { path: PathBuf },

    #[error("Client '{name}' not found at {path}")]
    ClientNotFound { name: String, path: PathBuf },

    #[error("Config for client '{name}' does not exist: {path}")]
    ClientConfigNotFound { name: String, path: PathBuf },

    #[error("Invalid client name '{name}': {reason}")]
    InvalidClientName { name: String, reason: String },

    #[error("Refusing to write through symlink at {path}")]
    SymlinkInPath { path: PathBuf },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
