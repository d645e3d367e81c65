//! Config directory layout.
//!
//! ```text
//! config/
//!   server.conf
//!   peerctl.toml               (optional)
//!   clients/<name>/publickey
//!   clients/<name>/<name>.conf
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, PeerPath, Result, Settings, io, validate_client_name};

/// Resolved paths of a config directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayout {
    /// The config directory itself
    pub root: PathBuf,
    /// The server config holding the peer blocks
    pub server_config: PathBuf,
    /// Parent of the per-client directories
    pub clients_dir: PathBuf,
}

impl ConfigLayout {
    /// Resolves the layout under `root` without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>, settings: &Settings) -> Self {
        let root = root.into();
        Self {
            server_config: root.join(&settings.server_config),
            clients_dir: root.join(&settings.clients_dir),
            root,
        }
    }

    /// Resolves the layout and checks that the server has been initialized.
    ///
    /// # Errors
    /// Returns `Error::ServerNotInitialized` if the server config is missing.
    pub fn open(root: &Path, settings: &Settings) -> Result<Self> {
        let root = dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        let layout = Self::new(root, settings);

        if !layout.server_config.is_file() {
            return Err(Error::ServerNotInitialized {
                path: layout.server_config,
            });
        }

        tracing::debug!(root = %layout.root.display(), "Opened config directory");
        Ok(layout)
    }

    /// Names of all client directories, sorted.
    ///
    /// A missing clients directory means there are no clients.
    pub fn client_names(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.clients_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(&self.clients_dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&self.clients_dir, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => tracing::warn!("Skipping client directory with non UTF-8 name: {:?}", raw),
            }
        }
        names.sort();
        Ok(names)
    }

    /// Directory holding a client's key material.
    pub fn client_dir(&self, name: &str) -> Result<PathBuf> {
        validate_client_name(name)?;
        Ok(self.clients_dir.join(name))
    }

    pub fn client_exists(&self, name: &str) -> Result<bool> {
        Ok(self.client_dir(name)?.is_dir())
    }

    /// Reads a client's public key, trimmed.
    ///
    /// Returns `None` when the key file is missing or blank.
    pub fn read_public_key(&self, name: &str) -> Result<Option<String>> {
        let path = self.client_dir(name)?.join(PeerPath::PublicKey);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let key = content.trim();
                Ok((!key.is_empty()).then(|| key.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    /// Path of the client config handed to QR rendering.
    pub fn client_config_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self.client_dir(name)?.join(format!("{name}.conf")))
    }

    /// Reads the client config text.
    ///
    /// # Errors
    /// Returns `Error::ClientConfigNotFound` if the file does not exist.
    pub fn read_client_config(&self, name: &str) -> Result<String> {
        let path = self.client_config_path(name)?;
        if !path.is_file() {
            return Err(Error::ClientConfigNotFound {
                name: name.to_string(),
                path,
            });
        }
        io::read_text(&path)
    }

    pub fn read_server_config(&self) -> Result<String> {
        io::read_text(&self.server_config)
    }

    /// Replaces the server config atomically.
    pub fn write_server_config(&self, content: &str) -> Result<()> {
        io::write_text(&self.server_config, content)
    }

    /// Deletes a client's directory with everything in it.
    ///
    /// # Errors
    /// Returns `Error::ClientNotFound` if the directory does not exist.
    pub fn remove_client_dir(&self, name: &str) -> Result<()> {
        let dir = self.client_dir(name)?;
        if !dir.is_dir() {
            return Err(Error::ClientNotFound {
                name: name.to_string(),
                path: dir,
            });
        }
        io::remove_dir_all(&dir)
    }
}
