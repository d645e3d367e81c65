//! Settings discovery and format-agnostic config loading

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};

use crate::{Error, PeerPath, Result, io};

/// Format-agnostic configuration loader.
///
/// Detects the format from the file extension.
#[derive(Debug, Default)]
pub struct ConfigStore;

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = io::read_text(path)?;
        let parse_error = |format: &str, message: String| Error::ConfigParse {
            path: path.to_path_buf(),
            format: format.into(),
            message,
        };

        match extension_of(path).as_str() {
            "toml" => toml::from_str(&content).map_err(|e| parse_error("TOML", e.to_string())),
            "json" => serde_json::from_str(&content).map_err(|e| parse_error("JSON", e.to_string())),
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| parse_error("YAML", e.to_string()))
            }
            other => Err(Error::UnsupportedFormat {
                extension: other.to_string(),
            }),
        }
    }
}

/// How public keys are shortened for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Leading characters kept
    pub key_head: usize,
    /// Trailing characters kept
    pub key_tail: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            key_head: 20,
            key_tail: 10,
        }
    }
}

impl DisplaySettings {
    /// Shortens a key to `head...tail` when it is longer than both together.
    pub fn truncate_key(&self, key: &str) -> String {
        let chars: Vec<char> = key.chars().collect();
        if chars.len() <= self.key_head + self.key_tail {
            return key.to_string();
        }
        let head: String = chars[..self.key_head].iter().collect();
        let tail: String = chars[chars.len() - self.key_tail..].iter().collect();
        format!("{head}...{tail}")
    }
}

/// Settings file names accepted in the config directory, by precedence.
pub const SETTINGS_FILES: [&str; 4] = [
    PeerPath::Settings.as_str(),
    "peerctl.json",
    "peerctl.yaml",
    "peerctl.yml",
];

/// Settings read from `peerctl.toml` (or its JSON/YAML twin) in the config
/// directory.
///
/// Paths are relative to the config directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_config: String,
    pub clients_dir: String,
    pub display: DisplaySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_config: PeerPath::ServerConfig.as_str().to_string(),
            clients_dir: PeerPath::ClientsDir.as_str().to_string(),
            display: DisplaySettings::default(),
        }
    }
}

impl Settings {
    /// Finds the settings file in `config_dir`.
    ///
    /// Candidates are tried in [`SETTINGS_FILES`] order, so `peerctl.toml`
    /// wins when several exist.
    pub fn find(config_dir: &Path) -> Option<PathBuf> {
        SETTINGS_FILES
            .iter()
            .map(|name| config_dir.join(name))
            .find(|path| path.is_file())
    }

    /// Loads the settings file from `config_dir`, falling back to defaults
    /// when there is none.
    pub fn load_or_default(config_dir: &Path) -> Result<Self> {
        let Some(path) = Self::find(config_dir) else {
            tracing::debug!(dir = %config_dir.display(), "No settings file, using defaults");
            return Ok(Self::default());
        };
        tracing::debug!(path = %path.display(), "Loading settings");
        ConfigStore::new().load(&path)
    }
}
