//! Well-known names inside a peer config directory.

use std::path::Path;

/// Standard files and directories of a config directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerPath {
    /// The config directory used when none is given (`./config`)
    DefaultConfigDir,
    /// The server config holding the `[Peer]` blocks
    ServerConfig,
    /// Directory with one subdirectory per client
    ClientsDir,
    /// A client's public key file, inside its directory
    PublicKey,
    /// Optional settings file in the config directory
    Settings,
}

impl PeerPath {
    /// Get the string representation of the path.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultConfigDir => "config",
            Self::ServerConfig => "server.conf",
            Self::ClientsDir => "clients",
            Self::PublicKey => "publickey",
            Self::Settings => "peerctl.toml",
        }
    }
}

impl AsRef<Path> for PeerPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for PeerPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for PeerPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
