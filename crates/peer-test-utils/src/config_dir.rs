//! [`TestConfigDir`] builder for config directory scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Server section written at the top of every generated server config.
pub const INTERFACE_SECTION: &str = "\
[Interface]
PrivateKey = c2VydmVyLXByaXZhdGUta2V5LWZvci10ZXN0cw==
Address = 10.0.0.1/24
ListenPort = 51820
";

/// A client to lay down on disk and, optionally, in the server config.
#[derive(Debug, Clone)]
pub struct TestClient {
    pub name: String,
    pub public_key: Option<String>,
    pub allowed_ip: String,
    /// Write a `[Peer]` block for this client into the server config
    pub in_server_config: bool,
    /// Include the `# Client: <name>` comment in the peer block
    pub name_comment: bool,
}

impl TestClient {
    /// A fully registered client with a deterministic key.
    pub fn new(name: &str, allowed_ip: &str) -> Self {
        Self {
            name: name.to_string(),
            public_key: Some(Self::key_for(name)),
            allowed_ip: allowed_ip.to_string(),
            in_server_config: true,
            name_comment: true,
        }
    }

    /// A 44 character base64-looking key derived from the name.
    pub fn key_for(name: &str) -> String {
        let mut key: String = name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .cycle()
            .take(43)
            .collect();
        if key.is_empty() {
            key = "A".repeat(43);
        }
        key.push('=');
        key
    }

    pub fn without_public_key(mut self) -> Self {
        self.public_key = None;
        self
    }

    pub fn without_name_comment(mut self) -> Self {
        self.name_comment = false;
        self
    }

    pub fn without_peer_block(mut self) -> Self {
        self.in_server_config = false;
        self
    }

    /// The `[Peer]` block for this client.
    pub fn peer_block(&self) -> String {
        let mut block = String::from("[Peer]\n");
        let key = self
            .public_key
            .clone()
            .unwrap_or_else(|| Self::key_for(&self.name));
        block.push_str(&format!("PublicKey = {key}\n"));
        block.push_str(&format!("AllowedIPs = {}/32\n", self.allowed_ip));
        if self.name_comment {
            block.push_str(&format!("# Client: {}\n", self.name));
        }
        block
    }

    /// The client-side config used as QR payload.
    pub fn client_config(&self) -> String {
        format!(
            "[Interface]\nPrivateKey = cHJpdmF0ZS17fQ==\nAddress = {}/32\n\n[Peer]\nPublicKey = c2VydmVy\nEndpoint = vpn.example.com:51820\nAllowedIPs = 0.0.0.0/0\n",
            self.allowed_ip
        )
    }
}

/// A temporary config directory.
///
/// # Example
///
/// ```rust,no_run
/// use peer_test_utils::{TestClient, TestConfigDir};
///
/// let dir = TestConfigDir::with_clients(&[TestClient::new("alice", "10.0.0.2")]);
/// dir.assert_file_exists("clients/alice/publickey");
/// assert!(dir.server_config().contains("# Client: alice"));
/// ```
pub struct TestConfigDir {
    temp_dir: TempDir,
}

impl Default for TestConfigDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigDir {
    /// An empty temporary directory with no server config.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// A config directory whose server config lists `clients` in order.
    pub fn with_clients(clients: &[TestClient]) -> Self {
        let dir = Self::new();
        let mut server_config = INTERFACE_SECTION.to_string();
        for client in clients.iter().filter(|c| c.in_server_config) {
            server_config.push('\n');
            server_config.push_str(&client.peer_block());
        }
        dir.write_server_config(&server_config);
        for client in clients {
            dir.add_client_files(client);
        }
        dir
    }

    /// Return the config directory path.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn server_config_path(&self) -> PathBuf {
        self.root().join("server.conf")
    }

    pub fn client_dir(&self, name: &str) -> PathBuf {
        self.root().join("clients").join(name)
    }

    pub fn write_server_config(&self, content: &str) {
        fs::write(self.server_config_path(), content).unwrap();
    }

    pub fn server_config(&self) -> String {
        fs::read_to_string(self.server_config_path()).unwrap()
    }

    /// Create `clients/<name>/` with its public key and client config.
    pub fn add_client_files(&self, client: &TestClient) {
        let dir = self.client_dir(&client.name);
        fs::create_dir_all(&dir).unwrap();
        if let Some(key) = &client.public_key {
            fs::write(dir.join("publickey"), format!("{key}\n")).unwrap();
        }
        fs::write(dir.join(format!("{}.conf", client.name)), client.client_config()).unwrap();
    }

    /// Write a file relative to the config directory.
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.root().join(relative);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    pub fn assert_file_not_exists(&self, relative: &str) {
        let path = self.root().join(relative);
        assert!(!path.exists(), "Expected file to NOT exist: {}", path.display());
    }
}
