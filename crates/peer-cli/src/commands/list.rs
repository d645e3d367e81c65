//! List command: clients and their peer blocks

use std::path::Path;

use colored::Colorize;
use peer_blocks::{ClientIdentity, MatchKind, MatchOutcome, PeerBlock, PeerRecord};
use peer_fs::{ConfigLayout, DisplaySettings};
use serde::Serialize;

use super::open_layout;
use crate::error::Result;

/// Shown for a field that could not be resolved.
const NOT_AVAILABLE: &str = "N/A";

/// One client directory joined with its peer block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
    pub name: String,
    pub allowed_ip: Option<String>,
    pub public_key: Option<String>,
    pub matched_by: Option<MatchKind>,
}

/// Walks the client directories and resolves each one against the server
/// config. Unreadable keys and unusable names degrade to missing fields.
pub fn collect_clients(layout: &ConfigLayout) -> Result<Vec<ClientSummary>> {
    let server_config = layout.read_server_config()?;
    let mut clients = Vec::new();

    for name in layout.client_names()? {
        let public_key = layout.read_public_key(&name).unwrap_or_else(|e| {
            tracing::warn!("Failed to read public key for {}: {}", name, e);
            None
        });

        let identity = ClientIdentity::new(name.as_str()).with_optional_public_key(public_key.clone());
        let outcome = peer_blocks::find_block(&server_config, &identity).unwrap_or_else(|e| {
            tracing::warn!("Cannot look up client {:?}: {}", name, e);
            MatchOutcome::NotFound
        });

        clients.push(ClientSummary {
            allowed_ip: outcome.block().and_then(PeerBlock::allowed_ip),
            matched_by: outcome.matched_by(),
            name,
            public_key,
        });
    }

    Ok(clients)
}

/// Run the list command
pub fn run_list(config_dir: &Path, json: bool, peers: bool) -> Result<()> {
    let (layout, settings) = open_layout(config_dir)?;

    if peers {
        let records = peer_blocks::list_fields(&layout.read_server_config()?);
        if json {
            println!("{}", serde_json::to_string_pretty(&records)?);
        } else {
            print!("{}", render_peers(&records, &settings.display));
        }
        return Ok(());
    }

    let clients = collect_clients(&layout)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&clients)?);
    } else if clients.is_empty() {
        println!("No clients found.");
    } else {
        println!("{}", "=== Clients ===".bold());
        println!();
        print!("{}", render_clients(&clients, &settings.display));
    }

    Ok(())
}

/// Text listing, one stanza per client.
pub fn render_clients(clients: &[ClientSummary], display: &DisplaySettings) -> String {
    let mut out = String::new();
    for client in clients {
        let ip = client.allowed_ip.as_deref().unwrap_or(NOT_AVAILABLE);
        let key = client
            .public_key
            .as_deref()
            .map(|k| display.truncate_key(k))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        out.push_str(&format!("Client: {}\n", client.name.green()));
        out.push_str(&format!("  IP: {ip}/32\n"));
        out.push_str(&format!("  Public Key: {key}\n"));
        out.push('\n');
    }
    out
}

/// Text listing, one stanza per `[Peer]` block.
pub fn render_peers(records: &[PeerRecord], display: &DisplaySettings) -> String {
    if records.is_empty() {
        return "No peers in server config.\n".to_string();
    }

    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "Peer #{} {}\n",
            record.index + 1,
            format!("(line {})", record.line).dimmed()
        ));
        out.push_str(&format!("  Client: {}\n", record.client_name));
        out.push_str(&format!("  IP: {}\n", record.allowed_ip));
        out.push_str(&format!(
            "  Public Key: {}\n",
            display.truncate_key(&record.public_key)
        ));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use peer_fs::Settings;
    use peer_test_utils::{TestClient, TestConfigDir};
    use pretty_assertions::assert_eq;

    fn layout(dir: &TestConfigDir) -> ConfigLayout {
        ConfigLayout::open(dir.root(), &Settings::default()).unwrap()
    }

    #[test]
    fn test_collect_resolves_by_name_and_key() {
        let dir = TestConfigDir::with_clients(&[
            TestClient::new("alice", "10.0.0.2"),
            TestClient::new("bob", "10.0.0.3").without_name_comment(),
            TestClient::new("carol", "10.0.0.4").without_peer_block(),
        ]);

        let clients = collect_clients(&layout(&dir)).unwrap();

        let summary: Vec<_> = clients
            .iter()
            .map(|c| (c.name.as_str(), c.allowed_ip.as_deref(), c.matched_by))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("alice", Some("10.0.0.2"), Some(MatchKind::Name)),
                ("bob", Some("10.0.0.3"), Some(MatchKind::PublicKey)),
                ("carol", None, None),
            ]
        );
    }

    #[test]
    fn test_collect_without_key_file() {
        let dir = TestConfigDir::with_clients(&[
            TestClient::new("dave", "10.0.0.5").without_public_key(),
        ]);

        let clients = collect_clients(&layout(&dir)).unwrap();

        assert_eq!(clients[0].public_key, None);
        assert_eq!(clients[0].allowed_ip.as_deref(), Some("10.0.0.5"));
    }

    #[test]
    fn test_collect_tolerates_unusable_names() {
        let dir = TestConfigDir::with_clients(&[TestClient::new("alice", "10.0.0.2")]);
        std::fs::create_dir_all(dir.root().join("clients/.cache")).unwrap();

        let clients = collect_clients(&layout(&dir)).unwrap();

        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].name, ".cache");
        assert_eq!(clients[0].allowed_ip, None);
    }

    #[test]
    fn test_render_clients() {
        colored::control::set_override(false);
        let clients = vec![
            ClientSummary {
                name: "alice".into(),
                allowed_ip: Some("10.0.0.2".into()),
                public_key: Some("YWJjZGVmZ2hpamtsbW5vcHFyc3R1dnd4eXoxMjM0NTY=".into()),
                matched_by: Some(MatchKind::Name),
            },
            ClientSummary {
                name: "bob".into(),
                allowed_ip: None,
                public_key: None,
                matched_by: None,
            },
        ];

        let rendered = render_clients(&clients, &DisplaySettings::default());

        insta::assert_snapshot!(rendered, @r"
        Client: alice
          IP: 10.0.0.2/32
          Public Key: YWJjZGVmZ2hpamtsbW5v...oxMjM0NTY=

        Client: bob
          IP: N/A/32
          Public Key: N/A
        ");
    }

    #[test]
    fn test_render_peers_empty() {
        assert_eq!(
            render_peers(&[], &DisplaySettings::default()),
            "No peers in server config.\n"
        );
    }
}
