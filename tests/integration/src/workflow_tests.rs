//! End-to-end workflows across the filesystem layer and the block editor
//!
//! Each test lays down a config directory, then walks the same steps the
//! `peerctl` commands take: open the layout, resolve clients, edit the server
//! config, and check what ends up on disk.

use peer_blocks::{ClientIdentity, MatchKind, find_block, list_fields, remove_block, scan};
use peer_fs::{ConfigLayout, Settings};
use peer_test_utils::{INTERFACE_SECTION, TestClient, TestConfigDir};
use pretty_assertions::assert_eq;

fn open(dir: &TestConfigDir) -> ConfigLayout {
    ConfigLayout::open(dir.root(), &Settings::default()).unwrap()
}

fn identity_for(layout: &ConfigLayout, name: &str) -> ClientIdentity {
    let key = layout.read_public_key(name).unwrap();
    ClientIdentity::new(name).with_optional_public_key(key)
}

/// Removes a client the way `peerctl remove --yes` does.
fn remove_client(layout: &ConfigLayout, name: &str) -> bool {
    let identity = identity_for(layout, name);
    let removal = remove_block(&layout.read_server_config().unwrap(), &identity).unwrap();
    if removal.removed {
        layout.write_server_config(&removal.document).unwrap();
    }
    layout.remove_client_dir(name).unwrap();
    removal.removed
}

#[test]
fn test_list_then_remove_every_client() {
    let dir = TestConfigDir::with_clients(&[
        TestClient::new("alice", "10.0.0.2"),
        TestClient::new("bob", "10.0.0.3").without_name_comment(),
        TestClient::new("carol", "10.0.0.4"),
    ]);
    let layout = open(&dir);

    let names = layout.client_names().unwrap();
    assert_eq!(names, vec!["alice", "bob", "carol"]);

    let server_config = layout.read_server_config().unwrap();
    let resolved: Vec<_> = names
        .iter()
        .map(|name| {
            let outcome = find_block(&server_config, &identity_for(&layout, name)).unwrap();
            (outcome.matched_by(), outcome.block().and_then(|b| b.allowed_ip()))
        })
        .collect();
    assert_eq!(
        resolved,
        vec![
            (Some(MatchKind::Name), Some("10.0.0.2".to_string())),
            (Some(MatchKind::PublicKey), Some("10.0.0.3".to_string())),
            (Some(MatchKind::Name), Some("10.0.0.4".to_string())),
        ]
    );

    for name in &names {
        assert!(remove_client(&layout, name), "no block removed for {name}");
    }

    assert!(layout.client_names().unwrap().is_empty());
    assert!(scan(&dir.server_config()).is_empty());
    assert_eq!(dir.server_config(), format!("{INTERFACE_SECTION}\n"));
}

#[test]
fn test_remove_middle_client_keeps_neighbours_byte_for_byte() {
    let clients = [
        TestClient::new("alice", "10.0.0.2"),
        TestClient::new("bob", "10.0.0.3"),
        TestClient::new("carol", "10.0.0.4"),
    ];
    let dir = TestConfigDir::with_clients(&clients);
    let layout = open(&dir);

    assert!(remove_client(&layout, "bob"));

    let expected = format!(
        "{INTERFACE_SECTION}\n{}\n{}",
        clients[0].peer_block(),
        clients[2].peer_block()
    );
    assert_eq!(dir.server_config(), expected);
    dir.assert_file_not_exists("clients/bob");
    dir.assert_file_exists("clients/alice/alice.conf");
}

#[test]
fn test_orphaned_client_directory_is_still_removed() {
    let dir = TestConfigDir::with_clients(&[
        TestClient::new("alice", "10.0.0.2"),
        TestClient::new("ghost", "10.0.0.9").without_peer_block(),
    ]);
    let layout = open(&dir);
    let before = dir.server_config();

    assert!(!remove_client(&layout, "ghost"));

    assert_eq!(dir.server_config(), before);
    dir.assert_file_not_exists("clients/ghost");
}

#[test]
fn test_peer_listing_matches_server_config() {
    let dir = TestConfigDir::with_clients(&[
        TestClient::new("alice", "10.0.0.2"),
        TestClient::new("bob", "10.0.0.3").without_name_comment(),
    ]);
    let layout = open(&dir);

    let records = list_fields(&layout.read_server_config().unwrap());
    let json = serde_json::to_value(&records).unwrap();

    assert_eq!(json[0]["client_name"], "alice");
    assert_eq!(json[0]["allowed_ip"], "10.0.0.2");
    assert_eq!(json[1]["client_name"], "unknown");
    assert_eq!(json[1]["public_key"], TestClient::key_for("bob"));
}

#[test]
fn test_custom_layout_from_settings_file() {
    let dir = TestConfigDir::new();
    dir.write_file(
        "peerctl.toml",
        "server_config = \"wg0.conf\"\nclients_dir = \"peers\"\n",
    );
    let alice = TestClient::new("alice", "10.0.0.2");
    dir.write_file("wg0.conf", &format!("{INTERFACE_SECTION}\n{}", alice.peer_block()));
    dir.write_file("peers/alice/publickey", &TestClient::key_for("alice"));

    let settings = Settings::load_or_default(dir.root()).unwrap();
    let layout = ConfigLayout::open(dir.root(), &settings).unwrap();

    assert_eq!(layout.client_names().unwrap(), vec!["alice"]);
    assert!(remove_client(&layout, "alice"));
    assert_eq!(
        std::fs::read_to_string(dir.root().join("wg0.conf")).unwrap(),
        format!("{INTERFACE_SECTION}\n")
    );
}

#[test]
fn test_uninitialized_directory_is_rejected() {
    let dir = TestConfigDir::new();
    let err = ConfigLayout::open(dir.root(), &Settings::default()).unwrap_err();
    assert!(matches!(err, peer_fs::Error::ServerNotInitialized { .. }));
}
