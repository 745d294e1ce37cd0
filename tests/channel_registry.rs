//! Channel registry invariants, directly and as driven by the server.

mod common;

use common::{FakeServer, connect_client, wait_for_event};
use slirc_client::{ChannelRegistry, Event, RegistryError};
use std::sync::Arc;

#[test]
fn test_get_channel_is_idempotent() {
    for limit in [0, 50] {
        let registry = ChannelRegistry::with_max_name_len(limit);
        for name in ["#general", "&local", "#a", "#rust-lang"] {
            let first = registry.get_channel(name).unwrap();
            let second = registry.get_channel(name).unwrap();
            assert!(Arc::ptr_eq(&first, &second), "{name} with limit {limit}");
            assert_eq!(first.name(), name);
        }
        assert_eq!(registry.len(), 4);
    }
}

#[test]
fn test_too_long_name_leaves_registry_unchanged() {
    let registry = ChannelRegistry::with_max_name_len(8);
    registry.get_channel("#short").unwrap();
    let before = registry.names();

    for name in ["#waytoolong", "#123456789"] {
        let err = registry.get_channel(name).unwrap_err();
        assert!(matches!(err, RegistryError::ChannelNameTooLong { .. }));
    }

    assert_eq!(registry.names(), before);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_remove_then_get_returns_new_instance() {
    let registry = ChannelRegistry::new();
    let first = registry.get_channel("#general").unwrap();
    registry.remove_channel("#general");
    let second = registry.get_channel("#general").unwrap();
    assert!(!Arc::ptr_eq(&first, &second));

    // Removing an absent name is a no-op.
    assert!(registry.remove_channel("#nowhere").is_none());
    assert_eq!(registry.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_get_channel_creates_each_once() {
    const N: usize = 64;
    const M: usize = 8;

    let registry = Arc::new(ChannelRegistry::new());
    let names: Arc<Vec<String>> = Arc::new((0..N).map(|i| format!("#chan{i}")).collect());

    let tasks: Vec<_> = (0..M)
        .map(|m| {
            let registry = registry.clone();
            let names = names.clone();
            tokio::spawn(async move {
                // Each caller walks the names from a different offset.
                (0..N)
                    .map(|i| {
                        let name = &names[(i + m * 7) % N];
                        (name.clone(), registry.get_channel(name).unwrap())
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut results = Vec::new();
    for task in tasks {
        results.extend(task.await.expect("task panicked"));
    }

    assert_eq!(registry.len(), N);
    for (name, channel) in results {
        let canonical = registry.get(&name).expect("channel missing");
        assert!(Arc::ptr_eq(&canonical, &channel), "duplicate entity for {name}");
    }
}

#[tokio::test]
async fn test_server_events_drive_registry() {
    let server = FakeServer::bind().await;
    let (client, mut peer) = connect_client(&server, server.config("tester")).await;
    let mut events = client.subscribe();

    peer.send(":tester!t@host JOIN #rust").await;
    peer.send(":irc.test 332 tester #rust :Systems programming").await;
    peer.send(":irc.test 353 tester = #rust :tester @alice +bob").await;
    peer.send(":irc.test 366 tester #rust :End of /NAMES list").await;
    wait_for_event(&mut events, |e| {
        matches!(e, Event::Numeric { response, .. } if response.code() == 366)
    })
    .await;

    let channel = client.channels().get("#rust").expect("channel not tracked");
    assert_eq!(channel.topic().as_deref(), Some("Systems programming"));
    assert_eq!(channel.members(), vec!["alice", "bob", "tester"]);

    peer.send(":bob!b@host PART #rust :later").await;
    peer.send(":alice!a@host NICK carol").await;
    wait_for_event(&mut events, |e| matches!(e, Event::NickChanged { .. })).await;
    assert_eq!(channel.members(), vec!["carol", "tester"]);

    peer.send(":carol!c@host KICK #rust tester :out").await;
    let event = wait_for_event(&mut events, |e| matches!(e, Event::Kick { .. })).await;
    assert_eq!(
        event,
        Event::Kick {
            channel: "#rust".into(),
            nick: "tester".into(),
            by: Some("carol".into()),
            reason: Some("out".into()),
        }
    );
    assert!(!client.channels().contains("#rust"));
}

#[tokio::test]
async fn test_own_part_removes_channel() {
    let server = FakeServer::bind().await;
    let (client, mut peer) = connect_client(&server, server.config("tester")).await;
    let mut events = client.subscribe();

    client.join("#rust").await.expect("join failed");
    assert_eq!(peer.recv_line().await, "JOIN #rust");
    peer.send(":tester!t@host JOIN #rust").await;
    wait_for_event(&mut events, |e| matches!(e, Event::Join { .. })).await;
    let joined = client.channels().get("#rust").expect("channel not tracked");

    client.part("#rust", Some("bye")).await.expect("part failed");
    assert_eq!(peer.recv_line().await, "PART #rust :bye");
    peer.send(":tester!t@host PART #rust :bye").await;
    wait_for_event(&mut events, |e| matches!(e, Event::Part { .. })).await;
    assert!(client.channels().is_empty());

    peer.send(":tester!t@host JOIN #rust").await;
    wait_for_event(&mut events, |e| matches!(e, Event::Join { .. })).await;
    let rejoined = client.channels().get("#rust").expect("channel not tracked");
    assert!(!Arc::ptr_eq(&joined, &rejoined));
}

#[tokio::test]
async fn test_isupport_channellen_limits_registry() {
    let server = FakeServer::bind().await;
    let (client, mut peer) = connect_client(&server, server.config("tester")).await;
    let mut events = client.subscribe();

    peer.send(":irc.test 005 tester NETWORK=TestNet CHANNELLEN=6 :are supported by this server")
        .await;
    peer.send(":tester!t@host JOIN #toolong").await;
    peer.send(":tester!t@host JOIN #short").await;
    wait_for_event(&mut events, |e| {
        matches!(e, Event::Join { channel, .. } if channel == "#short")
    })
    .await;

    let info = client.server_info();
    assert_eq!(info.network.as_deref(), Some("TestNet"));
    assert_eq!(info.channel_len, 6);
    assert_eq!(client.channels().max_name_len(), 6);
    assert_eq!(client.channels().names(), vec!["#short"]);
}
