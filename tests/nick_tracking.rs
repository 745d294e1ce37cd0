//! Confirmed vs pending nick.

mod common;

use common::{FakeServer, connect_client, wait_for_event};
use slirc_client::{Client, ClientConfig, ClientError, Event, slirc_proto::Response};
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn test_welcome_sets_confirmed_nick() {
    let server = FakeServer::bind().await;
    let client = Client::new(server.config("tester"));
    let starter = {
        let client = client.clone();
        tokio::spawn(async move { client.start().await })
    };

    let mut peer = server.accept().await;
    peer.expect_registration().await;
    assert_eq!(client.pending_nick().as_deref(), Some("tester"));

    // The server may register us under a different nick.
    peer.welcome("tester_").await;
    timeout(Duration::from_secs(5), starter)
        .await
        .expect("start did not resolve")
        .expect("start task panicked")
        .expect("start failed");

    assert_eq!(client.nick().as_deref(), Some("tester_"));
    assert_eq!(client.pending_nick(), None);
}

#[tokio::test]
async fn test_set_nick_is_pending_until_echoed() {
    let server = FakeServer::bind().await;
    let (client, mut peer) = connect_client(&server, server.config("tester")).await;
    let mut events = client.subscribe();

    client.set_nick("renamed").await.expect("set_nick failed");
    assert_eq!(peer.recv_line().await, "NICK renamed");
    assert_eq!(client.nick().as_deref(), Some("tester"));
    assert_eq!(client.pending_nick().as_deref(), Some("renamed"));

    peer.send(":tester!t@host NICK :renamed").await;
    let event = wait_for_event(&mut events, |e| matches!(e, Event::NickChanged { .. })).await;
    assert_eq!(
        event,
        Event::NickChanged {
            old: "tester".into(),
            new: "renamed".into()
        }
    );
    assert_eq!(client.nick().as_deref(), Some("renamed"));
    assert_eq!(client.pending_nick(), None);
}

#[tokio::test]
async fn test_rejected_nick_reverts() {
    let server = FakeServer::bind().await;
    let (client, mut peer) = connect_client(&server, server.config("tester")).await;
    let mut events = client.subscribe();

    client.set_nick("taken").await.expect("set_nick failed");
    assert_eq!(peer.recv_line().await, "NICK taken");

    peer.send(":irc.test 433 tester taken :Nickname is already in use")
        .await;
    let event = wait_for_event(&mut events, |e| matches!(e, Event::NickRejected { .. })).await;
    assert_eq!(
        event,
        Event::NickRejected {
            attempted: "taken".into(),
            response: Response::ERR_NICKNAMEINUSE,
        }
    );
    assert_eq!(client.nick().as_deref(), Some("tester"));
    assert_eq!(client.pending_nick(), None);

    // No replacement nick is tried on our behalf.
    assert_eq!(peer.try_recv_line(Duration::from_millis(100)).await, None);
}

#[tokio::test]
async fn test_set_nick_without_connection_keeps_state() {
    let client = Client::new(ClientConfig::new("127.0.0.1", "tester"));
    let err = client.set_nick("other").await.unwrap_err();
    assert!(matches!(err, ClientError::NotConnected));
    assert_eq!(client.pending_nick(), None);
    assert_eq!(client.nick(), None);
}

#[tokio::test]
async fn test_other_users_nick_change_leaves_ours() {
    let server = FakeServer::bind().await;
    let (client, mut peer) = connect_client(&server, server.config("tester")).await;
    let mut events = client.subscribe();

    peer.send(":alice!a@host NICK alicia").await;
    wait_for_event(&mut events, |e| matches!(e, Event::NickChanged { .. })).await;
    assert_eq!(client.nick().as_deref(), Some("tester"));
}
