//! Helpers for driving a [`Client`] against a [`FakeServer`].

use super::server::{FakeServer, Peer};
use slirc_client::{Client, ClientConfig, Event};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::timeout;

/// Start a client and complete registration from the server side.
pub async fn connect_client(server: &FakeServer, config: ClientConfig) -> (Client, Peer) {
    let nick = config.nick.clone();
    let client = Client::new(config);

    let starter = {
        let client = client.clone();
        tokio::spawn(async move { client.start().await })
    };

    let mut peer = server.accept().await;
    peer.expect_registration().await;
    peer.welcome(&nick).await;

    timeout(Duration::from_secs(5), starter)
        .await
        .expect("start did not complete")
        .expect("start task panicked")
        .expect("start failed");

    (client, peer)
}

/// Wait for the first event matching `pred`, skipping everything else.
pub async fn wait_for_event<F>(events: &mut broadcast::Receiver<Event>, mut pred: F) -> Event
where
    F: FnMut(&Event) -> bool,
{
    timeout(Duration::from_secs(5), async {
        loop {
            match events.recv().await {
                Ok(event) if pred(&event) => return event,
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => panic!("event bus closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}
