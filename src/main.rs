//! slirc - Straylight IRC client
//!
//! Connects with the settings in a TOML file, joins the configured
//! channels and logs everything it sees until Ctrl-C.

use anyhow::Context;
use slirc_client::config::validate;
use slirc_client::telemetry::{self, spans};
use slirc_client::{Client, ClientConfig, Event};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};

/// How long to wait for the server to close the link after QUIT.
const QUIT_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "slirc.toml".to_string());

    let config = ClientConfig::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validate(&config) {
        error!("Configuration validation failed:");
        for e in &errors {
            error!("  - {}", e);
        }
        return Err(anyhow::anyhow!(
            "invalid configuration: {} error(s)",
            errors.len()
        ));
    }

    info!(
        host = %config.host,
        port = config.port.unwrap_or(slirc_client::config::DEFAULT_PORT),
        nick = %config.nick,
        tls = config.tls,
        "Starting slirc"
    );

    let client = Client::new(config.clone());
    let logger = tokio::spawn(log_events(client.subscribe()));

    client.start().await.context("failed to start client")?;

    for channel in &config.channels {
        if let Err(e) = client.join(channel).await {
            warn!(channel = %channel, error = %e, "Auto-join failed");
        }
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, sending QUIT");
            client.stop(Some("Interrupted")).await;
            if tokio::time::timeout(QUIT_GRACE, client.wait_disconnected()).await.is_err() {
                warn!("Server did not close the link after QUIT");
            }
        }
        _ = client.wait_disconnected() => {}
    }

    logger.abort();
    info!("slirc stopped");
    Ok(())
}

async fn log_events(mut events: broadcast::Receiver<Event>) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Event log fell behind");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        let _span = spans::event(event.kind()).entered();
        match event {
            Event::Registered { nick, server } => {
                info!(nick = %nick, server = ?server, "Registered");
            }
            Event::Privmsg {
                source,
                target,
                text,
            } => info!(from = ?source, to = %target, "{}", text),
            Event::Notice {
                source,
                target,
                text,
            } => info!(from = ?source, to = %target, "-{}-", text),
            Event::Join { channel, nick } => info!(channel = %channel, nick = %nick, "Join"),
            Event::Part { channel, nick, .. } => info!(channel = %channel, nick = %nick, "Part"),
            Event::Kick {
                channel, nick, by, ..
            } => info!(channel = %channel, nick = %nick, by = ?by, "Kick"),
            Event::Quit { nick, reason } => info!(nick = %nick, reason = ?reason, "Quit"),
            Event::NickChanged { old, new } => info!(old = %old, new = %new, "Nick"),
            Event::NickRejected {
                attempted,
                response,
            } => warn!(nick = %attempted, code = response.code(), "Nick rejected"),
            Event::Topic { channel, topic } => info!(channel = %channel, topic = ?topic, "Topic"),
            Event::Disconnected { reason } => {
                info!(reason = %reason, "Disconnected");
                break;
            }
            other => tracing::debug!(event = ?other, "Event"),
        }
    }
}
