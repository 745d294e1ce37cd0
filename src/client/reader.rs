//! Reader loop: the only consumer of the inbound half of the socket.

use super::writer::WriteMode;
use super::{ConnectionState, Shared};
use crate::events::Event;
use crate::network::BoxedStream;
use futures_util::StreamExt;
use slirc_proto::{Command, Isupport, LineCodec, Message, Response};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::io::ReadHalf;
use tokio_util::codec::FramedRead;
use tracing::{debug, info, warn};

pub(crate) type LineStream = FramedRead<ReadHalf<BoxedStream>, LineCodec>;

/// Membership prefixes stripped from `RPL_NAMREPLY` entries.
const MEMBER_PREFIXES: &[char] = &['~', '&', '@', '%', '+'];

/// Read until the stream ends, a read fails, a write fault is signalled, or
/// a requested shutdown is seen between lines. Then tear down.
pub(crate) async fn run(shared: Arc<Shared>, mut lines: LineStream) {
    let reason = loop {
        let next = tokio::select! {
            biased;
            _ = shared.fault.notified() => {
                break shared
                    .take_fault_reason()
                    .unwrap_or_else(|| "connection fault".to_string());
            }
            next = lines.next() => next,
        };

        let line = match next {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                warn!(error = %e, "Read failed");
                break format!("read failed: {e}");
            }
            None => {
                if shared.shutdown_requested.load(Ordering::Acquire) {
                    break "client quit".to_string();
                }
                break shared
                    .take_fault_reason()
                    .unwrap_or_else(|| "connection closed by server".to_string());
            }
        };

        if !line.is_empty() {
            debug!(line = %line, "<<");
            match line.parse::<Message>() {
                Ok(message) => {
                    if let Some(reply) = dispatch(&shared, message) {
                        // Keepalive replies skip the pacing queue.
                        if let Err(e) = shared.send(&reply.to_string(), WriteMode::Immediate).await {
                            debug!(error = %e, "Reply not sent");
                        }
                    }
                }
                Err(e) => warn!(error = %e, line = %line, "Unparseable line"),
            }
        }

        if shared.state.get() == ConnectionState::ShuttingDown {
            break "client quit".to_string();
        }
    };

    // Release the socket before anything else can observe the new state.
    drop(lines);
    teardown(&shared, reason).await;
}

async fn teardown(shared: &Shared, reason: String) {
    shared.writer.detach().await;
    shared.channels.clear();
    shared.state.set(ConnectionState::Disconnected);
    if shared.gate.abort(reason.clone()) {
        warn!(reason = %reason, "Disconnected before registration");
    }
    info!(reason = %reason, "Disconnected");
    shared.events.publish(Event::Disconnected { reason });
    shared.disconnected.notify_waiters();
}

/// Apply one inbound message to client state and publish it. Returns a
/// line to send back, if the message calls for one.
fn dispatch(shared: &Shared, message: Message) -> Option<Message> {
    let source = message.source_nickname().map(str::to_string);

    match message.command {
        Command::PING(server, _) => return Some(Message::pong(server)),
        Command::PONG(..) => {}

        Command::Response(response, ref args) => {
            handle_numeric(shared, &message, response, args);
            shared.events.publish(Event::Numeric {
                response,
                args: args.clone(),
            });
        }

        Command::JOIN(channel, _) => {
            let nick = source.unwrap_or_default();
            if shared.nick.is_me(&nick) {
                match shared.channels.get_channel(&channel) {
                    Ok(entry) => {
                        entry.add_member(nick.clone());
                        info!(channel = %channel, "Joined");
                    }
                    Err(e) => warn!(error = %e, code = e.error_code(), "Join not tracked"),
                }
            } else if let Some(entry) = shared.channels.get(&channel) {
                entry.add_member(nick.clone());
            }
            shared.events.publish(Event::Join { channel, nick });
        }

        Command::PART(channel, reason) => {
            let nick = source.unwrap_or_default();
            if shared.nick.is_me(&nick) {
                shared.channels.remove_channel(&channel);
                info!(channel = %channel, "Parted");
            } else if let Some(entry) = shared.channels.get(&channel) {
                entry.remove_member(&nick);
            }
            shared.events.publish(Event::Part {
                channel,
                nick,
                reason,
            });
        }

        Command::KICK(channel, nick, reason) => {
            if shared.nick.is_me(&nick) {
                shared.channels.remove_channel(&channel);
                warn!(channel = %channel, by = ?source, "Kicked");
            } else if let Some(entry) = shared.channels.get(&channel) {
                entry.remove_member(&nick);
            }
            shared.events.publish(Event::Kick {
                channel,
                nick,
                by: source,
                reason,
            });
        }

        Command::QUIT(reason) => {
            let nick = source.unwrap_or_default();
            for channel in shared.channels.snapshot() {
                channel.remove_member(&nick);
            }
            shared.events.publish(Event::Quit { nick, reason });
        }

        Command::NICK(new) => {
            let old = source.unwrap_or_default();
            if shared.nick.on_nick_change(&old, &new) {
                info!(old = %old, new = %new, "Nick changed");
            }
            for channel in shared.channels.snapshot() {
                channel.rename_member(&old, &new);
            }
            shared.events.publish(Event::NickChanged { old, new });
        }

        Command::TOPIC(channel, topic) => {
            if let Some(entry) = shared.channels.get(&channel) {
                entry.set_topic(topic.clone());
            }
            shared.events.publish(Event::Topic { channel, topic });
        }

        Command::MODE(target, modes) => {
            shared.events.publish(Event::Mode {
                source,
                target,
                modes,
            });
        }

        Command::PRIVMSG(target, text) => {
            shared.events.publish(Event::Privmsg {
                source,
                target,
                text,
            });
        }

        Command::NOTICE(target, text) => {
            shared.events.publish(Event::Notice {
                source,
                target,
                text,
            });
        }

        Command::ERROR(text) => {
            warn!(error = %text, "Server error");
            // The server closes the link after ERROR; remember why.
            shared.record_fault_reason(text.clone());
            shared.gate.abort(text);
        }

        Command::PASS(_) | Command::USER(..) | Command::Raw(..) => {}
    }

    None
}

fn handle_numeric(shared: &Shared, message: &Message, response: Response, args: &[String]) {
    match response {
        Response::RPL_WELCOME => {
            if let Some(nick) = args.first() {
                shared.nick.on_welcome(nick);
            }
            let server = message.prefix.as_ref().map(|p| p.name().to_string());
            shared.server_info.write().server_name = server.clone();

            if shared.gate.release() {
                let nick = shared.nick.confirmed().unwrap_or_default();
                info!(nick = %nick, server = ?server, "Registered");
                shared.events.publish(Event::Registered { nick, server });
            }
        }
        Response::RPL_ISUPPORT => {
            if let Some(isupport) = Isupport::from_message(message) {
                shared.server_info.write().apply(&isupport);
                if let Some(limit) = isupport.channellen() {
                    shared.channels.set_max_name_len(limit);
                }
            }
        }
        Response::RPL_TOPIC => {
            if let [_, channel, topic, ..] = args {
                if let Some(entry) = shared.channels.get(channel) {
                    entry.set_topic(Some(topic.clone()));
                }
            }
        }
        Response::RPL_NAMREPLY => {
            if let [_, _, channel, names, ..] = args {
                if let Some(entry) = shared.channels.get(channel) {
                    for name in names.split_whitespace() {
                        let nick = name.trim_start_matches(MEMBER_PREFIXES);
                        if !nick.is_empty() {
                            entry.add_member(nick);
                        }
                    }
                }
            }
        }
        r if r.is_nick_rejection() => {
            if let Some(attempted) = shared.nick.on_rejected() {
                warn!(nick = %attempted, code = r.code(), "Nick rejected");
                shared.events.publish(Event::NickRejected {
                    attempted,
                    response: r,
                });
            }
        }
        _ => {}
    }
}
