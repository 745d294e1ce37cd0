//! Client lifecycle: start, stop, send.
//!
//! ```text
//! start()                                   reader task
//!   connect ──▶ Connected ──▶ spawn ──────▶ read line ─▶ parse ─▶ registry / events
//!   PASS/NICK/USER                             │  001 ─▶ gate.release()
//!   gate.wait() ◀──────────────────────────────┘
//!
//! send_*() ──▶ guards ──▶ write lock ──▶ encode + write + flush
//! stop()   ──▶ flag ──▶ QUIT ──▶ ShuttingDown ──▶ reader exits ──▶ Disconnected
//! ```

mod gate;
mod nick;
mod reader;
mod state;
mod writer;

pub use gate::{ConnectionGate, GateOutcome};
pub use state::ConnectionState;

use crate::config::{ClientConfig, ResolvedConfig};
use crate::error::{ClientError, ClientResult};
use crate::events::{CommandGuard, Event, EventBus};
use crate::network;
use crate::state::{ChannelRegistry, ServerInfo};
use crate::telemetry::spans;
use nick::NickTracker;
use parking_lot::{Mutex, RwLock};
use slirc_proto::{LineCodec, Message};
use state::StateCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Notify, broadcast};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{Instrument, debug, info, warn};
use writer::{WriteMode, Writer, frame_line};

/// State shared between the caller-facing [`Client`] and the reader task.
pub(crate) struct Shared {
    pub(crate) config: ClientConfig,
    pub(crate) state: StateCell,
    pub(crate) gate: ConnectionGate,
    pub(crate) writer: Writer,
    pub(crate) nick: NickTracker,
    pub(crate) channels: ChannelRegistry,
    pub(crate) server_info: RwLock<ServerInfo>,
    pub(crate) events: EventBus,
    /// Set by stop() before the QUIT goes out.
    pub(crate) shutdown_requested: AtomicBool,
    /// Wakes the reader when a write fails so it can tear down.
    pub(crate) fault: Notify,
    pub(crate) fault_reason: Mutex<Option<String>>,
    /// Notified once the reader has finished tearing down.
    pub(crate) disconnected: Notify,
}

impl Shared {
    /// Frame, check and write one line.
    pub(crate) async fn send(&self, line: &str, mode: WriteMode) -> ClientResult<()> {
        if self.state.get() != ConnectionState::Connected {
            return Err(ClientError::NotConnected);
        }

        let framed = frame_line(line);
        let bare = framed.trim_end_matches("\r\n").to_string();
        self.events.check(&bare).map_err(ClientError::Vetoed)?;

        match self.writer.write(framed, mode, &self.state).await {
            Ok(()) => {
                debug!(line = %bare, ">>");
                self.events.publish(Event::CommandExecuted { line: bare });
                Ok(())
            }
            Err(e) => {
                match &e {
                    ClientError::Write(cause) => {
                        warn!(error = %cause, code = e.error_code(), "Write failed");
                        self.signal_fault(format!("write failed: {cause}"));
                    }
                    ClientError::Protocol(cause) => {
                        warn!(error = %cause, line = %bare, code = e.error_code(), "Line not sent");
                    }
                    _ => {}
                }
                Err(e)
            }
        }
    }

    /// Regular sends are paced once registration is complete.
    pub(crate) async fn send_paced(&self, line: &str) -> ClientResult<()> {
        let mode = if self.gate.is_registered() {
            WriteMode::Paced
        } else {
            WriteMode::Immediate
        };
        self.send(line, mode).await
    }

    /// Ask the reader to tear the connection down.
    pub(crate) fn signal_fault(&self, reason: String) {
        self.record_fault_reason(reason);
        self.fault.notify_one();
    }

    /// Keep the first reason the connection is going away.
    pub(crate) fn record_fault_reason(&self, reason: String) {
        self.fault_reason.lock().get_or_insert(reason);
    }

    pub(crate) fn take_fault_reason(&self) -> Option<String> {
        self.fault_reason.lock().take()
    }
}

/// An IRC client connection.
///
/// Cheap to clone; clones share one connection. A client registers at most
/// once: after the gate has been settled, create a new client to reconnect.
///
/// ```no_run
/// use slirc_client::{Client, ClientConfig};
///
/// # async fn run() -> Result<(), slirc_client::ClientError> {
/// let client = Client::new(ClientConfig::new("irc.example.org", "tester"));
/// client.start().await?;
/// client.join("#rust").await?;
/// client.privmsg("#rust", "hello").await?;
/// client.stop(Some("bye")).await;
/// client.wait_disconnected().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.shared.config.host)
            .field("state", &self.state())
            .field("nick", &self.nick())
            .finish()
    }
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        let events = EventBus::new(config.event_capacity);
        Self {
            shared: Arc::new(Shared {
                config,
                state: StateCell::new(),
                gate: ConnectionGate::new(),
                writer: Writer::new(),
                nick: NickTracker::new(),
                channels: ChannelRegistry::new(),
                server_info: RwLock::new(ServerInfo::default()),
                events,
                shutdown_requested: AtomicBool::new(false),
                fault: Notify::new(),
                fault_reason: Mutex::new(None),
                disconnected: Notify::new(),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    /// Host and nick are configured.
    pub fn is_initialized(&self) -> bool {
        self.shared.config.is_initialized()
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.state.get()
    }

    pub fn is_registered(&self) -> bool {
        self.shared.gate.is_registered()
    }

    /// The nick the server last confirmed.
    pub fn nick(&self) -> Option<String> {
        self.shared.nick.confirmed()
    }

    /// A requested nick the server has not answered yet.
    pub fn pending_nick(&self) -> Option<String> {
        self.shared.nick.pending()
    }

    pub fn channels(&self) -> &ChannelRegistry {
        &self.shared.channels
    }

    /// Snapshot of the server's advertised features.
    pub fn server_info(&self) -> ServerInfo {
        self.shared.server_info.read().clone()
    }

    pub fn events(&self) -> &EventBus {
        &self.shared.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.events.subscribe()
    }

    /// Install a pre-write check. See [`CommandGuard`].
    pub fn add_guard(&self, guard: Arc<dyn CommandGuard>) {
        self.shared.events.add_guard(guard);
    }

    /// Connect, register, and return once the server has confirmed
    /// registration.
    ///
    /// Without `registration_timeout_secs` this waits for as long as the
    /// connection stays up without a welcome.
    pub async fn start(&self) -> ClientResult<()> {
        let shared = &self.shared;
        if !shared.config.is_initialized() {
            return Err(ClientError::NotInitialized);
        }
        if shared.gate.is_settled() {
            return Err(ClientError::AlreadyUsed);
        }
        if !shared
            .state
            .transition(ConnectionState::Disconnected, ConnectionState::Connecting)
        {
            return Err(ClientError::AlreadyConnected);
        }

        let config = shared.config.resolve();
        let span = spans::connection(&config.host, config.port);
        self.connect_and_register(config).instrument(span).await
    }

    async fn connect_and_register(&self, config: ResolvedConfig) -> ClientResult<()> {
        let shared = &self.shared;

        let codecs = LineCodec::new(&config.encoding)
            .and_then(|read| LineCodec::new(&config.encoding).map(|write| (read, write)));
        let (read_codec, write_codec) = match codecs {
            Ok(codecs) => codecs,
            Err(e) => {
                shared.state.set(ConnectionState::Disconnected);
                return Err(e.into());
            }
        };

        let stream = match network::connect(&config).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Connect failed");
                shared.state.set(ConnectionState::Disconnected);
                shared.events.publish(Event::Disconnected {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        let (read_half, write_half) = tokio::io::split(stream);
        shared
            .writer
            .attach(
                FramedWrite::new(write_half, write_codec),
                config.queue_interval,
            )
            .await;
        shared
            .state
            .transition(ConnectionState::Connecting, ConnectionState::Connected);
        shared.events.publish(Event::Connected {
            host: config.host.clone(),
            port: config.port,
        });

        shared.nick.set_pending(config.nick.clone());
        let reader_span = spans::reader(&config.host);
        tokio::spawn(
            reader::run(shared.clone(), FramedRead::new(read_half, read_codec))
                .instrument(reader_span),
        );

        if let Err(e) = self.register(&config).await {
            shared.gate.abort(e.to_string());
            shared.signal_fault(format!("registration failed: {e}"));
            return Err(e);
        }

        let outcome = match config.registration_timeout {
            Some(limit) => match tokio::time::timeout(limit, shared.gate.wait()).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    if shared.gate.abort("registration timed out") {
                        shared.signal_fault("registration timed out".to_string());
                        return Err(ClientError::RegistrationTimeout(limit));
                    }
                    // Settled while the timeout fired.
                    shared.gate.wait().await
                }
            },
            None => shared.gate.wait().await,
        };

        match outcome {
            GateOutcome::Registered => {
                info!(nick = ?shared.nick.confirmed(), "Start complete");
                Ok(())
            }
            GateOutcome::Aborted(reason) => Err(ClientError::RegistrationAborted(reason)),
        }
    }

    /// PASS (if configured), NICK and USER. Not paced.
    async fn register(&self, config: &ResolvedConfig) -> ClientResult<()> {
        let shared = &self.shared;
        if let Some(password) = &config.password {
            shared
                .send(&Message::pass(password).to_string(), WriteMode::Immediate)
                .await?;
        }
        shared
            .send(&Message::nick(&config.nick).to_string(), WriteMode::Immediate)
            .await?;
        shared
            .send(
                &Message::user(&config.ident, &config.realname).to_string(),
                WriteMode::Immediate,
            )
            .await
    }

    /// Send QUIT and let the reader finish the teardown once the server
    /// closes the stream. No-op unless connected.
    pub async fn stop(&self, reason: Option<&str>) {
        let shared = &self.shared;
        if shared.state.get() != ConnectionState::Connected {
            debug!(state = %shared.state.get(), "Stop ignored: not connected");
            return;
        }

        shared.shutdown_requested.store(true, Ordering::Release);
        let quit = match reason {
            Some(reason) => Message::quit_with_message(reason),
            None => Message::quit(),
        };
        if let Err(e) = shared.send(&quit.to_string(), WriteMode::Closing).await {
            warn!(error = %e, code = e.error_code(), "QUIT not sent");
        }
        // A vetoed QUIT never reached the writer.
        shared
            .state
            .transition(ConnectionState::Connected, ConnectionState::ShuttingDown);
        info!("Shutting down");
    }

    /// Resolve once the reader loop has torn the connection down. Returns
    /// immediately if there is no connection.
    pub async fn wait_disconnected(&self) {
        let notified = self.shared.disconnected.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.shared.state.get() == ConnectionState::Disconnected {
            return;
        }
        notified.await;
    }

    /// Send a raw line. Anything after the first line break is dropped.
    /// Use [`crate::send_fmt!`] for the template-and-arguments form.
    pub async fn send_line(&self, line: impl Into<String>) -> ClientResult<()> {
        let line = line.into();
        self.shared.send_paced(&line).await
    }

    pub async fn send_message(&self, message: &Message) -> ClientResult<()> {
        self.shared.send_paced(&message.to_string()).await
    }

    /// Ask the server for a new nick.
    ///
    /// The new nick is held as pending once the NICK is written; it becomes
    /// the confirmed nick only when the server echoes the change, and is
    /// dropped if the server rejects it.
    pub async fn set_nick(&self, nick: &str) -> ClientResult<()> {
        let previous = self.shared.nick.set_pending(nick);
        let result = self.send_message(&Message::nick(nick)).await;
        if result.is_err() {
            self.shared.nick.restore_pending(previous);
        }
        result
    }

    pub async fn join(&self, channel: &str) -> ClientResult<()> {
        self.send_message(&Message::join(channel)).await
    }

    pub async fn join_with_key(&self, channel: &str, key: &str) -> ClientResult<()> {
        self.send_message(&Message::join_with_key(channel, key))
            .await
    }

    pub async fn part(&self, channel: &str, reason: Option<&str>) -> ClientResult<()> {
        self.send_message(&Message::part(channel, reason.map(str::to_string)))
            .await
    }

    pub async fn privmsg(&self, target: &str, text: &str) -> ClientResult<()> {
        self.send_message(&Message::privmsg(target, text)).await
    }

    pub async fn notice(&self, target: &str, text: &str) -> ClientResult<()> {
        self.send_message(&Message::notice(target, text)).await
    }
}
