//! Outbound writer: the single serialized path onto the socket.

use super::state::{ConnectionState, StateCell};
use crate::error::{ClientError, ClientResult};
use crate::network::BoxedStream;
use futures_util::SinkExt;
use parking_lot::Mutex as SyncMutex;
use slirc_proto::{LineCodec, ProtocolError};
use std::time::Duration;
use tokio::io::WriteHalf;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::codec::FramedWrite;

pub(crate) type LineSink = FramedWrite<WriteHalf<BoxedStream>, LineCodec>;

/// Cut a line at its first line break and terminate it.
///
/// Every outbound write is exactly one protocol line, whatever the caller
/// passed in.
pub(crate) fn frame_line(line: &str) -> String {
    let end = line.find(['\r', '\n']).unwrap_or(line.len());
    let mut framed = String::with_capacity(end + 2);
    framed.push_str(&line[..end]);
    framed.push_str("\r\n");
    framed
}

/// How a line goes through the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteMode {
    /// Straight to the write lock.
    Immediate,
    /// Waits for its pacing slot, then takes the lock.
    Paced,
    /// The session's QUIT. The state moves to `ShuttingDown` before the
    /// lock is released, so nothing queued behind it reaches the wire.
    Closing,
}

/// Owns the write half of the connection.
///
/// The async mutex is the write lock: one caller at a time runs
/// encode, write and flush, and queued callers are woken in FIFO order.
/// The guard is scoped, so the lock is released on every exit path.
pub(crate) struct Writer {
    sink: Mutex<Option<LineSink>>,
    interval: SyncMutex<Duration>,
    next_slot: SyncMutex<Option<Instant>>,
}

impl std::fmt::Debug for Writer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Writer")
            .field("attached", &self.sink.try_lock().ok().map(|sink| sink.is_some()))
            .field("interval", &*self.interval.lock())
            .finish_non_exhaustive()
    }
}

impl Writer {
    pub(crate) fn new() -> Self {
        Self {
            sink: Mutex::new(None),
            interval: SyncMutex::new(Duration::ZERO),
            next_slot: SyncMutex::new(None),
        }
    }

    /// Install the write half for a new connection.
    pub(crate) async fn attach(&self, sink: LineSink, interval: Duration) {
        *self.interval.lock() = interval;
        *self.next_slot.lock() = None;
        *self.sink.lock().await = Some(sink);
    }

    /// Drop the write half. Later writes fail with `NotConnected`.
    pub(crate) async fn detach(&self) {
        self.sink.lock().await.take();
    }

    /// Claim the next pacing slot. `None` means write now.
    fn reserve_slot(&self) -> Option<Instant> {
        let interval = *self.interval.lock();
        if interval.is_zero() {
            return None;
        }
        let now = Instant::now();
        let mut next = self.next_slot.lock();
        let slot = match *next {
            Some(at) if at > now => at,
            _ => now,
        };
        *next = Some(slot + interval);
        (slot > now).then_some(slot)
    }

    /// Write one already-framed line.
    ///
    /// Paced writes wait for their slot before queueing on the lock, so an
    /// unpaced write (a PONG) never sits behind the pacing delay. The state
    /// is checked again once the lock is held: a write that waited through
    /// a stop fails with `NotConnected` and puts nothing on the wire.
    pub(crate) async fn write(
        &self,
        framed: String,
        mode: WriteMode,
        state: &StateCell,
    ) -> ClientResult<()> {
        if mode == WriteMode::Paced {
            if let Some(at) = self.reserve_slot() {
                tokio::time::sleep_until(at).await;
            }
        }

        let mut sink = self.sink.lock().await;
        if state.get() != ConnectionState::Connected {
            return Err(ClientError::NotConnected);
        }
        let Some(sink) = sink.as_mut() else {
            return Err(ClientError::NotConnected);
        };
        let result = sink.send(framed).await.map_err(send_error);
        if mode == WriteMode::Closing {
            state.transition(ConnectionState::Connected, ConnectionState::ShuttingDown);
        }
        result
    }
}

/// Socket faults end the connection; a line the codec refused does not.
fn send_error(e: ProtocolError) -> ClientError {
    match e {
        ProtocolError::Io(_) => ClientError::Write(e),
        other => ClientError::Protocol(other),
    }
}
