//! Connection state machine.

use std::sync::atomic::{AtomicU8, Ordering};

/// Where the connection is in its lifecycle.
///
/// `Disconnected -> Connecting` on start, `Connecting -> Connected` once
/// the socket is up (registration is tracked by the gate), `Connected ->
/// ShuttingDown` on stop, and back to `Disconnected` when the reader loop
/// exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
    ShuttingDown = 3,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connecting,
            2 => Self::Connected,
            3 => Self::ShuttingDown,
            _ => Self::Disconnected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::ShuttingDown => "shutting_down",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, lock-free holder for the current [`ConnectionState`].
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(ConnectionState::Disconnected as u8))
    }

    pub(crate) fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: ConnectionState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Move `from -> to` atomically. False if the state was not `from`.
    pub(crate) fn transition(&self, from: ConnectionState, to: ConnectionState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), ConnectionState::Disconnected);

        assert!(cell.transition(ConnectionState::Disconnected, ConnectionState::Connecting));
        assert!(!cell.transition(ConnectionState::Disconnected, ConnectionState::Connecting));
        assert!(cell.transition(ConnectionState::Connecting, ConnectionState::Connected));
        assert!(cell.transition(ConnectionState::Connected, ConnectionState::ShuttingDown));
        assert_eq!(cell.get(), ConnectionState::ShuttingDown);

        cell.set(ConnectionState::Disconnected);
        assert_eq!(cell.get().to_string(), "disconnected");
    }
}
