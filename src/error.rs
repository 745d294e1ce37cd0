//! Unified error handling for slirc-client.
//!
//! Client operations return [`ClientError`]; channel registry lookups
//! return [`RegistryError`]. Both expose a static `error_code()` for log
//! labeling.

use slirc_proto::ProtocolError;
use thiserror::Error;

// ============================================================================
// Client Errors (connection lifecycle and sending)
// ============================================================================

/// Errors surfaced by [`crate::Client`] operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Host or nick missing from the configuration.
    #[error("client not initialized: host and nick are required")]
    NotInitialized,

    /// This client has already completed (or abandoned) a registration.
    /// A fresh client is needed to connect again.
    #[error("client already used; create a new client to reconnect")]
    AlreadyUsed,

    #[error("client is already connecting or connected")]
    AlreadyConnected,

    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS handshake failed: {0}")]
    Tls(String),

    #[error("not connected")]
    NotConnected,

    #[error("write failed: {0}")]
    Write(#[source] ProtocolError),

    /// A command guard refused the outbound line.
    #[error("command vetoed: {0}")]
    Vetoed(String),

    /// The connection ended before the server confirmed registration.
    #[error("registration aborted: {0}")]
    RegistrationAborted(String),

    #[error("registration timed out after {0:?}")]
    RegistrationTimeout(std::time::Duration),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl ClientError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotInitialized => "not_initialized",
            Self::AlreadyUsed => "already_used",
            Self::AlreadyConnected => "already_connected",
            Self::Connect { .. } => "connect_error",
            Self::Tls(_) => "tls_error",
            Self::NotConnected => "not_connected",
            Self::Write(_) => "write_error",
            Self::Vetoed(_) => "vetoed",
            Self::RegistrationAborted(_) => "registration_aborted",
            Self::RegistrationTimeout(_) => "registration_timeout",
            Self::Protocol(_) => "protocol_error",
        }
    }
}

// ============================================================================
// Registry Errors
// ============================================================================

/// Errors from [`crate::state::ChannelRegistry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The name exceeds the server's advertised CHANNELLEN.
    #[error("channel name too long: {name} ({len} > {limit} bytes)")]
    ChannelNameTooLong {
        name: String,
        len: usize,
        limit: usize,
    },
}

impl RegistryError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ChannelNameTooLong { .. } => "channel_name_too_long",
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
