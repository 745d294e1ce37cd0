//! Typed events published by the client, and the command guard hook.
//!
//! - [`Event`]: everything subscribers can observe
//! - [`EventBus`]: broadcast fan-out plus the ordered guard list
//! - [`CommandGuard`]: pre-write check that can veto an outbound command

mod bus;

pub use bus::EventBus;

use slirc_proto::Response;

/// Something the client observed or did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// TCP (and TLS, if configured) connection established.
    Connected { host: String, port: u16 },
    /// Server confirmed registration with `RPL_WELCOME`.
    Registered {
        nick: String,
        server: Option<String>,
    },
    /// An outbound line was written and flushed. No terminator.
    CommandExecuted { line: String },
    Notice {
        source: Option<String>,
        target: String,
        text: String,
    },
    Privmsg {
        source: Option<String>,
        target: String,
        text: String,
    },
    /// Any numeric reply, including the ones the client acts on itself.
    Numeric {
        response: Response,
        args: Vec<String>,
    },
    Join { channel: String, nick: String },
    Part {
        channel: String,
        nick: String,
        reason: Option<String>,
    },
    Kick {
        channel: String,
        nick: String,
        by: Option<String>,
        reason: Option<String>,
    },
    Quit {
        nick: String,
        reason: Option<String>,
    },
    /// A nick change, ours or another user's.
    NickChanged { old: String, new: String },
    /// The server refused our pending nick change.
    NickRejected {
        attempted: String,
        response: Response,
    },
    Mode {
        source: Option<String>,
        target: String,
        modes: Vec<String>,
    },
    Topic {
        channel: String,
        topic: Option<String>,
    },
    /// The connection is gone. Published once per connection, whatever the
    /// cause.
    Disconnected { reason: String },
}

impl Event {
    /// Static name for log labeling.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::Registered { .. } => "registered",
            Self::CommandExecuted { .. } => "command_executed",
            Self::Notice { .. } => "notice",
            Self::Privmsg { .. } => "privmsg",
            Self::Numeric { .. } => "numeric",
            Self::Join { .. } => "join",
            Self::Part { .. } => "part",
            Self::Kick { .. } => "kick",
            Self::Quit { .. } => "quit",
            Self::NickChanged { .. } => "nick_changed",
            Self::NickRejected { .. } => "nick_rejected",
            Self::Mode { .. } => "mode",
            Self::Topic { .. } => "topic",
            Self::Disconnected { .. } => "disconnected",
        }
    }
}

/// Outcome of a [`CommandGuard`] check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(String),
}

/// Pre-execution hook for outbound commands.
///
/// Guards run in registration order before each write, with the line as
/// it will be sent (without terminator). The first `Deny` stops the write.
pub trait CommandGuard: Send + Sync {
    fn check(&self, line: &str) -> Verdict;
}

impl<F> CommandGuard for F
where
    F: Fn(&str) -> Verdict + Send + Sync,
{
    fn check(&self, line: &str) -> Verdict {
        self(line)
    }
}
