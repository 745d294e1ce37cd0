//! slirc-client - Straylight IRC client core
//!
//! Connection lifecycle, serialized outbound writer, one-shot registration
//! gate and channel registry for an RFC 1459 style client. Protocol parsing
//! lives in the `slirc-proto` crate.
//!
//! ```no_run
//! use slirc_client::{Client, ClientConfig, Event};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientConfig::new("irc.example.org", "tester"));
//! let mut events = client.subscribe();
//! client.start().await?;
//! slirc_client::send_fmt!(client, "JOIN {}", "#rust").await?;
//!
//! while let Ok(event) = events.recv().await {
//!     if let Event::Privmsg { source, text, .. } = event {
//!         println!("{source:?}: {text}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod network;
pub mod state;
pub mod telemetry;

pub use client::{Client, ConnectionGate, ConnectionState, GateOutcome};
pub use config::{ClientConfig, ResolvedConfig};
pub use error::{ClientError, ClientResult, RegistryError};
pub use events::{CommandGuard, Event, EventBus, Verdict};
pub use state::{Channel, ChannelRegistry, ServerInfo};

pub use slirc_proto;

/// Format a line and send it: `send_fmt!(client, "PRIVMSG {} :{}", target, text)`.
///
/// Expands to a future resolving to [`ClientResult<()>`]. The line is
/// formatted before the future is created, so nothing borrowed by the
/// arguments is held across the await.
#[macro_export]
macro_rules! send_fmt {
    ($client:expr, $($arg:tt)+) => {
        $client.send_line(::std::format!($($arg)+))
    };
}
