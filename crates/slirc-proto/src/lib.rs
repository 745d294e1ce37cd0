//! # slirc-proto
//!
//! IRC protocol types for the slirc client: line framing with configurable
//! text encodings, owned message parsing and serialization, numeric replies
//! and ISUPPORT tokens.
//!
//! ```rust
//! use slirc_proto::{Command, Message};
//!
//! let msg: Message = ":nick!user@host PRIVMSG #rust :Hello!".parse().unwrap();
//! assert!(matches!(msg.command, Command::PRIVMSG(_, _)));
//! assert_eq!(msg.source_nickname(), Some("nick"));
//!
//! let quit = Message::quit_with_message("bye");
//! assert_eq!(quit.to_string(), "QUIT :bye\r\n");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod chan;
pub mod command;
pub mod error;
pub mod isupport;
pub mod line;
pub mod message;
pub mod prefix;
pub mod response;

pub use self::chan::ChannelExt;
pub use self::command::Command;
pub use self::error::{MessageParseError, ProtocolError};
pub use self::isupport::{Isupport, IsupportEntry};
pub use self::line::{LineCodec, DEFAULT_MAX_LINE_LEN};
pub use self::message::{Message, Tag};
pub use self::prefix::Prefix;
pub use self::response::Response;
