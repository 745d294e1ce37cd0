use std::fmt::{self, Display, Formatter};

use crate::command::Command;
use crate::prefix::Prefix;

/// One IRC line, owned.
///
/// Inbound lines carry whatever tags and prefix the server sent. Lines the
/// client builds carry neither, and `Display` renders them ready for the
/// writer, terminator included.
///
/// ```
/// use slirc_proto::Message;
///
/// let msg: Message = "@time=2024-05-01T12:00:00Z :nick!user@host PRIVMSG #rust :hi"
///     .parse()
///     .unwrap();
/// assert_eq!(msg.source_nickname(), Some("nick"));
/// assert_eq!(msg.tag("time"), Some("2024-05-01T12:00:00Z"));
///
/// assert_eq!(Message::privmsg("#rust", "hi").to_string(), "PRIVMSG #rust :hi\r\n");
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct Message {
    /// IRCv3 tags, unescaped. Empty when the line had none.
    pub tags: Vec<Tag>,
    /// Origin, absent on lines the client builds.
    pub prefix: Option<Prefix>,
    /// Command and parameters.
    pub command: Command,
}

/// An inbound IRCv3 tag.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Tag {
    /// Tag name, including any vendor or `+` prefix.
    pub key: String,
    /// `None` for a bare key.
    pub value: Option<String>,
}

impl Message {
    /// Nick of the sending user. `None` for server lines.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref()?.nick()
    }

    /// Value of tag `key`, if the server sent it with one.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.key == key)?
            .value
            .as_deref()
    }

    /// `PRIVMSG <target> :<text>`
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::from(Command::PRIVMSG(target.into(), text.into()))
    }

    /// `NOTICE <target> :<text>`
    pub fn notice(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::from(Command::NOTICE(target.into(), text.into()))
    }

    /// `JOIN <channel>`
    pub fn join(channel: impl Into<String>) -> Self {
        Self::from(Command::JOIN(channel.into(), None))
    }

    /// `JOIN <channel> <key>`
    pub fn join_with_key(channel: impl Into<String>, key: impl Into<String>) -> Self {
        Self::from(Command::JOIN(channel.into(), Some(key.into())))
    }

    /// `PART <channel> [:<reason>]`
    pub fn part(channel: impl Into<String>, reason: Option<String>) -> Self {
        Self::from(Command::PART(channel.into(), reason))
    }

    /// `NICK <nickname>`
    pub fn nick(nickname: impl Into<String>) -> Self {
        Self::from(Command::NICK(nickname.into()))
    }

    /// Registration USER line, user mode `0`.
    pub fn user(ident: impl Into<String>, realname: impl Into<String>) -> Self {
        Self::from(Command::USER(ident.into(), "0".into(), realname.into()))
    }

    /// `PASS <password>`
    pub fn pass(password: impl Into<String>) -> Self {
        Self::from(Command::PASS(password.into()))
    }

    /// Keepalive answer echoing the server's PING token.
    pub fn pong(token: impl Into<String>) -> Self {
        Self::from(Command::PONG(token.into(), None))
    }

    /// Bare `QUIT`.
    pub fn quit() -> Self {
        Self::from(Command::QUIT(None))
    }

    /// `QUIT :<reason>`
    pub fn quit_with_message(reason: impl Into<String>) -> Self {
        Self::from(Command::QUIT(Some(reason.into())))
    }
}

impl From<Command> for Message {
    fn from(command: Command) -> Self {
        Self {
            tags: Vec::new(),
            prefix: None,
            command,
        }
    }
}

/// Tags are never written: the client does not send client-only tags, so
/// only the prefix (for logging relayed lines) and the command are
/// rendered.
impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{prefix} ")?;
        }
        write!(f, "{}\r\n", self.command)
    }
}
