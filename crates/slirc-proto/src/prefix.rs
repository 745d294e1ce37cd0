//! Message origins.
//!
//! Servers relay lines from other users under a `nick!user@host` mask and
//! send their own lines under a bare server name.

use std::fmt;

/// Where an inbound message came from.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// A server, e.g. `irc.example.org`.
    Server(String),
    /// A user mask. Servers may omit the user and host parts.
    User {
        /// Nickname as the server knows it.
        nick: String,
        /// Ident, when present.
        user: Option<String>,
        /// Host or cloak, when present.
        host: Option<String>,
    },
}

impl Prefix {
    /// Split a raw prefix (without the leading `:`).
    ///
    /// A bare name containing a dot is taken to be a server.
    pub fn parse(raw: &str) -> Self {
        let (mask, host) = match raw.split_once('@') {
            Some((mask, host)) => (mask, non_empty(host)),
            None => (raw, None),
        };
        let (nick, user) = match mask.split_once('!') {
            Some((nick, user)) => (nick, non_empty(user)),
            None => (mask, None),
        };

        if user.is_none() && host.is_none() && nick.contains('.') {
            return Prefix::Server(nick.to_string());
        }
        Prefix::User {
            nick: nick.to_string(),
            user,
            host,
        }
    }

    /// The sender's nick. `None` for servers and empty masks.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::User { nick, .. } if !nick.is_empty() => Some(nick),
            _ => None,
        }
    }

    /// Server name or nick, whichever this prefix carries.
    pub fn name(&self) -> &str {
        match self {
            Prefix::Server(name) => name,
            Prefix::User { nick, .. } => nick,
        }
    }
}

fn non_empty(part: &str) -> Option<String> {
    (!part.is_empty()).then(|| part.to_string())
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::Server(name) => f.write_str(name),
            Prefix::User { nick, user, host } => {
                f.write_str(nick)?;
                if let Some(user) = user {
                    write!(f, "!{user}")?;
                }
                if let Some(host) = host {
                    write!(f, "@{host}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mask() {
        let prefix = Prefix::parse("alice!ali@cloak.example.net");
        assert_eq!(prefix.nick(), Some("alice"));
        assert_eq!(
            prefix,
            Prefix::User {
                nick: "alice".into(),
                user: Some("ali".into()),
                host: Some("cloak.example.net".into()),
            }
        );
        assert_eq!(prefix.to_string(), "alice!ali@cloak.example.net");
    }

    #[test]
    fn test_server_name() {
        let prefix = Prefix::parse("irc.example.org");
        assert_eq!(prefix, Prefix::Server("irc.example.org".into()));
        assert_eq!(prefix.nick(), None);
        assert_eq!(prefix.name(), "irc.example.org");
    }

    #[test]
    fn test_partial_masks() {
        assert_eq!(Prefix::parse("bob").nick(), Some("bob"));
        assert_eq!(Prefix::parse("bob@host").to_string(), "bob@host");
        // A dotted nick with a host part is still a user.
        assert_eq!(Prefix::parse("b.ob@host").nick(), Some("b.ob"));
        assert_eq!(Prefix::parse("!u@h").nick(), None);
    }
}
