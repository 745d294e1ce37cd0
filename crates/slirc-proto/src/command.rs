//! IRC command model.
//!
//! [`Command`] covers the commands the client sends or reacts to. Anything
//! else, including well-known commands with unexpected arity, is kept as
//! [`Command::Raw`] so no inbound line is ever dropped by the parser.

use std::fmt::{self, Display, Formatter};

use crate::error::MessageParseError;
use crate::response::Response;

/// An IRC command with its parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Command {
    /// `PASS <password>`
    PASS(String),
    /// `NICK <nickname>`
    NICK(String),
    /// `USER <username> <mode> * :<realname>`
    USER(String, String, String),
    /// `QUIT [:<reason>]`
    QUIT(Option<String>),
    /// `PING <server> [<token>]`
    PING(String, Option<String>),
    /// `PONG <server> [<token>]`
    PONG(String, Option<String>),
    /// `JOIN <channel> [<key>]`
    JOIN(String, Option<String>),
    /// `PART <channel> [:<reason>]`
    PART(String, Option<String>),
    /// `KICK <channel> <nick> [:<reason>]`
    KICK(String, String, Option<String>),
    /// `TOPIC <channel> [:<topic>]`
    TOPIC(String, Option<String>),
    /// `MODE <target> [<modes> [<args>...]]`
    MODE(String, Vec<String>),
    /// `PRIVMSG <target> :<text>`
    PRIVMSG(String, String),
    /// `NOTICE <target> :<text>`
    NOTICE(String, String),
    /// `ERROR :<message>`
    ERROR(String),
    /// A numeric reply with its parameters.
    Response(Response, Vec<String>),
    /// Any other command, with its raw parameters.
    Raw(String, Vec<String>),
}

impl Command {
    /// Build a command from its name and parameters.
    pub fn new(cmd: &str, args: Vec<&str>) -> Result<Command, MessageParseError> {
        if cmd.is_empty() {
            return Err(MessageParseError::InvalidCommand { position: 0 });
        }

        if let Ok(resp) = cmd.parse::<Response>() {
            return Ok(Command::Response(resp, owned(&args)));
        }

        let upper = cmd.to_ascii_uppercase();
        let command = match (upper.as_str(), args.as_slice()) {
            ("PASS", [p]) => Command::PASS(p.to_string()),
            ("NICK", [n]) => Command::NICK(n.to_string()),
            ("USER", [u, m, _, r]) => Command::USER(u.to_string(), m.to_string(), r.to_string()),
            ("QUIT", []) => Command::QUIT(None),
            ("QUIT", [r]) => Command::QUIT(Some(r.to_string())),
            ("PING", [s]) => Command::PING(s.to_string(), None),
            ("PING", [s, t]) => Command::PING(s.to_string(), Some(t.to_string())),
            ("PONG", [s]) => Command::PONG(s.to_string(), None),
            ("PONG", [s, t]) => Command::PONG(s.to_string(), Some(t.to_string())),
            ("JOIN", [c]) => Command::JOIN(c.to_string(), None),
            ("JOIN", [c, k]) => Command::JOIN(c.to_string(), Some(k.to_string())),
            ("PART", [c]) => Command::PART(c.to_string(), None),
            ("PART", [c, r]) => Command::PART(c.to_string(), Some(r.to_string())),
            ("KICK", [c, n]) => Command::KICK(c.to_string(), n.to_string(), None),
            ("KICK", [c, n, r]) => {
                Command::KICK(c.to_string(), n.to_string(), Some(r.to_string()))
            }
            ("TOPIC", [c]) => Command::TOPIC(c.to_string(), None),
            ("TOPIC", [c, t]) => Command::TOPIC(c.to_string(), Some(t.to_string())),
            ("MODE", [t, rest @ ..]) => Command::MODE(t.to_string(), owned(rest)),
            ("PRIVMSG", [t, m]) => Command::PRIVMSG(t.to_string(), m.to_string()),
            ("NOTICE", [t, m]) => Command::NOTICE(t.to_string(), m.to_string()),
            ("ERROR", [m]) => Command::ERROR(m.to_string()),
            _ => Command::Raw(upper, owned(&args)),
        };
        Ok(command)
    }

    /// The command name as it appears on the wire.
    pub fn name(&self) -> String {
        match self {
            Command::PASS(_) => "PASS".into(),
            Command::NICK(_) => "NICK".into(),
            Command::USER(..) => "USER".into(),
            Command::QUIT(_) => "QUIT".into(),
            Command::PING(..) => "PING".into(),
            Command::PONG(..) => "PONG".into(),
            Command::JOIN(..) => "JOIN".into(),
            Command::PART(..) => "PART".into(),
            Command::KICK(..) => "KICK".into(),
            Command::TOPIC(..) => "TOPIC".into(),
            Command::MODE(..) => "MODE".into(),
            Command::PRIVMSG(..) => "PRIVMSG".into(),
            Command::NOTICE(..) => "NOTICE".into(),
            Command::ERROR(_) => "ERROR".into(),
            Command::Response(resp, _) => resp.to_string(),
            Command::Raw(cmd, _) => cmd.clone(),
        }
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Whether a parameter has to be sent in trailing (`:`) form.
fn needs_colon(param: &str) -> bool {
    param.is_empty() || param.contains(' ') || param.starts_with(':')
}

/// Write `cmd` followed by `params`, using trailing form for the last one
/// only when its content requires it.
fn write_params<S: AsRef<str>>(f: &mut Formatter<'_>, cmd: &str, params: &[S]) -> fmt::Result {
    f.write_str(cmd)?;
    if let Some((last, middle)) = params.split_last() {
        for p in middle {
            write!(f, " {}", p.as_ref())?;
        }
        let last = last.as_ref();
        if needs_colon(last) {
            write!(f, " :{}", last)?;
        } else {
            write!(f, " {}", last)?;
        }
    }
    Ok(())
}

/// Write `cmd`, its `middle` parameters, and an always-trailing text parameter.
fn write_trailing(f: &mut Formatter<'_>, cmd: &str, middle: &[&str], text: &str) -> fmt::Result {
    f.write_str(cmd)?;
    for p in middle {
        write!(f, " {}", p)?;
    }
    write!(f, " :{}", text)
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Command::PASS(p) => write_params(f, "PASS", &[p]),
            Command::NICK(n) => write_params(f, "NICK", &[n]),
            Command::USER(u, m, r) => write_trailing(f, "USER", &[u.as_str(), m.as_str(), "*"], r),
            Command::QUIT(None) => f.write_str("QUIT"),
            Command::QUIT(Some(r)) => write_trailing(f, "QUIT", &[], r),
            Command::PING(s, None) => write_params(f, "PING", &[s]),
            Command::PING(s, Some(t)) => write_params(f, "PING", &[s, t]),
            Command::PONG(s, None) => write_params(f, "PONG", &[s]),
            Command::PONG(s, Some(t)) => write_params(f, "PONG", &[s, t]),
            Command::JOIN(c, None) => write_params(f, "JOIN", &[c]),
            Command::JOIN(c, Some(k)) => write_params(f, "JOIN", &[c, k]),
            Command::PART(c, None) => write_params(f, "PART", &[c]),
            Command::PART(c, Some(r)) => write_trailing(f, "PART", &[c.as_str()], r),
            Command::KICK(c, n, None) => write_params(f, "KICK", &[c, n]),
            Command::KICK(c, n, Some(r)) => write_trailing(f, "KICK", &[c.as_str(), n.as_str()], r),
            Command::TOPIC(c, None) => write_params(f, "TOPIC", &[c]),
            Command::TOPIC(c, Some(t)) => write_trailing(f, "TOPIC", &[c.as_str()], t),
            Command::MODE(t, args) => {
                let mut params = Vec::with_capacity(args.len() + 1);
                params.push(t.as_str());
                params.extend(args.iter().map(String::as_str));
                write_params(f, "MODE", &params)
            }
            Command::PRIVMSG(t, m) => write_trailing(f, "PRIVMSG", &[t.as_str()], m),
            Command::NOTICE(t, m) => write_trailing(f, "NOTICE", &[t.as_str()], m),
            Command::ERROR(m) => write_trailing(f, "ERROR", &[], m),
            Command::Response(resp, args) => write_params(f, &resp.to_string(), args),
            Command::Raw(cmd, args) => write_params(f, cmd, args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_serialization() {
        assert_eq!(Command::QUIT(None).to_string(), "QUIT");
        assert_eq!(Command::QUIT(Some("bye".into())).to_string(), "QUIT :bye");
    }

    #[test]
    fn test_user_serialization() {
        let cmd = Command::USER("tester".into(), "0".into(), "Test User".into());
        assert_eq!(cmd.to_string(), "USER tester 0 * :Test User");
    }

    #[test]
    fn test_privmsg_always_trailing() {
        let cmd = Command::PRIVMSG("#rust".into(), "hi".into());
        assert_eq!(cmd.to_string(), "PRIVMSG #rust :hi");
    }

    #[test]
    fn test_raw_colon_only_when_needed() {
        let cmd = Command::Raw("WHO".into(), vec!["#rust".into()]);
        assert_eq!(cmd.to_string(), "WHO #rust");
        let cmd = Command::Raw("AWAY".into(), vec!["gone fishing".into()]);
        assert_eq!(cmd.to_string(), "AWAY :gone fishing");
    }

    #[test]
    fn test_arity_mismatch_falls_back_to_raw() {
        let cmd = Command::new("KICK", vec!["#a"]).unwrap();
        assert_eq!(cmd, Command::Raw("KICK".into(), vec!["#a".into()]));
    }

    #[test]
    fn test_numeric_becomes_response() {
        let cmd = Command::new("433", vec!["*", "tester", "Nickname is already in use"]).unwrap();
        match cmd {
            Command::Response(resp, args) => {
                assert_eq!(resp, Response::ERR_NICKNAMEINUSE);
                assert_eq!(args.len(), 3);
            }
            other => panic!("expected Response, got {other:?}"),
        }
    }
}
