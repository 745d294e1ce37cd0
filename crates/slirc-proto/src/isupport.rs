//! ISUPPORT (RPL_ISUPPORT / 005) token parsing.
//!
//! Servers advertise limits and features as `KEY` or `KEY=VALUE` tokens.
//!
//! # Reference
//! - Modern IRC documentation: <https://modern.ircdocs.horse/isupport.html>

use crate::command::Command;
use crate::message::Message;
use crate::response::Response;

/// A single ISUPPORT token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IsupportEntry<'a> {
    /// The token key (e.g., `NETWORK`, `CHANNELLEN`).
    pub key: &'a str,
    /// The optional value (e.g., `Libera.Chat` for `NETWORK=Libera.Chat`).
    pub value: Option<&'a str>,
}

/// Tokens from one `RPL_ISUPPORT` reply.
///
/// ```
/// use slirc_proto::isupport::parse_params;
///
/// let isupport = parse_params(&["NETWORK=TestNet", "CHANNELLEN=32", "EXCEPTS"]);
/// assert_eq!(isupport.network(), Some("TestNet"));
/// assert_eq!(isupport.channellen(), Some(32));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Isupport<'a> {
    entries: Vec<IsupportEntry<'a>>,
}

impl<'a> Isupport<'a> {
    /// Parse from `RPL_ISUPPORT` arguments: skips the target nick and the
    /// trailing "are supported by this server" text.
    pub fn from_response_args(args: &[&'a str]) -> Option<Self> {
        let (_target, mut tokens) = args.split_first()?;
        if let Some(last) = tokens.last() {
            if last.contains(' ') {
                tokens = &tokens[..tokens.len() - 1];
            }
        }
        Some(parse_params(tokens))
    }

    /// Parse from an owned message; `None` unless it is a 005 reply.
    pub fn from_message(msg: &'a Message) -> Option<Self> {
        match &msg.command {
            Command::Response(Response::RPL_ISUPPORT, args) => {
                let borrowed: Vec<&'a str> = args.iter().map(String::as_str).collect();
                Self::from_response_args(&borrowed)
            }
            _ => None,
        }
    }

    /// Iterate over all parsed entries.
    pub fn iter(&self) -> impl Iterator<Item = &IsupportEntry<'a>> {
        self.entries.iter()
    }

    /// `Some(Some(value))` for `KEY=value`, `Some(None)` for a bare `KEY`,
    /// `None` when absent. The last occurrence wins.
    pub fn get(&self, key: &str) -> Option<Option<&'a str>> {
        self.entries
            .iter()
            .rfind(|e| e.key.eq_ignore_ascii_case(key))
            .map(|e| e.value)
    }

    fn get_number(&self, key: &str) -> Option<usize> {
        self.get(key).flatten().and_then(|v| v.parse().ok())
    }

    /// `CASEMAPPING` (e.g., `rfc1459`, `ascii`).
    pub fn casemapping(&self) -> Option<&'a str> {
        self.get("CASEMAPPING").flatten()
    }

    /// `CHANTYPES` (e.g., `#&`).
    pub fn chantypes(&self) -> Option<&'a str> {
        self.get("CHANTYPES").flatten()
    }

    /// `NETWORK` name.
    pub fn network(&self) -> Option<&'a str> {
        self.get("NETWORK").flatten()
    }

    /// Maximum channel name length.
    pub fn channellen(&self) -> Option<usize> {
        self.get_number("CHANNELLEN")
    }

    /// Maximum nickname length.
    pub fn nicklen(&self) -> Option<usize> {
        self.get_number("NICKLEN")
    }
}

/// Parse `KEY` / `KEY=VALUE` tokens, stopping at a trailing `:` text.
pub fn parse_params<'a>(params: &[&'a str]) -> Isupport<'a> {
    let entries = params
        .iter()
        .copied()
        .take_while(|p| !p.starts_with(':'))
        .filter(|p| !p.is_empty())
        .map(|p| match p.split_once('=') {
            Some((key, value)) => IsupportEntry {
                key,
                value: Some(value),
            },
            None => IsupportEntry {
                key: p,
                value: None,
            },
        })
        .collect();
    Isupport { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_message() {
        let msg: Message = ":irc.example.org 005 tester NETWORK=Example CHANNELLEN=50 NICKLEN=30 CASEMAPPING=ascii :are supported by this server"
            .parse()
            .unwrap();
        let isupport = Isupport::from_message(&msg).unwrap();
        assert_eq!(isupport.network(), Some("Example"));
        assert_eq!(isupport.channellen(), Some(50));
        assert_eq!(isupport.nicklen(), Some(30));
        assert_eq!(isupport.casemapping(), Some("ascii"));
    }

    #[test]
    fn test_not_isupport() {
        let msg: Message = ":irc.example.org 001 tester :Welcome".parse().unwrap();
        assert!(Isupport::from_message(&msg).is_none());
    }

    #[test]
    fn test_bare_and_malformed_values() {
        let isupport = parse_params(&["EXCEPTS", "CHANNELLEN=", "NICKLEN=abc"]);
        assert_eq!(isupport.get("EXCEPTS"), Some(None));
        assert_eq!(isupport.channellen(), None);
        assert_eq!(isupport.nicklen(), None);
    }
}
