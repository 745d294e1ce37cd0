//! `FromStr` for [`Message`] on top of the nom line parser.

use std::str::FromStr;

use crate::command::Command;
use crate::error::{MessageParseError, ProtocolError};
use crate::prefix::Prefix;

use super::nom_parser::ParsedMessage;
use super::types::{Message, Tag};

/// Split `key[=value];...` and undo the IRCv3 value escapes.
fn read_tags(raw: &str) -> Vec<Tag> {
    raw.split(';')
        .filter(|tag| !tag.is_empty())
        .map(|tag| {
            let (key, value) = match tag.split_once('=') {
                Some((key, value)) => (key, Some(unescape(value))),
                None => (tag, None),
            };
            Tag {
                key: key.to_string(),
                value,
            }
        })
        .collect()
}

/// `\:` `\s` `\\` `\r` `\n`; any other escaped char stands for itself and a
/// dangling backslash is dropped.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(':') => out.push(';'),
            Some('s') => out.push(' '),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        let invalid = |cause| ProtocolError::InvalidMessage {
            string: s.to_owned(),
            cause,
        };

        let line = s.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(invalid(MessageParseError::EmptyMessage));
        }

        let parsed = ParsedMessage::parse(line)
            .map_err(|position| invalid(MessageParseError::InvalidCommand { position }))?;
        let command =
            Command::new(parsed.command, parsed.params.to_vec()).map_err(invalid)?;

        Ok(Message {
            tags: parsed.tags.map(read_tags).unwrap_or_default(),
            prefix: parsed.prefix.map(Prefix::parse),
            command,
        })
    }
}
