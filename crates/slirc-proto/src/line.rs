//! Line-based codec for tokio.
//!
//! Reads and writes newline-terminated lines, converting between bytes and
//! text with a configurable encoding.

use std::borrow::Cow;

use bytes::BytesMut;
use encoding::Encoding;
use tokio_util::codec::{Decoder, Encoder};

use crate::error;

/// Default maximum inbound line length: 512 bytes of message plus 8191 bytes
/// of IRCv3 tags.
pub const DEFAULT_MAX_LINE_LEN: usize = 512 + 8191;

/// Line-based codec that handles newline-terminated messages.
///
/// Decoded lines have their `\r\n` (or bare `\n`) terminator stripped.
/// Encoding writes the string as given; callers supply the terminator.
#[derive(Debug)]
pub struct LineCodec {
    encoding: &'static Encoding,
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
}

impl LineCodec {
    /// Create a new codec with the specified encoding.
    ///
    /// # Arguments
    /// * `label` - Encoding label (e.g., "utf-8", "iso-8859-1")
    pub fn new(label: &str) -> error::Result<Self> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| error::ProtocolError::UnknownEncoding(label.to_string()))?;
        Ok(Self {
            encoding,
            next_index: 0,
            max_len: DEFAULT_MAX_LINE_LEN,
        })
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(label: &str, max_len: usize) -> error::Result<Self> {
        let mut codec = Self::new(label)?;
        codec.max_len = max_len;
        Ok(codec)
    }

    /// Canonical name of the configured encoding.
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if line.len() > self.max_len {
                return Err(error::ProtocolError::MessageTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            let mut end = line.len() - 1;
            if end > 0 && line[end - 1] == b'\r' {
                end -= 1;
            }

            let (text, _had_errors) = self
                .encoding
                .decode_without_bom_handling(&line[..end]);
            // Relayed text is passed through as is: TAB, BEL and formatting
            // codes are ordinary content from other users.
            Ok(Some(text.into_owned()))
        } else {
            self.next_index = src.len();

            if src.len() > self.max_len {
                return Err(error::ProtocolError::MessageTooLong {
                    actual: src.len(),
                    limit: self.max_len,
                });
            }

            Ok(None)
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        let (bytes, _enc, had_errors) = self.encoding.encode(&msg);
        if had_errors {
            // encoding_rs substitutes numeric character references; refuse
            // rather than put them on the wire.
            let ch = msg
                .chars()
                .find(|ch| {
                    let mut buf = [0u8; 4];
                    self.encoding.encode(ch.encode_utf8(&mut buf)).2
                })
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            return Err(error::ProtocolError::Unencodable {
                ch,
                encoding: self.encoding.name(),
            });
        }
        match bytes {
            Cow::Borrowed(b) => dst.extend_from_slice(b),
            Cow::Owned(v) => dst.extend_from_slice(&v),
        }
        Ok(())
    }
}
