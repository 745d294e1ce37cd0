//! Configuration validation.
//!
//! Catches common mistakes before a connection attempt.

use super::ClientConfig;
use slirc_proto::{ChannelExt, LineCodec};
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("host is required")]
    MissingHost,
    #[error("nick is required")]
    MissingNick,
    #[error("nick must not contain spaces: '{0}'")]
    InvalidNick(String),
    #[error("unknown encoding: '{0}'")]
    UnknownEncoding(String),
    #[error("channels entry is not a channel name: '{0}'")]
    InvalidChannel(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.host.is_empty() {
        errors.push(ValidationError::MissingHost);
    }
    if config.nick.is_empty() {
        errors.push(ValidationError::MissingNick);
    } else if config.nick.contains(' ') {
        errors.push(ValidationError::InvalidNick(config.nick.clone()));
    }

    if LineCodec::new(&config.encoding).is_err() {
        errors.push(ValidationError::UnknownEncoding(config.encoding.clone()));
    }

    for channel in &config.channels {
        if !channel.is_channel_name() {
            errors.push(ValidationError::InvalidChannel(channel.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
