//! Client configuration loading and management.
//!
//! - [`types`]: the `ClientConfig` file format and the `ResolvedConfig`
//!   snapshot used for a single connection attempt
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup validation reporting every problem at once

mod defaults;
mod types;
pub mod validation;

pub use types::{ClientConfig, ConfigError, DEFAULT_PORT, ResolvedConfig};
pub use validation::{ValidationError, validate};
