//! Owned IRC messages: parsing, construction and serialization.

mod nom_parser;
mod parse;
mod types;

pub use self::types::{Message, Tag};
