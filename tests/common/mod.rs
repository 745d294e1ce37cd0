//! Integration test common infrastructure.
//!
//! Provides a scripted fake IRC server on a loopback listener and helpers
//! for driving a client against it.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::{connect_client, wait_for_event};
#[allow(unused_imports)]
pub use server::{FakeServer, Peer};
