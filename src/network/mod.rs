//! Connection socket adapter: TCP with optional TLS, boxed so the rest of
//! the client never cares which one it got.

mod tls;
mod transport;

pub use transport::{AsyncReadWrite, BoxedStream, connect};
