//! Client-side state: joined channels and what the server told us about
//! itself.

mod channel;
mod registry;
mod server_info;

pub use channel::Channel;
pub use registry::ChannelRegistry;
pub use server_info::ServerInfo;
