//! Scout channel: lifecycle owner for the duplex search channel.
mod channel;
mod transport;
mod types;

pub use channel::ChannelHandle;
pub use transport::{Link, Transport, WsTransport};
pub use types::{ChannelError, ChannelEvent, ChannelSettings, ConnectionState};
