use std::time::Duration;

use thiserror::Error;

/// Readiness of the duplex channel. Leaving `Disconnected` or `Errored`
/// always requires an explicit connect command; there is no automatic
/// reconnection at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Errored,
}

#[derive(Debug, Clone)]
pub struct ChannelSettings {
    /// WebSocket endpoint of the search backend.
    pub endpoint: String,
    pub connect_timeout: Duration,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            endpoint: "ws://localhost:8000/ws/search/".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Events pushed to the channel's subscriber as they occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    StateChanged(ConnectionState),
    /// A raw text frame arrived; decoding happens in the session layer.
    Frame(String),
    /// A connect or send attempt failed. The channel stays usable; the
    /// session layer decides whether and when to reconnect.
    TransportError(ChannelError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("not connected")]
    NotConnected,
    #[error("invalid endpoint {url}: {message}")]
    InvalidEndpoint { url: String, message: String },
    #[error("connect timed out")]
    ConnectTimeout,
    #[error("websocket error: {0}")]
    WebSocket(String),
}
