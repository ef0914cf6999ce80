use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::types::ChannelError;

/// Opens duplex links. The seam exists so channel tests can run against a
/// scripted endpoint and the session layer never touches sockets directly.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn connect(&self, endpoint: &str) -> Result<Box<dyn Link>, ChannelError>;
}

/// One established duplex link: ordered text frames in both directions.
#[async_trait::async_trait]
pub trait Link: Send {
    async fn send(&mut self, frame: String) -> Result<(), ChannelError>;
    /// Next inbound text frame; `Ok(None)` on orderly close.
    async fn recv(&mut self) -> Result<Option<String>, ChannelError>;
    async fn close(&mut self);
}

/// Production transport over `tokio-tungstenite`.
#[derive(Debug, Clone, Default)]
pub struct WsTransport;

#[async_trait::async_trait]
impl Transport for WsTransport {
    async fn connect(&self, endpoint: &str) -> Result<Box<dyn Link>, ChannelError> {
        let url = Url::parse(endpoint).map_err(|err| ChannelError::InvalidEndpoint {
            url: endpoint.to_string(),
            message: err.to_string(),
        })?;
        let (stream, _response) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(map_ws_error)?;
        Ok(Box::new(WsLink { stream }))
    }
}

struct WsLink {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait::async_trait]
impl Link for WsLink {
    async fn send(&mut self, frame: String) -> Result<(), ChannelError> {
        self.stream
            .send(Message::Text(frame.into()))
            .await
            .map_err(map_ws_error)
    }

    async fn recv(&mut self) -> Result<Option<String>, ChannelError> {
        loop {
            match self.stream.next().await {
                None => return Ok(None),
                Some(Ok(Message::Text(text))) => return Ok(Some(text.to_string())),
                Some(Ok(Message::Close(_))) => return Ok(None),
                // Ping/pong and binary frames are not part of the protocol.
                Some(Ok(_)) => continue,
                Some(Err(err)) => return Err(map_ws_error(err)),
            }
        }
    }

    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}

fn map_ws_error(err: tokio_tungstenite::tungstenite::Error) -> ChannelError {
    ChannelError::WebSocket(err.to_string())
}
