//! [`WsConnection`]: a live WebSocket link implementing [`GameConnection`].
//!
//! Thin wrapper around a [`WebSocketStream`]. Reconnection lives above this
//! layer in the agent's session loop.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use howl_domain::{GameConnection, Inbound, Result};

use crate::error::WsError;

// ---------------------------------------------------------------------------
// WsConnection
// ---------------------------------------------------------------------------

pub struct WsConnection {
    // ---
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    closed: bool,
}

// ---

impl WsConnection {
    // ---
    pub fn new(stream: WebSocketStream<MaybeTlsStream<TcpStream>>) -> Self {
        Self {
            stream,
            closed: false,
        }
    }
}

// ---

#[async_trait]
impl GameConnection for WsConnection {
    // ---
    async fn receive(&mut self) -> Result<Option<Inbound>> {
        // ---
        if self.closed {
            return Err(WsError::Closed.into());
        }

        while let Some(frame) = self.stream.next().await {
            match frame.map_err(WsError::from)? {
                Message::Text(text) => return Ok(Some(split_batch(text))),
                Message::Binary(bytes) => {
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    return Ok(Some(split_batch(text)));
                }
                Message::Close(frame) => {
                    tracing::debug!(?frame, "server closed websocket");
                    self.closed = true;
                    return Ok(None);
                }
                // tungstenite queues the pong itself.
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }

        self.closed = true;
        Ok(None)
    }

    // ---

    async fn send(&mut self, text: &str) -> Result<()> {
        // ---
        if self.closed {
            return Err(WsError::Closed.into());
        }
        self.stream
            .send(Message::Text(text.to_string()))
            .await
            .map_err(WsError::from)?;
        Ok(())
    }

    // ---

    async fn close(&mut self) -> Result<()> {
        // ---
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        match self.stream.close(None).await {
            Ok(()) => Ok(()),
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(e) => Err(WsError::from(e).into()),
        }
    }
}

// ---------------------------------------------------------------------------
// split_batch
// ---------------------------------------------------------------------------

/// Turn one text frame into an [`Inbound`].
///
/// A frame holding a JSON array is a batch of packets and is split into one
/// raw message per element. Anything else, including text that merely looks
/// like an array, is passed through untouched for the agent to parse.
pub fn split_batch(text: String) -> Inbound {
    // ---
    if !text.trim_start().starts_with('[') {
        return Inbound::One(text);
    }

    match serde_json::from_str::<Vec<serde_json::Value>>(&text) {
        Ok(values) => Inbound::Many(values.iter().map(|v| v.to_string()).collect()),
        Err(_) => Inbound::One(text),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
