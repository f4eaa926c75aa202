//! [`WsTransport`]: factory for [`WsConnection`]s.

use async_trait::async_trait;

use howl_domain::{GameTransport, HowlError, Result};

use crate::connection::WsConnection;
use crate::error::WsError;

// ---------------------------------------------------------------------------
// WsTransport
// ---------------------------------------------------------------------------

pub struct WsTransport {
    // ---
    url: String,
}

// ---

impl WsTransport {
    // ---
    /// `url` is the game server endpoint, e.g. `ws://127.0.0.1:8080/ws`.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    // ---

    pub fn url(&self) -> &str {
        &self.url
    }
}

// ---

#[async_trait]
impl GameTransport for WsTransport {
    // ---
    type Connection = WsConnection;

    async fn connect(&self) -> Result<WsConnection> {
        // ---
        let (stream, response) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|source| WsError::Connect {
                url: self.url.clone(),
                source,
            })
            .map_err(HowlError::from)?;

        tracing::debug!(
            url = %self.url,
            status = %response.status(),
            "websocket handshake complete"
        );
        Ok(WsConnection::new(stream))
    }
}
