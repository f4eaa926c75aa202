//! Error types for `howl-ws`.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum WsError {
    // ---
    #[error("websocket connect to {url} failed: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    #[error("websocket protocol error: {0}")]
    Protocol(#[from] tungstenite::Error),

    #[error("connection already closed")]
    Closed,
}

// ---------------------------------------------------------------------------
// Bridge to howl_domain::HowlError
// ---------------------------------------------------------------------------

impl From<WsError> for howl_domain::HowlError {
    // ---
    fn from(e: WsError) -> Self {
        howl_domain::HowlError::Connection(e.to_string())
    }
}
