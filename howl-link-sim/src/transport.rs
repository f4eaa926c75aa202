use std::sync::atomic::{AtomicU32, Ordering};

// ---

use async_trait::async_trait;
use tokio::sync::mpsc;

// ---

use howl_domain::{GameTransport, HowlError, Result};

// ---

use super::config::LinkSimConfig;
use super::connection::LinkSimConnection;
use super::server::{LinkSimServer, ServerConn};

// ---------------------------------------------------------------------------
// LinkSimTransport
// ---------------------------------------------------------------------------

/// In-process mock transport. Does not use real sockets.
pub struct LinkSimTransport {
    // ---
    config: LinkSimConfig,

    /// Connect attempts so far, successful or not.
    attempts: AtomicU32,

    /// Hands the server half of each new link to [`LinkSimServer`].
    conn_tx: mpsc::UnboundedSender<ServerConn>,
}

// ---

impl LinkSimTransport {
    // ---
    /// Create a transport and the server handle that observes its links.
    pub fn new(config: LinkSimConfig) -> (Self, LinkSimServer) {
        // ---
        let (conn_tx, conn_rx) = mpsc::unbounded_channel();
        let transport = Self {
            config,
            attempts: AtomicU32::new(0),
            conn_tx,
        };
        (transport, LinkSimServer::new(conn_rx))
    }

    // ---

    /// Number of `connect` calls made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

// ---

#[async_trait]
impl GameTransport for LinkSimTransport {
    // ---
    type Connection = LinkSimConnection;

    async fn connect(&self) -> Result<LinkSimConnection> {
        // ---
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.config.refused_connects {
            return Err(HowlError::Connection(format!(
                "connection refused (simulated, attempt {})",
                attempt + 1
            )));
        }

        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();

        self.conn_tx
            .send(ServerConn::new(inbound_tx, reply_rx))
            .map_err(|_| HowlError::Connection("simulated server shut down".into()))?;

        Ok(LinkSimConnection::new(
            inbound_rx,
            reply_tx,
            self.config.send_budget,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
