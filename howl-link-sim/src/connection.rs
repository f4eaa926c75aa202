use async_trait::async_trait;
use tokio::sync::mpsc;

// ---

use howl_domain::{GameConnection, HowlError, Inbound, Result};

// ---------------------------------------------------------------------------
// LinkSimConnection
// ---------------------------------------------------------------------------

/// Agent side of an in-process link. Created by
/// [`super::LinkSimTransport`]'s `connect`.
pub struct LinkSimConnection {
    // ---
    /// Packets pushed by the simulated server.
    inbound_rx: mpsc::UnboundedReceiver<Inbound>,

    /// Replies delivered to the simulated server.
    reply_tx: mpsc::UnboundedSender<String>,

    send_budget: Option<usize>,
    sent: usize,
    closed: bool,
}

// ---

impl LinkSimConnection {
    // ---
    pub(crate) fn new(
        inbound_rx: mpsc::UnboundedReceiver<Inbound>,
        reply_tx: mpsc::UnboundedSender<String>,
        send_budget: Option<usize>,
    ) -> Self {
        Self {
            inbound_rx,
            reply_tx,
            send_budget,
            sent: 0,
            closed: false,
        }
    }
}

// ---

#[async_trait]
impl GameConnection for LinkSimConnection {
    // ---
    async fn receive(&mut self) -> Result<Option<Inbound>> {
        // ---
        if self.closed {
            return Err(HowlError::Connection("receive on closed link".into()));
        }
        Ok(self.inbound_rx.recv().await)
    }

    // ---

    async fn send(&mut self, text: &str) -> Result<()> {
        // ---
        if self.closed {
            return Err(HowlError::Connection("send on closed link".into()));
        }
        if self.send_budget.is_some_and(|budget| self.sent >= budget) {
            return Err(HowlError::Connection("simulated link drop".into()));
        }

        self.reply_tx
            .send(text.to_string())
            .map_err(|_| HowlError::Connection("server side dropped".into()))?;
        self.sent += 1;
        Ok(())
    }

    // ---

    async fn close(&mut self) -> Result<()> {
        // ---
        self.closed = true;
        self.inbound_rx.close();
        Ok(())
    }
}
