use tokio::sync::mpsc;

// ---

use howl_domain::Inbound;

// ---------------------------------------------------------------------------
// LinkSimServer
// ---------------------------------------------------------------------------

/// Test-side accept queue. Yields one [`ServerConn`] per successful
/// agent `connect`.
pub struct LinkSimServer {
    // ---
    conn_rx: mpsc::UnboundedReceiver<ServerConn>,
}

// ---

impl LinkSimServer {
    // ---
    pub(crate) fn new(conn_rx: mpsc::UnboundedReceiver<ServerConn>) -> Self {
        Self { conn_rx }
    }

    // ---

    /// Wait for the next agent connection. `None` once the transport is gone.
    pub async fn accept(&mut self) -> Option<ServerConn> {
        self.conn_rx.recv().await
    }
}

// ---------------------------------------------------------------------------
// ServerConn
// ---------------------------------------------------------------------------

/// Server side of one in-process link.
///
/// Dropping it (or calling [`ServerConn::hang_up`]) closes the link; the
/// agent's next `receive` then returns `Ok(None)`.
pub struct ServerConn {
    // ---
    inbound_tx: mpsc::UnboundedSender<Inbound>,
    reply_rx: mpsc::UnboundedReceiver<String>,
}

// ---

impl ServerConn {
    // ---
    pub(crate) fn new(
        inbound_tx: mpsc::UnboundedSender<Inbound>,
        reply_rx: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        Self {
            inbound_tx,
            reply_rx,
        }
    }

    // ---

    /// Deliver one raw message. Returns `false` if the agent has closed.
    pub fn push(&self, raw: impl Into<String>) -> bool {
        self.inbound_tx.send(Inbound::One(raw.into())).is_ok()
    }

    // ---

    /// Deliver several raw messages in a single receive.
    pub fn push_batch<I, S>(&self, raws: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let batch = raws.into_iter().map(Into::into).collect();
        self.inbound_tx.send(Inbound::Many(batch)).is_ok()
    }

    // ---

    /// Wait for the agent's next reply. `None` once the agent side is gone.
    pub async fn reply(&mut self) -> Option<String> {
        self.reply_rx.recv().await
    }

    // ---

    /// Take a reply if one is already queued.
    pub fn try_reply(&mut self) -> Option<String> {
        self.reply_rx.try_recv().ok()
    }

    // ---

    /// Close the link from the server side.
    pub fn hang_up(self) {
        drop(self);
    }
}
