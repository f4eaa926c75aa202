use async_trait::async_trait;

// ---

use super::error::Result;

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// Observable lifecycle of one game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    // ---
    /// Attempting to establish the connection. Retries with a fixed delay.
    Connecting,

    /// Connected; receiving and answering requests.
    Running,

    /// Terminal. The connection has been released.
    Closed,
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// What a single [`GameConnection::receive`] call yields.
///
/// Servers may batch several packets into one frame; the agent buffers
/// them in order and consumes one per loop iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    // ---
    One(String),
    Many(Vec<String>),
}

// ---

impl Inbound {
    // ---
    /// Flatten into raw messages, preserving receive order.
    pub fn into_messages(self) -> Vec<String> {
        match self {
            Inbound::One(raw) => vec![raw],
            Inbound::Many(raws) => raws,
        }
    }
}

// ---------------------------------------------------------------------------
// GameConnection
// ---------------------------------------------------------------------------

/// A live connection to the game server.
///
/// The agent never constructs wire bytes beyond the reply text; framing is
/// entirely the implementation's concern.
#[async_trait]
pub trait GameConnection: Send {
    // ---
    /// Block until the server sends something.
    ///
    /// Returns `Ok(None)` once the server has closed the connection.
    async fn receive(&mut self) -> Result<Option<Inbound>>;

    /// Send one reply.
    async fn send(&mut self, text: &str) -> Result<()>;

    /// Release the connection. Idempotent.
    async fn close(&mut self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// GameTransport
// ---------------------------------------------------------------------------

/// Factory for [`GameConnection`]s.
///
/// Implementations: `howl_ws::WsTransport`, `howl_link_sim::LinkSimTransport`.
#[async_trait]
pub trait GameTransport: Send + Sync {
    // ---
    type Connection: GameConnection + 'static;

    /// Make one connection attempt. Retrying is the caller's concern.
    async fn connect(&self) -> Result<Self::Connection>;
}
