//! WebSocket transport for the howl game agent.
//!
//! Implements [`howl_domain::GameTransport`] on top of `tokio-tungstenite`.
//! Each text frame carries one JSON packet, or a JSON array of packets which
//! is split into an [`howl_domain::Inbound::Many`] batch.
//!
//! # Quick start
//!
//! ```ignore
//! use howl_domain::{GameConnection, GameTransport};
//! use howl_ws::WsTransport;
//!
//! let transport = WsTransport::new("ws://127.0.0.1:8080/ws");
//! let mut conn  = transport.connect().await?;
//! let inbound   = conn.receive().await?;
//! ```

mod connection;
mod error;
mod transport;

pub use connection::{split_batch, WsConnection};
pub use error::WsError;
pub use transport::WsTransport;
