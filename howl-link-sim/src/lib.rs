//! In-process game server link for howl unit and integration testing.
//!
//! [`LinkSimTransport`] implements [`howl_domain::GameTransport`] using tokio
//! channels instead of sockets. Each successful `connect` hands the agent a
//! [`LinkSimConnection`] and the test a matching [`ServerConn`] through
//! [`LinkSimServer::accept`]. [`LinkSimConfig`] controls injected
//! impairments:
//!
//! - A number of refused connection attempts before the first success
//! - A send budget after which replies fail as if the link dropped
//!
//! # Quick start
//!
//! ```rust
//! use howl_link_sim::{LinkSimConfig, LinkSimTransport};
//!
//! let (transport, mut server) = LinkSimTransport::new(LinkSimConfig::perfect());
//! ```

mod config;
mod connection;
mod server;
mod transport;

// --- public API
pub use config::LinkSimConfig;
pub use connection::LinkSimConnection;
pub use server::{LinkSimServer, ServerConn};
pub use transport::LinkSimTransport;
