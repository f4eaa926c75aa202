//! Core vocabulary for the howl werewolf game agent.
//!
//! This crate defines the types every other howl crate speaks: the protocol
//! actions a game server can request, the roles it can assign, the packet
//! schema it sends, and the transport traits the agent talks through.
//! No transport implementations or agent logic live here.
//!
//! # Structure
//!
//! - [`error`] - [`HowlError`] and [`Result<T>`] alias
//! - [`action`] - [`Action`] and the request-tag classifier
//! - [`role`] - [`Role`] assignments
//! - [`identity`] - agent identifier parsing and canonical formatting
//! - [`packet`] - [`Packet`] schema and field-wise merge
//! - [`transport`] - [`GameTransport`], [`GameConnection`] traits

mod action;
mod error;
mod identity;
mod packet;
mod role;
mod transport;

// --- error
pub use error::{HowlError, Result};

// --- action
pub use action::Action;

// --- role
pub use role::Role;

// --- identity
pub use identity::{canonical_name, canonicalize, extract_index};

// --- packet
pub use packet::{
    // ---
    extend_history,
    Info,
    Packet,
    Setting,
    Status,
    Talk,
};

// --- transport
pub use transport::{
    // ---
    GameConnection,
    GameTransport,
    Inbound,
    SessionPhase,
};
