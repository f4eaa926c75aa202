use thiserror::Error;

// ---

#[derive(Debug, Error)]
pub enum HowlError {
    // ---
    /// A raw inbound message could not be parsed into a [`crate::Packet`].
    #[error("malformed packet: {0}")]
    MalformedPacket(String),

    #[error("connection error: {0}")]
    Connection(String),

    /// The assigned role does not map to any known handler.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown request tag: {0}")]
    UnknownRequest(String),

    /// An action body failed before its deadline.
    #[error("action failed: {0}")]
    Action(String),

    #[error("no index in agent identifier {0:?}")]
    Identity(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// ---

pub type Result<T> = std::result::Result<T, HowlError>;
