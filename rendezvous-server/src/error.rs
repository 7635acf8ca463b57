use rendezvous_core::ConnectionId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid signal: {0}")]
    InvalidSignal(#[from] serde_json::Error),

    /// The connection is unknown or its outbound channel is gone.
    #[error("connection {0} is closed")]
    ConnectionClosed(ConnectionId),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = RelayError> = std::result::Result<T, E>;
