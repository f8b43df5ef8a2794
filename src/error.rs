//! Crate-wide error types.

use thiserror::Error;

/// Errors that can prevent the server from starting or binding its listener.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid listen address: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),

    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid FTP passive port range: {0}")]
    InvalidPortRange(String),
}

/// Errors surfaced while servicing a single session's control channel.
///
/// These never propagate past the session: every variant is handled by
/// logging and tearing the session down, per the error taxonomy's rule that
/// all kinds are recoverable at session scope.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("control channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("peer closed the connection")]
    PeerClosed,
}

impl SessionError {
    /// Classifies a raw I/O error: a reset or broken pipe means the peer
    /// went away, everything else is an unexpected I/O fault.
    pub fn from_io(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::ConnectionReset | ErrorKind::BrokenPipe | ErrorKind::UnexpectedEof => {
                SessionError::PeerClosed
            }
            _ => SessionError::Io(err),
        }
    }
}
