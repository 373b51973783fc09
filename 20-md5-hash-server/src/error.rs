//! Failure kinds, one enum per site that can fail.
//!
//! Only [`ServerError`] ends the accept loop. [`ConnectionError`] stays inside
//! the worker that hit it, and [`ClientError`] ends the client's send loop.

use std::{io, net::SocketAddr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("could not bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("accept loop failed: {0}")]
    Accept(#[source] io::Error),
}

/// Accept failures that concern a single pending connection rather than the
/// listening socket. The loop logs these and keeps accepting.
pub fn is_per_connection_accept_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection reset by peer")]
    Reset(#[source] io::Error),
    #[error("connection i/o error: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for ConnectionError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
                ConnectionError::Reset(err)
            }
            _ => ConnectionError::Io(err),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection refused by {addr}")]
    Refused { addr: SocketAddr },
    #[error("timed out connecting to {addr}")]
    TimedOut { addr: SocketAddr },
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("connection error: {0}")]
    Io(#[from] io::Error),
}

impl ClientError {
    pub fn connect(addr: SocketAddr, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::ConnectionRefused => ClientError::Refused { addr },
            io::ErrorKind::TimedOut => ClientError::TimedOut { addr },
            _ => ClientError::Connect { addr, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 5555))
    }

    #[test]
    fn resets_are_told_apart_from_other_io_errors() {
        let reset = ConnectionError::from(io::Error::from(io::ErrorKind::ConnectionReset));
        assert!(matches!(reset, ConnectionError::Reset(_)));

        let aborted = ConnectionError::from(io::Error::from(io::ErrorKind::ConnectionAborted));
        assert!(matches!(aborted, ConnectionError::Reset(_)));

        let pipe = ConnectionError::from(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(matches!(pipe, ConnectionError::Io(_)));
    }

    #[test]
    fn connect_errors_map_to_client_kinds() {
        let refused = ClientError::connect(addr(), io::ErrorKind::ConnectionRefused.into());
        assert!(matches!(refused, ClientError::Refused { .. }));

        let timed_out = ClientError::connect(addr(), io::ErrorKind::TimedOut.into());
        assert!(matches!(timed_out, ClientError::TimedOut { .. }));

        let other = ClientError::connect(addr(), io::ErrorKind::AddrNotAvailable.into());
        assert!(matches!(other, ClientError::Connect { .. }));
    }

    #[test]
    fn only_listener_failures_are_fatal_to_accept() {
        assert!(is_per_connection_accept_error(&io::ErrorKind::ConnectionAborted.into()));
        assert!(is_per_connection_accept_error(&io::ErrorKind::Interrupted.into()));
        assert!(!is_per_connection_accept_error(&io::ErrorKind::InvalidInput.into()));
        assert!(!is_per_connection_accept_error(&io::Error::other("too many open files")));
    }
}
