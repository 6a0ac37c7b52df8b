//! Error types.

use std::time::Duration;

use thiserror::Error;

/// Result alias for watchdog operations.
pub type Result<T> = std::result::Result<T, WatchdogError>;

/// Errors returned by watchdog operations.
///
/// Everything except [`InvalidConfig`](Self::InvalidConfig) is a probe
/// failure: the loop counts them all the same and only the log detail
/// differs.
#[derive(Debug, Error)]
pub enum WatchdogError {
    /// Socket I/O failed (typically `ConnectionRefused` from a dead resolver).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No response arrived within the probe timeout.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The nameserver address did not resolve to any socket address.
    #[error("nameserver address resolved to nothing: {addr}")]
    Resolve {
        /// The configured `host:port`.
        addr: String,
    },

    /// The query could not be encoded or the response could not be decoded.
    #[error("DNS wire error: {0}")]
    Proto(#[from] hickory_proto::error::ProtoError),

    /// A datagram arrived, but not as an answer to our query.
    #[error("response id {received} does not match query id {expected}")]
    IdMismatch {
        /// The ID sent with the query.
        expected: u16,
        /// The ID found in the response.
        received: u16,
    },

    /// Invalid configuration values.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl WatchdogError {
    /// Returns `true` if the probe gave up waiting for a response.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns `true` if the nameserver actively refused the datagram.
    #[must_use]
    pub fn is_refused(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::ConnectionRefused)
    }
}
