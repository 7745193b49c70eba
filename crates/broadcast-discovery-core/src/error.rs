//! Error types shared by the transport seam and the discovery procedure.
//!
//! Deadline expiry and end-of-stream are not errors anywhere in this crate:
//! both are normal ways for a discovery run to finish.

use thiserror::Error;

/// Failures reported by a relay transport implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// No route to the relay, DNS failure, or the relay is not listening.
    #[error("relay unreachable: {0}")]
    Unreachable(String),

    /// The relay actively refused the session.
    #[error("relay refused the connection: {0}")]
    Refused(String),

    /// TLS handshake or certificate validation failed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The connection was closed while an operation was still using it.
    #[error("connection closed")]
    Closed,

    /// The relay sent something the transport could not make sense of.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Errors surfaced by the discovery procedure to its caller.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The relay address is empty or is not a URL with a host.
    ///
    /// Detected before any I/O.  The caller should ask for a different address.
    #[error("invalid relay address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The connection to the relay could not be opened.
    ///
    /// No retry is attempted; retry policy belongs to the caller.
    #[error("failed to connect to relay at {address}: {source}")]
    ConnectionFailed {
        address: String,
        #[source]
        source: TransportError,
    },

    /// Subscribing to announcements, or waiting for one, failed after the
    /// connection was established.
    #[error("announcement collection failed: {0}")]
    CollectionFailed(#[source] TransportError),
}

impl DiscoveryError {
    pub(crate) fn invalid_address(address: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
