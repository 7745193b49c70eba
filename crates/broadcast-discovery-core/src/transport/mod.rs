//! Transport seam: the capabilities discovery consumes from a relay library.
//!
//! The discovery procedure never speaks a wire protocol itself.  It asks a
//! [`Connector`] for a [`Connection`], asks the connection for an
//! [`AnnouncementSubscription`], and pulls entries from it one at a time.
//!
//! # Contract for implementors
//!
//! - `close()` on both connections and subscriptions is idempotent and never
//!   fails.  Closing something that is already dead is a no-op.
//! - Closing a connection must wake any task blocked in
//!   [`AnnouncementSubscription::next`] on one of its subscriptions.  The wait
//!   resolves to `Ok(None)` or an error; it must not hang.
//! - `next()` returns `Ok(None)` once the stream is exhausted and keeps
//!   returning it afterwards.
//!
//! In test builds (or with the `mock` feature) `mockall` generates
//! `MockConnector`, `MockConnection` and `MockAnnouncementSubscription`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::address::RelayAddress;
use crate::domain::announcement::{AnnouncementEntry, BroadcastPath};
use crate::error::TransportError;

/// Identifies one relay connection in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opens connections to relays.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait Connector: Send + Sync {
    /// Establishes a session with the relay at `address`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the relay is unreachable, refuses the
    /// session, or the TLS handshake fails.
    async fn connect(&self, address: &RelayAddress) -> Result<Arc<dyn Connection>, TransportError>;
}

/// An established relay session.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait Connection: Send + Sync {
    fn id(&self) -> ConnectionId;

    /// Subscribes to announcements for every broadcast under `prefix`.
    async fn announced(
        &self,
        prefix: &BroadcastPath,
    ) -> Result<Box<dyn AnnouncementSubscription>, TransportError>;

    /// Closes the session.  Idempotent.
    fn close(&self);
}

/// A live stream of announcement entries.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait AnnouncementSubscription: Send {
    /// Waits for the next entry.  `Ok(None)` means no more entries will arrive.
    async fn next(&mut self) -> Result<Option<AnnouncementEntry>, TransportError>;

    /// Releases the subscription.  Idempotent, and safe after end-of-stream.
    fn close(&mut self);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_ids_are_unique() {
        assert_ne!(ConnectionId::new(), ConnectionId::new());
    }

    #[test]
    fn test_connection_id_displays_as_uuid() {
        let id = ConnectionId::new();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }

    #[tokio::test]
    async fn test_mock_connector_hands_out_configured_connection() {
        // Arrange
        let conn_id = ConnectionId::new();
        let mut connector = MockConnector::new();
        connector.expect_connect().times(1).returning(move |_| {
            let mut conn = MockConnection::new();
            conn.expect_id().return_const(conn_id);
            Ok(Arc::new(conn) as Arc<dyn Connection>)
        });
        let addr = RelayAddress::parse("https://relay.example.com").unwrap();

        // Act
        let conn = connector.connect(&addr).await.unwrap();

        // Assert
        assert_eq!(conn.id(), conn_id);
    }
}
