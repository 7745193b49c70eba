//! Discovery connection lifecycle.
//!
//! [`DiscoveryManager`] is the single entry point a host calls to list the
//! broadcasts on a relay.  It owns at most one relay connection at a time:
//!
//! ```text
//! discover(addr)
//!   ├─ validate addr              (InvalidAddress, no I/O)
//!   ├─ close tracked connection   (best effort; starts a new generation)
//!   ├─ connect(addr)              (ConnectionFailed; no lock held)
//!   ├─ track new connection       (only if still the latest generation)
//!   └─ collect_announcements()    (CollectionFailed; connection stays tracked)
//! ```
//!
//! # Latest wins
//!
//! A second `discover` while the first is still collecting closes the first
//! call's connection out from under it.  The first call's subscription then
//! ends and it returns whatever it gathered.
//!
//! The mutex around the tracked connection is never held across an await.
//! Every `discover` and every `shutdown` bumps a generation counter; a connect
//! that completes after a newer call started (or after `shutdown`) finds a
//! different generation, closes its fresh connection and returns an empty
//! list without collecting.  A relay that never answers therefore cannot hold
//! up a newer discovery or host teardown.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use broadcast_discovery_core::{
    BroadcastPathSet, Connection, ConnectionId, Connector, DiscoveryError, RelayAddress,
};

use crate::application::collect_announcements::collect_announcements;
use crate::domain::DiscoveryConfig;

/// Discovers broadcasts on relays while keeping at most one connection open.
pub struct DiscoveryManager<C> {
    connector: C,
    config: DiscoveryConfig,
    tracked: Mutex<Tracked>,
}

#[derive(Default)]
struct Tracked {
    /// Bumped by every `discover` and `shutdown`.
    generation: u64,
    connection: Option<Arc<dyn Connection>>,
}

impl Tracked {
    /// Closes and forgets the tracked connection, then starts a new
    /// generation and returns it.
    fn supersede(&mut self, reason: &str) -> u64 {
        if let Some(previous) = self.connection.take() {
            debug!(connection = %previous.id(), "closing discovery connection: {reason}");
            previous.close();
        }
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }
}

impl<C: Connector> DiscoveryManager<C> {
    pub fn new(connector: C, config: DiscoveryConfig) -> Self {
        Self {
            connector,
            config,
            tracked: Mutex::new(Tracked::default()),
        }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Lists the broadcasts currently announced by the relay at `relay_address`.
    ///
    /// Any connection left over from a previous call is closed first.  The new
    /// connection stays open after this returns, successfully or not, until the
    /// next `discover` or [`shutdown`](Self::shutdown).
    ///
    /// If a newer `discover` or a `shutdown` starts while this call is still
    /// connecting, the connection is closed as soon as it opens and an empty
    /// list is returned.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::InvalidAddress`] if `relay_address` is not a URL with
    ///   a host.  Nothing is closed or opened in that case.
    /// - [`DiscoveryError::ConnectionFailed`] if the relay cannot be reached.
    /// - [`DiscoveryError::CollectionFailed`] if the announcement stream fails.
    pub async fn discover(&self, relay_address: &str) -> Result<BroadcastPathSet, DiscoveryError> {
        let address = RelayAddress::parse(relay_address)?;
        let started = Instant::now();

        let Some(connection) = self.replace_connection(&address).await? else {
            return Ok(BroadcastPathSet::new());
        };

        let found = collect_announcements(
            connection.as_ref(),
            &self.config.namespace_prefix,
            self.config.time_budget,
        )
        .await?;

        info!(
            relay = %address,
            connection = %connection.id(),
            count = found.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "broadcast discovery finished"
        );
        Ok(found)
    }

    /// Closes the tracked connection, if any.  Safe to call repeatedly.
    ///
    /// A `discover` still connecting when this is called will close its
    /// connection instead of tracking it.
    pub async fn shutdown(&self) {
        self.tracked.lock().await.supersede("shutdown");
    }

    /// Identifier of the connection currently kept open, if any.
    pub async fn tracked_connection(&self) -> Option<ConnectionId> {
        self.tracked.lock().await.connection.as_ref().map(|c| c.id())
    }

    /// Closes the tracked connection, opens one to `address` and tracks it.
    ///
    /// Returns `Ok(None)` when a newer call superseded this one while the
    /// connect was in flight; the late connection is closed, not tracked.
    async fn replace_connection(
        &self,
        address: &RelayAddress,
    ) -> Result<Option<Arc<dyn Connection>>, DiscoveryError> {
        let generation = self.tracked.lock().await.supersede("superseded");

        let connection = self.connector.connect(address).await.map_err(|source| {
            warn!(relay = %address, "failed to connect to relay: {source}");
            DiscoveryError::ConnectionFailed {
                address: address.to_string(),
                source,
            }
        })?;

        let mut tracked = self.tracked.lock().await;
        if tracked.generation != generation {
            debug!(
                relay = %address,
                connection = %connection.id(),
                "discovery superseded while connecting; closing late connection"
            );
            connection.close();
            return Ok(None);
        }

        debug!(relay = %address, connection = %connection.id(), "discovery connection opened");
        tracked.connection = Some(Arc::clone(&connection));
        Ok(Some(connection))
    }
}

impl<C> Drop for DiscoveryManager<C> {
    fn drop(&mut self) {
        if let Some(connection) = self.tracked.get_mut().connection.take() {
            debug!(connection = %connection.id(), "closing discovery connection on drop");
            connection.close();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
