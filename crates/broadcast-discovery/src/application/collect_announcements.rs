//! Bounded announcement collection.
//!
//! A relay subscription has no "give me what you have after N seconds"
//! primitive: it yields one entry at a time, or blocks until the next one.
//! [`collect_announcements`] therefore races every `next()` against the time
//! left in a budget that is fixed when collection starts:
//!
//! ```text
//! start ──┬── next() ─ entry ──┬── next() ─ entry ──┬── next() ··· deadline
//!         │                    │                    │                  │
//!         remaining = budget - elapsed, recomputed each iteration      stop
//! ```
//!
//! A slow trickle of entries never extends the total wait past the budget,
//! and an end-of-stream signal ends collection early.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, error, trace};

use broadcast_discovery_core::{
    AnnouncementEntry, AnnouncementSubscription, BroadcastPath, BroadcastPathSet, Connection,
    ConnectionId, DiscoveryError, TransportError,
};

/// Subscribes to `prefix` on `connection` and gathers active broadcast paths
/// until `time_budget` runs out or the relay ends the announcement stream.
///
/// The budget is measured from the moment this function is called.  The
/// subscription is closed exactly once before returning, whatever the outcome.
/// The connection itself is left open.
///
/// # Errors
///
/// Returns [`DiscoveryError::CollectionFailed`] if the subscription cannot be
/// opened or if waiting for an entry fails.  Paths gathered before the failure
/// are discarded; a failure is never reported as a partial success.
pub async fn collect_announcements(
    connection: &dyn Connection,
    prefix: &BroadcastPath,
    time_budget: Duration,
) -> Result<BroadcastPathSet, DiscoveryError> {
    let started = Instant::now();
    let connection_id = connection.id();

    let subscription = connection.announced(prefix).await.map_err(|e| {
        error!(connection = %connection_id, prefix = %prefix, "failed to subscribe to announcements: {e}");
        DiscoveryError::CollectionFailed(e)
    })?;
    let mut subscription = SubscriptionGuard::new(subscription, connection_id);

    let mut found = BroadcastPathSet::new();

    loop {
        let remaining = time_budget.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            debug!(connection = %connection_id, "time budget exhausted");
            break;
        }

        let next = tokio::select! {
            next = subscription.next() => next,
            () = time::sleep(remaining) => {
                debug!(connection = %connection_id, "time budget exhausted while waiting");
                break;
            }
        };

        match next {
            Ok(Some(AnnouncementEntry { path, active: true })) => {
                trace!(connection = %connection_id, path = %path, "broadcast announced");
                found.push(path);
            }
            Ok(Some(AnnouncementEntry { path, active: false })) => {
                trace!(connection = %connection_id, path = %path, "broadcast withdrawn; ignoring");
            }
            Ok(None) => {
                debug!(connection = %connection_id, "announcement stream ended");
                break;
            }
            Err(e) => {
                error!(connection = %connection_id, "error while waiting for announcements: {e}");
                return Err(DiscoveryError::CollectionFailed(e));
            }
        }
    }

    debug!(
        connection = %connection_id,
        count = found.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "announcement collection finished"
    );
    Ok(found)
}

// ── Subscription guard ────────────────────────────────────────────────────────

/// Owns a subscription and closes it when dropped.
///
/// Every exit from [`collect_announcements`] (return, `?`, timeout, or the
/// caller dropping the future) goes through `Drop`, so the subscription is
/// released exactly once.
struct SubscriptionGuard {
    inner: Box<dyn AnnouncementSubscription>,
    connection_id: ConnectionId,
}

impl SubscriptionGuard {
    fn new(inner: Box<dyn AnnouncementSubscription>, connection_id: ConnectionId) -> Self {
        Self {
            inner,
            connection_id,
        }
    }

    async fn next(&mut self) -> Result<Option<AnnouncementEntry>, TransportError> {
        self.inner.next().await
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.inner.close();
        debug!(connection = %self.connection_id, "announcement subscription released");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
