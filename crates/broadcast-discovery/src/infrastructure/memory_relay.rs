//! In-process relay implementing the transport traits.
//!
//! [`MemoryRelay`] lets a host (or a test) run the full discovery procedure
//! without a network.  Publishers call [`MemoryRelay::announce`] and
//! [`MemoryRelay::unannounce`]; every connection opened through the relay's
//! [`Connector`] implementation can subscribe to those announcements.
//!
//! # Behaviour
//!
//! - A new subscription first replays the broadcasts that are currently live
//!   (in the order they were announced), then receives live updates.
//! - Closing a connection ends every subscription opened on it: a pending
//!   `next()` resolves to `Ok(None)` instead of waiting forever.
//! - [`MemoryRelay::finish`] ends every live subscription on the relay.
//! - [`MemoryRelay::set_reachable`] simulates an unreachable relay.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use broadcast_discovery_core::{
    AnnouncementEntry, AnnouncementSubscription, BroadcastPath, Connection, ConnectionId,
    Connector, RelayAddress, TransportError,
};

/// A relay that lives entirely in memory.
///
/// Cloning is cheap; clones share the same broadcasts and connections.
#[derive(Clone)]
pub struct MemoryRelay {
    shared: Arc<RelayShared>,
}

struct RelayShared {
    state: Mutex<RelayState>,
    connections_opened: AtomicUsize,
}

struct RelayState {
    reachable: bool,
    /// Live broadcasts in announcement order.
    live: Vec<BroadcastPath>,
    subscribers: Vec<Subscriber>,
    open_connections: HashSet<ConnectionId>,
}

struct Subscriber {
    prefix: BroadcastPath,
    tx: mpsc::UnboundedSender<AnnouncementEntry>,
}

impl RelayShared {
    fn lock(&self) -> MutexGuard<'_, RelayState> {
        // A panic while holding the lock cannot leave the state half-updated
        // in a way that matters here, so recover the guard.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RelayState {
    /// Delivers `entry` to every matching subscriber, dropping the ones whose
    /// receiving side has gone away.
    fn publish(&mut self, entry: &AnnouncementEntry) {
        self.subscribers.retain(|sub| {
            if !entry.path.has_prefix(&sub.prefix) {
                return !sub.tx.is_closed();
            }
            sub.tx.send(entry.clone()).is_ok()
        });
    }
}

impl MemoryRelay {
    /// Creates a reachable relay with no broadcasts.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(RelayShared {
                state: Mutex::new(RelayState {
                    reachable: true,
                    live: Vec::new(),
                    subscribers: Vec::new(),
                    open_connections: HashSet::new(),
                }),
                connections_opened: AtomicUsize::new(0),
            }),
        }
    }

    /// Marks `path` as live and notifies matching subscribers.
    ///
    /// Announcing a path that is already live does nothing.
    pub fn announce(&self, path: impl Into<BroadcastPath>) {
        let path = path.into();
        let mut state = self.shared.lock();
        if state.live.contains(&path) {
            return;
        }
        debug!(path = %path, "memory relay: broadcast announced");
        state.live.push(path.clone());
        state.publish(&AnnouncementEntry::active(path));
    }

    /// Withdraws `path` and notifies matching subscribers.
    ///
    /// Withdrawing a path that is not live does nothing.
    pub fn unannounce(&self, path: impl Into<BroadcastPath>) {
        let path = path.into();
        let mut state = self.shared.lock();
        let Some(index) = state.live.iter().position(|p| *p == path) else {
            return;
        };
        debug!(path = %path, "memory relay: broadcast withdrawn");
        state.live.remove(index);
        state.publish(&AnnouncementEntry::withdrawn(path));
    }

    /// Ends every live subscription.  Subscriptions opened afterwards still
    /// work normally.
    pub fn finish(&self) {
        self.shared.lock().subscribers.clear();
    }

    /// When `false`, [`Connector::connect`] fails with
    /// [`TransportError::Unreachable`].
    pub fn set_reachable(&self, reachable: bool) {
        self.shared.lock().reachable = reachable;
    }

    /// Currently live broadcasts, in announcement order.
    pub fn live_broadcasts(&self) -> Vec<BroadcastPath> {
        self.shared.lock().live.clone()
    }

    /// Total number of connections ever opened.
    pub fn connections_opened(&self) -> usize {
        self.shared.connections_opened.load(Ordering::SeqCst)
    }

    /// Number of connections opened and not yet closed.
    pub fn open_connections(&self) -> usize {
        self.shared.lock().open_connections.len()
    }

    /// Returns `true` if the connection `id` is open.
    pub fn is_open(&self, id: ConnectionId) -> bool {
        self.shared.lock().open_connections.contains(&id)
    }
}

impl Default for MemoryRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for MemoryRelay {
    async fn connect(&self, address: &RelayAddress) -> Result<Arc<dyn Connection>, TransportError> {
        let id = ConnectionId::new();
        {
            let mut state = self.shared.lock();
            if !state.reachable {
                return Err(TransportError::Unreachable(address.to_string()));
            }
            state.open_connections.insert(id);
        }
        self.shared.connections_opened.fetch_add(1, Ordering::SeqCst);
        debug!(relay = %address, connection = %id, "memory relay: connection opened");

        let (closed, _) = watch::channel(false);
        Ok(Arc::new(MemoryConnection {
            id,
            relay: Arc::clone(&self.shared),
            closed,
        }))
    }
}

// ── Connection ────────────────────────────────────────────────────────────────

/// A connection to a [`MemoryRelay`].
pub struct MemoryConnection {
    id: ConnectionId,
    relay: Arc<RelayShared>,
    /// Flips to `true` on close; subscriptions watch it.
    closed: watch::Sender<bool>,
}

#[async_trait]
impl Connection for MemoryConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn announced(
        &self,
        prefix: &BroadcastPath,
    ) -> Result<Box<dyn AnnouncementSubscription>, TransportError> {
        if *self.closed.borrow() {
            return Err(TransportError::Closed);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        {
            let mut state = self.relay.lock();
            for path in state.live.iter().filter(|p| p.has_prefix(prefix)) {
                // The receiver is still in scope, so this cannot fail.
                let _ = tx.send(AnnouncementEntry::active(path.clone()));
            }
            state.subscribers.push(Subscriber {
                prefix: prefix.clone(),
                tx,
            });
        }

        Ok(Box::new(MemorySubscription {
            rx: Some(rx),
            closed: self.closed.subscribe(),
        }))
    }

    fn close(&self) {
        if !self.closed.send_replace(true) {
            self.relay.lock().open_connections.remove(&self.id);
            debug!(connection = %self.id, "memory relay: connection closed");
        }
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        self.close();
    }
}

// ── Subscription ──────────────────────────────────────────────────────────────

/// Announcement stream from a [`MemoryConnection`].
pub struct MemorySubscription {
    /// `None` once the stream has ended or been closed.
    rx: Option<mpsc::UnboundedReceiver<AnnouncementEntry>>,
    closed: watch::Receiver<bool>,
}

#[async_trait]
impl AnnouncementSubscription for MemorySubscription {
    async fn next(&mut self) -> Result<Option<AnnouncementEntry>, TransportError> {
        let Some(rx) = self.rx.as_mut() else {
            return Ok(None);
        };

        let entry = tokio::select! {
            biased;
            () = wait_closed(&mut self.closed) => None,
            entry = rx.recv() => entry,
        };

        if entry.is_none() {
            self.rx = None;
        }
        Ok(entry)
    }

    fn close(&mut self) {
        self.rx = None;
    }
}

/// Resolves once the connection is closed or dropped.
async fn wait_closed(closed: &mut watch::Receiver<bool>) {
    while !*closed.borrow_and_update() {
        if closed.changed().await.is_err() {
            return;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
