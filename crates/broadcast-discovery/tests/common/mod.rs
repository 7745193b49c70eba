//! Scripted relay transport shared by the integration tests.
//!
//! Each connection plays back a script of timed steps, and every transport
//! call is written to a shared [`Journal`] so tests can assert on ordering:
//!
//! ```text
//! connect:1  subscribe:1  release:1  close:1  connect:2 ...
//! ```
//!
//! Steps use `tokio::time::sleep`, so tests run on a paused clock
//! (`#[tokio::test(start_paused = true)]`) finish instantly while still
//! observing exact elapsed times.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use broadcast_discovery_core::{
    AnnouncementEntry, AnnouncementSubscription, BroadcastPath, Connection, ConnectionId,
    Connector, RelayAddress, TransportError,
};

/// One step of a subscription script.
#[derive(Debug, Clone)]
pub enum Step {
    /// Deliver `entry` after waiting `after`.
    Entry { after: Duration, entry: AnnouncementEntry },
    /// Signal end-of-stream after waiting `after`.
    End { after: Duration },
    /// Fail with `error` after waiting `after`.
    Fail { after: Duration, error: TransportError },
}

impl Step {
    pub fn active(after_ms: u64, path: &str) -> Self {
        Self::Entry {
            after: Duration::from_millis(after_ms),
            entry: AnnouncementEntry::active(path),
        }
    }

    pub fn withdrawn(after_ms: u64, path: &str) -> Self {
        Self::Entry {
            after: Duration::from_millis(after_ms),
            entry: AnnouncementEntry::withdrawn(path),
        }
    }

    pub fn end(after_ms: u64) -> Self {
        Self::End {
            after: Duration::from_millis(after_ms),
        }
    }

    pub fn fail(after_ms: u64, error: TransportError) -> Self {
        Self::Fail {
            after: Duration::from_millis(after_ms),
            error,
        }
    }
}

/// Ordered record of transport calls.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    fn record(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }

    /// Index of the first occurrence of `event`.
    pub fn position(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

/// Connector handing out connections that replay queued scripts.
///
/// Connections are numbered from 1 in the order `connect` is called, which
/// is also the order scripts and connect delays are handed out.  A connection
/// with no queued script announces nothing and never ends its stream.
/// `connect:N` is journalled when connection N has opened.
#[derive(Default)]
pub struct ScriptedConnector {
    pub journal: Journal,
    scripts: Mutex<VecDeque<Vec<Step>>>,
    delays: Mutex<VecDeque<Duration>>,
    ids: Mutex<HashMap<usize, ConnectionId>>,
    connects: AtomicUsize,
    refuse: Mutex<Option<TransportError>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the script for the next connection.
    pub fn push_script(&self, steps: Vec<Step>) {
        self.scripts.lock().unwrap().push_back(steps);
    }

    /// Makes the next connect take `delay` before the connection opens.
    pub fn delay_connect(&self, delay: Duration) {
        self.delays.lock().unwrap().push_back(delay);
    }

    /// Identifier of connection `number`, once it has opened.
    pub fn connection_id(&self, number: usize) -> Option<ConnectionId> {
        self.ids.lock().unwrap().get(&number).copied()
    }

    /// Makes every following connect fail with `error`.
    pub fn refuse_with(&self, error: TransportError) {
        *self.refuse.lock().unwrap() = Some(error);
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(&self, _address: &RelayAddress) -> Result<Arc<dyn Connection>, TransportError> {
        let refused = self.refuse.lock().unwrap().clone();
        if let Some(error) = refused {
            self.journal.record("connect-refused".to_string());
            return Err(error);
        }

        let number = self.connects.fetch_add(1, Ordering::SeqCst) + 1;
        let script = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
        let delay = self.delays.lock().unwrap().pop_front().unwrap_or_default();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let id = ConnectionId::new();
        self.ids.lock().unwrap().insert(number, id);
        self.journal.record(format!("connect:{number}"));
        let (closed, _) = watch::channel(false);

        Ok(Arc::new(ScriptedConnection {
            number,
            id,
            journal: self.journal.clone(),
            script: Mutex::new(Some(script)),
            closed,
        }))
    }
}

struct ScriptedConnection {
    number: usize,
    id: ConnectionId,
    journal: Journal,
    script: Mutex<Option<Vec<Step>>>,
    closed: watch::Sender<bool>,
}

#[async_trait]
impl Connection for ScriptedConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn announced(
        &self,
        _prefix: &BroadcastPath,
    ) -> Result<Box<dyn AnnouncementSubscription>, TransportError> {
        self.journal.record(format!("subscribe:{}", self.number));
        let steps = self.script.lock().unwrap().take().unwrap_or_default();
        Ok(Box::new(ScriptedSubscription {
            number: self.number,
            journal: self.journal.clone(),
            steps: steps.into(),
            closed: self.closed.subscribe(),
        }))
    }

    fn close(&self) {
        if !self.closed.send_replace(true) {
            self.journal.record(format!("close:{}", self.number));
        }
    }
}

struct ScriptedSubscription {
    number: usize,
    journal: Journal,
    steps: VecDeque<Step>,
    closed: watch::Receiver<bool>,
}

impl ScriptedSubscription {
    async fn wait_closed(&mut self) {
        while !*self.closed.borrow_and_update() {
            if self.closed.changed().await.is_err() {
                return;
            }
        }
    }
}

#[async_trait]
impl AnnouncementSubscription for ScriptedSubscription {
    async fn next(&mut self) -> Result<Option<AnnouncementEntry>, TransportError> {
        let Some(step) = self.steps.pop_front() else {
            // Out of script: behave like a quiet relay until the connection closes.
            self.wait_closed().await;
            return Ok(None);
        };

        let after = match &step {
            Step::Entry { after, .. } | Step::End { after } | Step::Fail { after, .. } => *after,
        };

        tokio::select! {
            () = self.wait_closed() => return Ok(None),
            () = tokio::time::sleep(after) => {}
        }

        match step {
            Step::Entry { entry, .. } => Ok(Some(entry)),
            Step::End { .. } => {
                self.steps.clear();
                self.steps.push_back(Step::end(0));
                Ok(None)
            }
            Step::Fail { error, .. } => Err(error),
        }
    }

    fn close(&mut self) {
        self.journal.record(format!("release:{}", self.number));
    }
}
