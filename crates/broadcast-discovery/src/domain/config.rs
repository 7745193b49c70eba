//! Discovery configuration.
//!
//! [`DiscoveryConfig`] is a plain struct so hosts and tests can build one
//! directly.  Loading it from a TOML file is the infrastructure layer's job
//! (see `infrastructure::config`).

use std::time::Duration;

use broadcast_discovery_core::BroadcastPath;

/// Default time budget for one discovery run.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_millis(3000);

/// Settings for one [`DiscoveryManager`](crate::DiscoveryManager).
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use broadcast_discovery::DiscoveryConfig;
///
/// let cfg = DiscoveryConfig::default();
/// assert!(cfg.namespace_prefix.is_empty());
/// assert_eq!(cfg.time_budget, Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Namespace to subscribe to.  Empty means every broadcast on the relay.
    pub namespace_prefix: BroadcastPath,

    /// Upper bound on how long one collection waits for announcements.
    ///
    /// Measured from the start of collection and never extended by incoming
    /// entries.  A zero budget subscribes and returns immediately.
    pub time_budget: Duration,
}

impl Default for DiscoveryConfig {
    /// | Field            | Default   |
    /// |------------------|-----------|
    /// | namespace_prefix | (root)    |
    /// | time_budget      | 3 seconds |
    fn default() -> Self {
        Self {
            namespace_prefix: BroadcastPath::empty(),
            time_budget: DEFAULT_TIME_BUDGET,
        }
    }
}

impl DiscoveryConfig {
    pub fn with_namespace_prefix(mut self, prefix: impl Into<BroadcastPath>) -> Self {
        self.namespace_prefix = prefix.into();
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
