//! Broadcast paths and the announcement entries a relay publishes for them.
//!
//! A relay advertises each live broadcast under a slash-separated path such as
//! `room/1`.  Subscribers receive a stream of [`AnnouncementEntry`] values:
//! `active = true` when a broadcast appears and `active = false` when it is
//! withdrawn.

use std::fmt;

/// Slash-separated broadcast name.
///
/// Leading, trailing and repeated slashes are dropped when the path is built,
/// so `"/room//1/"` and `"room/1"` are the same path.  The empty path is the
/// root of the relay's namespace and is a prefix of every other path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BroadcastPath(String);

impl BroadcastPath {
    /// Builds a normalised path.
    pub fn new(path: impl AsRef<str>) -> Self {
        let joined = path
            .as_ref()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        Self(joined)
    }

    /// The root namespace (matches every broadcast).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `prefix` names this path or one of its ancestors.
    ///
    /// Matching is by whole segments: `room` is a prefix of `room/1` but not
    /// of `roomy`.
    ///
    /// ```rust
    /// use broadcast_discovery_core::BroadcastPath;
    ///
    /// let path = BroadcastPath::new("room/1");
    /// assert!(path.has_prefix(&BroadcastPath::new("room")));
    /// assert!(path.has_prefix(&BroadcastPath::empty()));
    /// assert!(!BroadcastPath::new("roomy").has_prefix(&BroadcastPath::new("room")));
    /// ```
    pub fn has_prefix(&self, prefix: &BroadcastPath) -> bool {
        if prefix.is_empty() {
            return true;
        }
        match self.0.strip_prefix(prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl fmt::Display for BroadcastPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BroadcastPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BroadcastPath {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for BroadcastPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One announcement delivered by a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementEntry {
    /// Path of the broadcast this entry is about.
    pub path: BroadcastPath,
    /// `true` = broadcast is live, `false` = broadcast was withdrawn.
    pub active: bool,
}

impl AnnouncementEntry {
    pub fn active(path: impl Into<BroadcastPath>) -> Self {
        Self {
            path: path.into(),
            active: true,
        }
    }

    pub fn withdrawn(path: impl Into<BroadcastPath>) -> Self {
        Self {
            path: path.into(),
            active: false,
        }
    }
}

/// Active broadcast paths collected by one discovery run.
///
/// Paths are kept in arrival order.  A relay that announces the same path
/// twice produces two entries; the set does not deduplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastPathSet {
    paths: Vec<BroadcastPath>,
}

impl BroadcastPathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a path, preserving arrival order.
    pub fn push(&mut self, path: BroadcastPath) {
        self.paths.push(path);
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BroadcastPath> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[BroadcastPath] {
        &self.paths
    }

    /// Path strings in arrival order, ready to hand to a presentation layer.
    pub fn to_strings(&self) -> Vec<String> {
        self.paths.iter().map(ToString::to_string).collect()
    }

    pub fn into_vec(self) -> Vec<BroadcastPath> {
        self.paths
    }
}

impl FromIterator<BroadcastPath> for BroadcastPathSet {
    fn from_iter<I: IntoIterator<Item = BroadcastPath>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for BroadcastPathSet {
    type Item = BroadcastPath;
    type IntoIter = std::vec::IntoIter<BroadcastPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl<'a> IntoIterator for &'a BroadcastPathSet {
    type Item = &'a BroadcastPath;
    type IntoIter = std::slice::Iter<'a, BroadcastPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
