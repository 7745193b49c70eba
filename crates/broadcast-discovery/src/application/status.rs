//! Human-readable summary of a discovery outcome.
//!
//! "The relay has no broadcasts" and "discovery failed" are different
//! conditions and a host must be able to tell them apart.  [`DiscoveryStatus`]
//! folds a discovery result into one of three cases with a message suitable
//! for a status line.

use std::fmt;

use broadcast_discovery_core::{BroadcastPathSet, DiscoveryError};

/// Outcome of one discovery run, reduced to what a status line needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryStatus {
    /// At least one broadcast was found.
    Found(usize),
    /// Discovery succeeded but the relay announced nothing.
    NothingFound,
    /// Discovery failed; carries the error message.
    Failed(String),
}

impl DiscoveryStatus {
    pub fn from_result(result: &Result<BroadcastPathSet, DiscoveryError>) -> Self {
        match result {
            Ok(found) if found.is_empty() => Self::NothingFound,
            Ok(found) => Self::Found(found.len()),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// `true` only when at least one broadcast was found.
    pub fn has_results(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// `true` only when discovery failed.  An empty relay is not a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for DiscoveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(n) => write!(f, "Found {n} broadcast(s)"),
            Self::NothingFound => f.write_str("No broadcasts found. Is anything publishing?"),
            Self::Failed(message) => write!(f, "Error: {message}"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
