//! Application layer for broadcast-discovery.
//!
//! Knows *what* discovery does (validate, connect, subscribe, collect within a
//! budget, tear down) and talks to relays only through the transport traits
//! from `broadcast-discovery-core`.
//!
//! # What does NOT belong here?
//!
//! - Concrete relay connections (that is infrastructure or the host's relay
//!   library)
//! - Reading configuration files

pub mod collect_announcements;
pub mod discover_broadcasts;
pub mod status;

pub use collect_announcements::collect_announcements;
pub use discover_broadcasts::DiscoveryManager;
pub use status::DiscoveryStatus;
