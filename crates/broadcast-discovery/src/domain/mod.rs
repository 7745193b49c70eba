//! Domain layer for broadcast-discovery.
//!
//! Pure values only: no runtime, no sockets, no file access.  Shared types such
//! as broadcast paths and errors live in `broadcast-discovery-core`.

pub mod config;

pub use config::DiscoveryConfig;
