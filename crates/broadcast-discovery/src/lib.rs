//! broadcast-discovery library crate.
//!
//! Finds the live broadcasts a media relay is currently announcing, within a
//! fixed time budget, while keeping at most one relay connection open.
//!
//! # Architecture
//!
//! ```text
//! Host application (UI, CLI, service)
//!         ↕  discover(address) / shutdown()
//! [broadcast-discovery]
//!   ├── domain/           DiscoveryConfig
//!   ├── application/
//!   │     ├── discover_broadcasts/    connection lifecycle ("latest wins")
//!   │     ├── collect_announcements/  bounded announcement collection
//!   │     └── status/                 human-readable outcome summary
//!   └── infrastructure/
//!         ├── memory_relay/  in-process relay implementing the transport traits
//!         └── config/        TOML configuration loading
//!         ↕
//! broadcast-discovery-core  (domain types, errors, transport traits)
//! ```
//!
//! The library only emits `tracing` events; installing a subscriber is up to
//! the host.

/// Domain layer: configuration values.
pub mod domain;

/// Application layer: the discovery procedure.
pub mod application;

/// Infrastructure layer: in-memory relay and configuration files.
pub mod infrastructure;

pub use application::{collect_announcements, DiscoveryManager, DiscoveryStatus};
pub use domain::DiscoveryConfig;
