//! Infrastructure layer for broadcast-discovery.
//!
//! # Responsibilities
//!
//! - An in-process relay ([`MemoryRelay`]) implementing the transport traits,
//!   for hosts that embed a relay and for tests
//! - Loading [`DiscoveryConfig`](crate::DiscoveryConfig) from TOML files
//!
//! Real network relays are provided by the host's relay library through the
//! same `Connector` trait.

pub mod config;
pub mod memory_relay;

pub use config::{load_config, parse_config, render_config, ConfigError};
pub use memory_relay::MemoryRelay;
