//! Domain entities for broadcast discovery.
//!
//! Everything here is plain data plus validation.  Nothing in this module
//! touches the network, a runtime or a clock, so it can be tested without any
//! setup.

/// Relay address validation.
pub mod address;

/// Broadcast paths and announcement entries.
pub mod announcement;
