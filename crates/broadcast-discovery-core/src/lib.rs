//! # broadcast-discovery-core
//!
//! Shared foundation for discovering live media broadcasts advertised by a
//! relay.  It defines the vocabulary that the discovery procedure speaks and
//! the seams at which a real relay connection plugs in, but performs no I/O
//! itself.
//!
//! - **`domain`** – Validated relay addresses, broadcast paths, announcement
//!   entries and the ordered result set of one discovery run.
//!
//! - **`error`** – [`TransportError`] for failures reported by a relay
//!   connection, and [`DiscoveryError`] for failures surfaced to callers of the
//!   discovery procedure.
//!
//! - **`transport`** – The [`Connector`], [`Connection`] and
//!   [`AnnouncementSubscription`] traits.  The wire encoding behind them is
//!   the business of whichever relay library implements them.

pub mod domain;
pub mod error;
pub mod transport;

pub use domain::address::RelayAddress;
pub use domain::announcement::{AnnouncementEntry, BroadcastPath, BroadcastPathSet};
pub use error::{DiscoveryError, TransportError};
pub use transport::{AnnouncementSubscription, Connection, ConnectionId, Connector};
