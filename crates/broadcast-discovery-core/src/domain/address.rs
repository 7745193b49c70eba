//! Validated relay addresses.
//!
//! A [`RelayAddress`] can only be obtained through [`RelayAddress::parse`], so
//! any code that holds one knows the string was a structurally valid URL with a
//! host.  Validation happens entirely in memory; an invalid address never
//! reaches a [`Connector`](crate::Connector).

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::DiscoveryError;

/// A relay location that passed URL validation.
///
/// # Example
///
/// ```rust
/// use broadcast_discovery_core::RelayAddress;
///
/// let addr = RelayAddress::parse(" https://relay.example.com/anon ").unwrap();
/// assert_eq!(addr.host(), "relay.example.com");
/// assert_eq!(addr.as_url().path(), "/anon");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelayAddress {
    url: Url,
}

impl RelayAddress {
    /// Parses and validates a relay address.
    ///
    /// Leading and trailing whitespace is ignored, matching what a user pastes
    /// into a text field.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidAddress`] if the trimmed input is empty,
    /// is not an absolute URL, or has no host component (e.g. `mailto:` URLs).
    pub fn parse(input: &str) -> Result<Self, DiscoveryError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DiscoveryError::invalid_address(input, "address is empty"));
        }

        let url = Url::parse(trimmed)
            .map_err(|e| DiscoveryError::invalid_address(input, e.to_string()))?;

        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(Self { url }),
            _ => Err(DiscoveryError::invalid_address(input, "address has no host")),
        }
    }

    /// Host name or IP literal of the relay.
    pub fn host(&self) -> &str {
        // `parse` rejects URLs without a host.
        self.url.host_str().unwrap_or_default()
    }

    /// The underlying parsed URL.
    pub fn as_url(&self) -> &Url {
        &self.url
    }
}

impl FromStr for RelayAddress {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RelayAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
