use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

use crate::constants::placeholders;

/// Category of network interface currently reporting connectivity.
///
/// This is the only discriminator used for merging and display. Raw type
/// labels from the provider are mapped onto this closed set; anything
/// unrecognized becomes `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionType {
    /// Mobile data attachment.
    Cellular,
    /// Wireless LAN attachment.
    WiFi,
    /// Wired attachment, including externally-bridged (USB) adapters.
    Ethernet,
    /// Bluetooth tethering.
    Bluetooth,
    /// Virtual private network tunnel.
    Vpn,
    /// Unrecognized or absent attachment type.
    Unknown,
}

impl ConnectionType {
    /// Maps a provider's raw type label onto the closed set.
    ///
    /// `"unknown"`, `"none"`, `"other"`, and any unrecognized label all map
    /// to `Unknown`.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "cellular" => Self::Cellular,
            "wifi" => Self::WiFi,
            "ethernet" => Self::Ethernet,
            "bluetooth" => Self::Bluetooth,
            "vpn" => Self::Vpn,
            _ => Self::Unknown,
        }
    }
}

impl Display for ConnectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cellular => write!(f, "Cellular"),
            Self::WiFi => write!(f, "WiFi"),
            Self::Ethernet => write!(f, "Ethernet"),
            Self::Bluetooth => write!(f, "Bluetooth"),
            Self::Vpn => write!(f, "VPN"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Address state of a connection record.
///
/// `Detecting` is shown while background resolution is pending;
/// `NotConnected` marks an inactive attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Address {
    /// A resolved, validated address string.
    Resolved(String),
    /// Resolution is pending; a background procedure may still fill this in.
    Detecting,
    /// The attachment is not active.
    NotConnected,
}

impl Address {
    /// Returns the resolved address string, if any.
    pub fn resolved(&self) -> Option<&str> {
        match self {
            Self::Resolved(addr) => Some(addr),
            _ => None,
        }
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolved(addr) => write!(f, "{addr}"),
            Self::Detecting => write!(f, "Detecting..."),
            Self::NotConnected => write!(f, "Not connected"),
        }
    }
}

/// One network attachment as currently known to the store.
///
/// At most one connection in the store is active at any time; manually
/// added connections are never active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Attachment category, the merge discriminator.
    pub connection_type: ConnectionType,
    /// Current address state.
    pub address: Address,
    /// Whether this record is the live attachment reported by the provider.
    pub is_active: bool,
}

impl Connection {
    /// Builds a manual, inactive entry with a resolved address.
    pub fn manual(connection_type: ConnectionType, address: impl Into<String>) -> Self {
        Self {
            connection_type,
            address: Address::Resolved(address.into()),
            is_active: false,
        }
    }
}

/// Point-in-time snapshot of the device's network status as reported by a
/// [`StatusProvider`](crate::provider::StatusProvider).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkStatus {
    /// Raw attachment type label (e.g. `"wifi"`, `"ethernet"`, `"none"`).
    pub raw_type: String,
    /// Whether the provider considers the device connected.
    pub is_connected: bool,
    /// Type-specific details, when the provider has any.
    pub details: Option<StatusDetails>,
}

impl NetworkStatus {
    /// The raw type mapped onto the closed label set.
    pub fn connection_type(&self) -> ConnectionType {
        ConnectionType::from_raw(&self.raw_type)
    }

    /// The detail address, if present and validated.
    pub fn validated_address(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.address.as_deref())
            .filter(|a| crate::utils::is_valid_address(Some(a)))
    }
}

/// Type-specific detail fields of a status snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusDetails {
    /// The assigned address, when the provider already knows it.
    pub address: Option<String>,
}

/// Candidate addresses from a secondary, provider-independent lookup.
///
/// Slots default to the `"0.0.0.0"` placeholder, which never validates, so
/// a failed or timed-out lookup degrades to "nothing found".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressHints {
    /// Candidate address for a wired attachment.
    pub ethernet: String,
    /// Candidate address for a wireless attachment.
    pub wifi: String,
}

impl Default for AddressHints {
    fn default() -> Self {
        Self {
            ethernet: placeholders::ZERO_ADDRESS.to_string(),
            wifi: placeholders::ZERO_ADDRESS.to_string(),
        }
    }
}

impl AddressHints {
    /// Returns the validated candidate for the given type, if there is one.
    ///
    /// Only Ethernet and WiFi have hint slots; other types always yield
    /// `None`.
    pub fn validated_for(&self, connection_type: ConnectionType) -> Option<&str> {
        let candidate = match connection_type {
            ConnectionType::Ethernet => &self.ethernet,
            ConnectionType::WiFi => &self.wifi,
            _ => return None,
        };
        crate::utils::is_valid_address(Some(candidate)).then_some(candidate.as_str())
    }
}

/// Errors produced by store operations and the bundled provider/lookup
/// implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A manual connection entry was malformed.
    #[error("invalid connection data: {0}")]
    InvalidInput(String),

    /// A removal index was outside the current list bounds.
    #[error("index {index} out of range for {len} connections")]
    OutOfRange { index: usize, len: usize },

    /// Querying the network-status provider failed.
    #[error("network status query failed: {0}")]
    Provider(String),

    /// A D-Bus communication error occurred.
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    /// An HTTP request to the external lookup endpoint failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The external lookup endpoint returned an unparseable body.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
