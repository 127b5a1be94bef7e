//! D-Bus proxy traits for the NetworkManager interfaces this crate reads.
//!
//! The `zbus::proxy` macro generates proxy implementations that handle
//! D-Bus communication automatically. Only the properties needed to answer
//! "what is the primary attachment and what address does it have" are
//! declared here.
//!
//! # NetworkManager D-Bus Structure
//!
//! - `/org/freedesktop/NetworkManager` - Main NM object
//! - `/org/freedesktop/NetworkManager/ActiveConnection/*` - Active connections
//! - `/org/freedesktop/NetworkManager/IP4Config/*` - IPv4 configuration

use std::collections::HashMap;
use zbus::{Result, proxy};
use zvariant::{OwnedObjectPath, OwnedValue};

/// Proxy for the main NetworkManager interface.
///
/// Provides the primary connection and the global connectivity state.
#[proxy(
    interface = "org.freedesktop.NetworkManager",
    default_service = "org.freedesktop.NetworkManager",
    default_path = "/org/freedesktop/NetworkManager"
)]
pub trait NM {
    /// Path to the primary active connection ("/" if none).
    #[zbus(property)]
    fn primary_connection(&self) -> Result<OwnedObjectPath>;

    /// Connection type of the primary connection (e.g. "802-11-wireless").
    /// Empty string when there is no primary connection.
    #[zbus(property)]
    fn primary_connection_type(&self) -> Result<String>;

    /// Global NM state (50/60/70 = local/site/global connectivity).
    #[zbus(property)]
    fn state(&self) -> Result<u32>;
}

/// Proxy for an active connection object.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Connection.Active",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMActiveConnection {
    /// Path to the IPv4 configuration ("/" while still configuring).
    #[zbus(property)]
    fn ip4_config(&self) -> Result<OwnedObjectPath>;
}

/// Proxy for an IPv4 configuration object.
#[proxy(
    interface = "org.freedesktop.NetworkManager.IP4Config",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMIp4Config {
    /// Assigned addresses as dictionaries with "address" and "prefix" keys.
    #[zbus(property)]
    fn address_data(&self) -> Result<Vec<HashMap<String, OwnedValue>>>;
}
