//! NetworkManager-backed status provider.
//!
//! Queries the primary active connection over D-Bus and reduces it to the
//! narrow [`NetworkStatus`] snapshot the store consumes: attachment type,
//! connectivity flag, and the assigned IPv4 address when NM already knows it.

use async_trait::async_trait;
use log::debug;
use zbus::Connection;

use crate::Result;
use crate::constants::{nm_state, nm_type};
use crate::models::{NetworkStatus, StatusDetails};
use crate::provider::StatusProvider;
use crate::proxies::{NMActiveConnectionProxy, NMIp4ConfigProxy, NMProxy};

/// Reduces an NM connection type string to the raw label set the store maps.
fn raw_label(nm_connection_type: &str) -> &'static str {
    match nm_connection_type {
        nm_type::WIRELESS => "wifi",
        nm_type::WIRED => "ethernet",
        nm_type::GSM | nm_type::CDMA => "cellular",
        nm_type::BLUETOOTH => "bluetooth",
        nm_type::VPN | nm_type::WIREGUARD => "vpn",
        "" => "none",
        _ => "unknown",
    }
}

/// [`StatusProvider`] implementation backed by NetworkManager over D-Bus.
#[derive(Clone)]
pub struct NmStatusProvider {
    conn: Connection,
}

impl NmStatusProvider {
    /// Creates a provider connected to the system D-Bus.
    pub async fn new() -> Result<Self> {
        let conn = Connection::system().await?;
        Ok(Self { conn })
    }

    /// Returns the primary connection's IPv4 address, if NM has assigned one.
    async fn primary_address(&self, nm: &NMProxy<'_>) -> Result<Option<String>> {
        let primary = nm.primary_connection().await?;
        if primary.as_str() == "/" {
            return Ok(None);
        }

        let active = NMActiveConnectionProxy::builder(&self.conn)
            .path(primary)?
            .build()
            .await?;
        let ip4_path = active.ip4_config().await?;
        if ip4_path.as_str() == "/" {
            // Still configuring; the address will show up on a later query.
            return Ok(None);
        }

        let ip4 = NMIp4ConfigProxy::builder(&self.conn)
            .path(ip4_path)?
            .build()
            .await?;
        let address = ip4.address_data().await?.iter().find_map(|entry| {
            entry
                .get("address")
                .and_then(|v| v.downcast_ref::<&str>().ok())
                .map(str::to_string)
        });
        Ok(address)
    }
}

#[async_trait]
impl StatusProvider for NmStatusProvider {
    async fn query(&self) -> Result<NetworkStatus> {
        let nm = NMProxy::new(&self.conn).await?;

        let state = nm.state().await?;
        let is_connected = state >= nm_state::CONNECTED_LOCAL;
        let raw_type = raw_label(&nm.primary_connection_type().await?).to_string();

        // Address lookup failures are not fatal to the snapshot; the store's
        // resolution procedure will retry.
        let address = match self.primary_address(&nm).await {
            Ok(addr) => addr,
            Err(e) => {
                debug!("primary address lookup failed: {e}");
                None
            }
        };

        debug!("NM status: type={raw_type} connected={is_connected} address={address:?}");

        Ok(NetworkStatus {
            raw_type,
            is_connected,
            details: Some(StatusDetails { address }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nm_type_strings_reduce_to_raw_labels() {
        assert_eq!(raw_label("802-11-wireless"), "wifi");
        assert_eq!(raw_label("802-3-ethernet"), "ethernet");
        assert_eq!(raw_label("gsm"), "cellular");
        assert_eq!(raw_label("cdma"), "cellular");
        assert_eq!(raw_label("bluetooth"), "bluetooth");
        assert_eq!(raw_label("vpn"), "vpn");
        assert_eq!(raw_label("wireguard"), "vpn");
        assert_eq!(raw_label(""), "none");
        assert_eq!(raw_label("bridge"), "unknown");
    }
}
