//! External reachability probe used as a fallback address source.
//!
//! When the provider keeps reporting an attachment without an address, the
//! resolution procedure asks this lookup for a candidate. It fetches the
//! device's external IP from a public endpoint and attributes it to whichever
//! wired/wireless slot is currently attached. The external IP is not the
//! interface address, but it proves reachability and gives the display layer
//! something real to show.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use tokio::time::timeout;

use crate::Result;
use crate::constants::timeouts;
use crate::models::{AddressHints, ConnectionType};
use crate::provider::{AddressLookup, StatusProvider};

const IP_ENDPOINT: &str = "https://api.ipify.org?format=json";

#[derive(Deserialize)]
struct IpifyResponse {
    ip: String,
}

/// [`AddressLookup`] implementation backed by `api.ipify.org`.
///
/// Degrades to placeholder hints on any failure or once the
/// [`lookup_timeout`](crate::constants::timeouts::lookup_timeout) expires.
pub struct ExternalIpLookup {
    client: reqwest::Client,
    provider: Arc<dyn StatusProvider>,
}

impl ExternalIpLookup {
    /// Creates a lookup that attributes results via the given provider.
    pub fn new(provider: Arc<dyn StatusProvider>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts::LOOKUP_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, provider })
    }

    async fn probe(&self) -> Result<AddressHints> {
        let response = self.client.get(IP_ENDPOINT).send().await?;
        let body: IpifyResponse = serde_json::from_slice(&response.bytes().await?)?;

        // Attribute the external IP to the slot of the current attachment;
        // other slots keep the placeholder.
        let mut hints = AddressHints::default();
        match self.provider.query().await?.connection_type() {
            ConnectionType::Ethernet => hints.ethernet = body.ip,
            ConnectionType::WiFi => hints.wifi = body.ip,
            other => debug!("external IP not attributable to {other}"),
        }
        Ok(hints)
    }
}

#[async_trait]
impl AddressLookup for ExternalIpLookup {
    async fn lookup(&self) -> AddressHints {
        match timeout(timeouts::lookup_timeout(), self.probe()).await {
            Ok(Ok(hints)) => hints,
            Ok(Err(e)) => {
                debug!("external IP lookup failed: {e}");
                AddressHints::default()
            }
            Err(_) => {
                debug!(
                    "external IP lookup timed out after {:?}",
                    timeouts::lookup_timeout()
                );
                AddressHints::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipify_body_parses() {
        let body: IpifyResponse =
            serde_json::from_slice(br#"{"ip":"203.0.113.7"}"#).expect("valid body");
        assert_eq!(body.ip, "203.0.113.7");
    }

    #[test]
    fn malformed_ipify_body_is_an_error() {
        assert!(serde_json::from_slice::<IpifyResponse>(b"not json").is_err());
    }
}
