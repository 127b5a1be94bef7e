//! Trait seams for the external collaborators the store consumes.
//!
//! The store never talks to NetworkManager or the network directly; it goes
//! through these two narrow interfaces so tests (and other platforms) can
//! substitute their own implementations.

use async_trait::async_trait;

use crate::Result;
use crate::models::{AddressHints, NetworkStatus};

/// Point-in-time network status source.
///
/// A single query operation, no streaming or subscription semantics. The
/// bundled production implementation is
/// [`NmStatusProvider`](crate::NmStatusProvider).
#[async_trait]
pub trait StatusProvider: Send + Sync {
    /// Returns a fresh snapshot of the device's current attachment.
    async fn query(&self) -> Result<NetworkStatus>;
}

/// Best-effort secondary address source.
///
/// Consulted by the background resolution procedure when the provider keeps
/// reporting an attachment without an address. Implementations must not
/// fail: on any error or timeout they return default (placeholder) hints.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// Returns candidate addresses per attachment type.
    async fn lookup(&self) -> AddressHints;
}
