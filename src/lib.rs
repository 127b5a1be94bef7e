//! A Rust library for discovering and tracking the device's network attachment.
//!
//! This crate provides an async connection store that keeps a small, always
//! current picture of how the device is attached to the network:
//!
//! - Querying a network-status provider for the active attachment
//! - Resolving late-arriving addresses with a bounded retry/backoff procedure
//! - Merging fresh readings with manually added connection entries
//! - Driving periodic refreshes on a fixed interval
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use connrs::{ConnectionStore, ExternalIpLookup, NmStatusProvider};
//!
//! # async fn example() -> connrs::Result<()> {
//! let provider = Arc::new(NmStatusProvider::new().await?);
//! let lookup = Arc::new(ExternalIpLookup::new(provider.clone())?);
//! let store = ConnectionStore::new(provider, lookup);
//!
//! store.refresh().await;
//! for conn in store.connections() {
//!     println!("{} {}", conn.connection_type, conn.address);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Synchronous operations return `Result<T, StoreError>` with specific
//! variants for invalid manual entries and out-of-range removals. Provider
//! failures during a refresh are never propagated: they are recorded in the
//! store's `error` field and the store stays usable.
//!
//! # Background Address Resolution
//!
//! Some attachment types (notably externally-bridged Ethernet) do not report
//! an address on the first query. Rather than blocking the refresh, the store
//! spawns a bounded background task that re-queries the provider with
//! exponential backoff and falls back to an external reachability probe,
//! writing the address into the matching record once it appears.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`.

// Internal implementation modules
mod address_lookup;
mod constants;
mod network_status;
mod proxies;
mod resolve;
mod utils;

// Public API modules
pub mod models;
pub mod provider;
pub mod store;

// Re-exported public API
pub use address_lookup::ExternalIpLookup;
pub use models::{Address, AddressHints, Connection, ConnectionType, NetworkStatus, StatusDetails, StoreError};
pub use network_status::NmStatusProvider;
pub use provider::{AddressLookup, StatusProvider};
pub use resolve::ResolveOutcome;
pub use store::{ConnectionStore, StoreSnapshot};

/// A specialized `Result` type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
