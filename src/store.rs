//! The connection store: discovery, reconciliation, and manual bookkeeping.
//!
//! A single [`ConnectionStore`] instance is shared for the lifetime of the
//! process. The display layer holds clones of it, reads snapshots, and
//! invokes [`refresh`](ConnectionStore::refresh) on mount and on a fixed
//! interval; it never mutates state directly.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::Result;
use crate::constants::timeouts;
use crate::models::{Address, Connection, ConnectionType, StoreError};
use crate::provider::{AddressLookup, StatusProvider};
use crate::resolve::{self, ResolveOutcome};

/// Shared mutable state owned by the store.
///
/// All mutation is read-compute-install whole-state replacement inside a
/// short critical section; no lock is ever held across an await.
pub(crate) struct StoreState {
    pub(crate) connections: Vec<Connection>,
    pub(crate) is_loading: bool,
    pub(crate) error: Option<String>,
}

/// Value snapshot of the store's readable fields.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSnapshot {
    /// Active connection first, then retained manual entries.
    pub connections: Vec<Connection>,
    /// Whether a refresh is currently in flight.
    pub is_loading: bool,
    /// Last refresh error, if the most recent provider query failed.
    pub error: Option<String>,
}

/// Whether a pre-existing entry survives the merge against a newly derived
/// connection. Manual entries are kept only when their type cannot overlap
/// a live reading: not WiFi, not Ethernet, not the derived type, and not
/// themselves active.
fn survives_merge(conn: &Connection, derived_type: ConnectionType) -> bool {
    conn.connection_type != ConnectionType::WiFi
        && conn.connection_type != ConnectionType::Ethernet
        && conn.connection_type != derived_type
        && !conn.is_active
}

/// Store of known connections, kept fresh by polling a status provider.
///
/// Cloning is cheap and all clones observe the same state.
#[derive(Clone)]
pub struct ConnectionStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: Arc<Mutex<StoreState>>,
    provider: Arc<dyn StatusProvider>,
    lookup: Arc<dyn AddressLookup>,
    // Handle of the most recently spawned resolution task. Replacing it
    // detaches (not cancels) the previous task; its type-matched patch
    // writes stay harmless against a replaced list.
    resolver: Mutex<Option<JoinHandle<ResolveOutcome>>>,
}

impl ConnectionStore {
    /// Creates an empty store over the given provider and fallback lookup.
    pub fn new(provider: Arc<dyn StatusProvider>, lookup: Arc<dyn AddressLookup>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Arc::new(Mutex::new(StoreState {
                    connections: Vec::new(),
                    is_loading: false,
                    error: None,
                })),
                provider,
                lookup,
                resolver: Mutex::new(None),
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Returns a value snapshot of the readable fields.
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.lock_state();
        StoreSnapshot {
            connections: state.connections.clone(),
            is_loading: state.is_loading,
            error: state.error.clone(),
        }
    }

    /// Current connection list, active record first.
    pub fn connections(&self) -> Vec<Connection> {
        self.lock_state().connections.clone()
    }

    /// Whether a refresh is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.lock_state().is_loading
    }

    /// Last refresh error message, if any.
    pub fn error(&self) -> Option<String> {
        self.lock_state().error.clone()
    }

    /// Synchronizes the store with the provider.
    ///
    /// A no-op while another refresh is in flight. Provider failures are
    /// recorded in the `error` field, never propagated; the connection list
    /// is left unchanged in that case. When the active attachment's address
    /// is not immediately available, a background resolution procedure is
    /// spawned and the record carries [`Address::Detecting`] until it
    /// resolves or the next refresh re-derives it.
    pub async fn refresh(&self) {
        {
            let mut state = self.lock_state();
            if state.is_loading {
                debug!("refresh already in flight, skipping");
                return;
            }
            state.is_loading = true;
            state.error = None;
        }

        let status = match self.inner.provider.query().await {
            Ok(status) => status,
            Err(e) => {
                warn!("failed to fetch network status: {e}");
                let mut state = self.lock_state();
                state.error = Some(format!("network status error: {e}"));
                state.is_loading = false;
                return;
            }
        };

        let derived_type = status.connection_type();
        let derived = if status.is_connected {
            let address = match derived_type {
                ConnectionType::Ethernet | ConnectionType::WiFi => status
                    .validated_address()
                    .map(|a| Address::Resolved(a.to_string()))
                    .unwrap_or(Address::Detecting),
                _ => Address::Detecting,
            };
            Connection {
                connection_type: derived_type,
                address,
                is_active: true,
            }
        } else {
            Connection {
                connection_type: derived_type,
                address: Address::NotConnected,
                is_active: false,
            }
        };
        let needs_resolution = status.is_connected && derived.address == Address::Detecting;

        // Merge: the fresh reading supersedes any stale live reading of the
        // same or overlapping type; distinct manual entries are retained.
        {
            let mut state = self.lock_state();
            let mut next = Vec::with_capacity(state.connections.len() + 1);
            next.push(derived);
            next.extend(
                state
                    .connections
                    .iter()
                    .filter(|c| survives_merge(c, derived_type))
                    .cloned(),
            );
            state.connections = next;
            state.is_loading = false;
            state.error = None;
        }

        if needs_resolution {
            self.spawn_resolution(derived_type);
        }
    }

    fn spawn_resolution(&self, target: ConnectionType) {
        debug!("spawning address resolution for {target}");
        let handle = tokio::spawn(resolve::run(
            Arc::clone(&self.inner.state),
            Arc::clone(&self.inner.provider),
            Arc::clone(&self.inner.lookup),
            target,
        ));
        let mut resolver = match self.inner.resolver.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *resolver = Some(handle);
    }

    /// Appends a manual, inactive entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] when the type is
    /// [`ConnectionType::Unknown`] or the address is not a non-empty
    /// resolved string. Entries are not deduplicated; callers relying on
    /// uniqueness must check first.
    pub fn add_connection(&self, connection: Connection) -> Result<()> {
        if connection.connection_type == ConnectionType::Unknown {
            return Err(StoreError::InvalidInput(
                "manual connection needs a concrete type".into(),
            ));
        }
        match connection.address.resolved() {
            Some(addr) if !addr.is_empty() => {}
            _ => {
                return Err(StoreError::InvalidInput(
                    "manual connection needs a non-empty address".into(),
                ));
            }
        }

        let mut state = self.lock_state();
        state.connections.push(Connection {
            is_active: false,
            ..connection
        });
        state.error = None;
        Ok(())
    }

    /// Removes the entry at `index`.
    ///
    /// The check runs against whatever the list is at execution time, not a
    /// caller-side snapshot; an in-flight refresh may have replaced it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfRange`] when `index` is not within the
    /// current bounds.
    pub fn remove_connection(&self, index: usize) -> Result<()> {
        let mut state = self.lock_state();
        let len = state.connections.len();
        if index >= len {
            return Err(StoreError::OutOfRange { index, len });
        }
        state.connections.remove(index);
        state.error = None;
        Ok(())
    }

    /// Drives `refresh()` immediately and then on a fixed 5-second interval.
    ///
    /// Returns the task handle; abort it on teardown to stop polling.
    pub fn spawn_refresh_loop(&self) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(timeouts::refresh_interval());
            loop {
                ticker.tick().await;
                store.refresh().await;
            }
        })
    }

    /// Aborts the most recently spawned resolution task, if any.
    pub fn cancel_resolution(&self) {
        let handle = match self.inner.resolver.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    /// Waits for the most recently spawned resolution task to finish.
    ///
    /// Returns `None` when no task was spawned or it was aborted.
    pub async fn join_resolution(&self) -> Option<ResolveOutcome> {
        let handle = match self.inner.resolver.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match handle {
            Some(handle) => handle.await.ok(),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual(connection_type: ConnectionType) -> Connection {
        Connection::manual(connection_type, "10.0.0.9")
    }

    #[test]
    fn merge_drops_overlapping_and_active_entries() {
        // Live-reading types never survive, whatever the derived type is.
        assert!(!survives_merge(&manual(ConnectionType::WiFi), ConnectionType::Cellular));
        assert!(!survives_merge(&manual(ConnectionType::Ethernet), ConnectionType::Cellular));

        // Same type as the fresh derivation is superseded.
        assert!(!survives_merge(&manual(ConnectionType::Cellular), ConnectionType::Cellular));

        // A stale active record is always replaced.
        let stale = Connection {
            is_active: true,
            ..manual(ConnectionType::Vpn)
        };
        assert!(!survives_merge(&stale, ConnectionType::WiFi));
    }

    #[test]
    fn merge_retains_distinct_manual_entries() {
        assert!(survives_merge(&manual(ConnectionType::Bluetooth), ConnectionType::WiFi));
        assert!(survives_merge(&manual(ConnectionType::Vpn), ConnectionType::Ethernet));
        assert!(survives_merge(&manual(ConnectionType::Cellular), ConnectionType::WiFi));
    }
}
