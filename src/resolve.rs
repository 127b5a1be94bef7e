//! Background address resolution with bounded retry and backoff.
//!
//! Addresses for some attachment types (notably externally-bridged Ethernet)
//! are not present on the first provider query. Instead of blocking the
//! refresh, the store spawns this procedure: it re-queries the provider with
//! exponential backoff, falls back to the secondary address lookup, and
//! writes a validated address into the matching connection record once one
//! appears. It never propagates a failure past its boundary.

use std::sync::{Arc, Mutex};

use log::{debug, warn};
use tokio::time::sleep;

use crate::constants::{retries, timeouts};
use crate::models::{Address, ConnectionType};
use crate::provider::{AddressLookup, StatusProvider};
use crate::store::StoreState;

/// Terminal result of one resolution invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// A validated address was found and patched into the store.
    Resolved,
    /// All attempts were exhausted; the record keeps its detecting marker
    /// until the next regular refresh re-derives it.
    GaveUp,
}

/// Progress of the resolution state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolveState {
    Attempting(u32),
    Resolved,
    GaveUp,
}

/// Runs the full resolution procedure for one attachment type.
///
/// At most [`retries::RESOLVE_MAX_ATTEMPTS`] attempts; between attempts the
/// task sleeps `1000ms * 2^attempt`. Every lookup failure counts as "not yet
/// resolved" for that attempt.
pub(crate) async fn run(
    state: Arc<Mutex<StoreState>>,
    provider: Arc<dyn StatusProvider>,
    lookup: Arc<dyn AddressLookup>,
    target: ConnectionType,
) -> ResolveOutcome {
    let mut machine = ResolveState::Attempting(1);
    loop {
        match machine {
            ResolveState::Attempting(attempt) => {
                debug!(
                    "resolving {target} address, attempt {attempt}/{}",
                    retries::RESOLVE_MAX_ATTEMPTS
                );

                if let Some(addr) = query_provider(&provider, target).await {
                    patch_address(&state, target, addr);
                    machine = ResolveState::Resolved;
                } else if attempt >= retries::RESOLVE_MAX_ATTEMPTS {
                    machine = ResolveState::GaveUp;
                } else if let Some(addr) = query_fallback(&lookup, target).await {
                    patch_address(&state, target, addr);
                    machine = ResolveState::Resolved;
                } else {
                    sleep(timeouts::backoff_after(attempt)).await;
                    machine = ResolveState::Attempting(attempt + 1);
                }
            }
            ResolveState::Resolved => {
                debug!("{target} address resolved");
                return ResolveOutcome::Resolved;
            }
            ResolveState::GaveUp => {
                warn!(
                    "{target} address unresolved after {} attempts",
                    retries::RESOLVE_MAX_ATTEMPTS
                );
                return ResolveOutcome::GaveUp;
            }
        }
    }
}

/// Re-queries the provider; a validated address for the same attachment type
/// counts as resolved. Query failures count as "not yet resolved".
async fn query_provider(
    provider: &Arc<dyn StatusProvider>,
    target: ConnectionType,
) -> Option<String> {
    match provider.query().await {
        Ok(status) if status.connection_type() == target => {
            status.validated_address().map(str::to_string)
        }
        Ok(status) => {
            debug!(
                "attachment changed to {} while resolving {target}",
                status.connection_type()
            );
            None
        }
        Err(e) => {
            debug!("provider query failed while resolving {target}: {e}");
            None
        }
    }
}

/// Consults the secondary lookup for a validated candidate of the target type.
async fn query_fallback(
    lookup: &Arc<dyn AddressLookup>,
    target: ConnectionType,
) -> Option<String> {
    lookup
        .lookup()
        .await
        .validated_for(target)
        .map(str::to_string)
}

/// Writes the address into the record of the target type, if one still
/// exists. The list may have been replaced since the procedure launched, so
/// the match is by type, never by index; with no match the patch is dropped.
fn patch_address(state: &Arc<Mutex<StoreState>>, target: ConnectionType, address: String) {
    let mut guard = match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    match guard
        .connections
        .iter_mut()
        .find(|c| c.connection_type == target)
    {
        Some(conn) => conn.address = Address::Resolved(address),
        None => debug!("no {target} record remains, dropping resolved address"),
    }
}
