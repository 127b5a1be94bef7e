//! Small helpers shared across the store and resolution code.

use crate::constants::placeholders;

/// Whether an address string counts as a real, usable address.
///
/// Rejects `None`, the empty string, and the known placeholder values a
/// provider may report before the address is actually assigned.
pub(crate) fn is_valid_address(address: Option<&str>) -> bool {
    match address {
        Some(addr) => {
            !addr.is_empty()
                && addr != placeholders::ZERO_ADDRESS
                && addr != placeholders::UNKNOWN
                && addr != placeholders::NOT_AVAILABLE
        }
        None => false,
    }
}
