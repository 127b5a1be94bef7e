//! Constants for retry bounds, timing, and NetworkManager D-Bus values.

/// Placeholder address values that never count as a real address.
pub mod placeholders {
    /// The all-zero address returned by failed lookups.
    pub const ZERO_ADDRESS: &str = "0.0.0.0";

    /// Markers some providers report instead of omitting the field.
    pub const UNKNOWN: &str = "Unknown";
    pub const NOT_AVAILABLE: &str = "Not available";
}

/// Retry count constants.
pub mod retries {
    /// Maximum address-resolution attempts per invocation.
    pub const RESOLVE_MAX_ATTEMPTS: u32 = 3;
}

/// Timeout and delay constants (in milliseconds unless noted).
pub mod timeouts {
    use std::time::Duration;

    /// Base unit of the exponential backoff between resolution attempts.
    pub const BACKOFF_BASE_MS: u64 = 1000;

    /// How long the external-IP lookup may run before degrading.
    pub const LOOKUP_TIMEOUT_SECS: u64 = 3;

    /// Interval of the periodic refresh loop.
    pub const REFRESH_INTERVAL_SECS: u64 = 5;

    /// Backoff delay after the given attempt: `1000ms * 2^attempt`.
    pub fn backoff_after(attempt: u32) -> Duration {
        Duration::from_millis(BACKOFF_BASE_MS * 2u64.pow(attempt))
    }

    pub fn lookup_timeout() -> Duration {
        Duration::from_secs(LOOKUP_TIMEOUT_SECS)
    }

    pub fn refresh_interval() -> Duration {
        Duration::from_secs(REFRESH_INTERVAL_SECS)
    }
}

/// NetworkManager global state constants.
pub mod nm_state {
    /// Local connectivity only (no gateway).
    pub const CONNECTED_LOCAL: u32 = 50;
    // pub const CONNECTED_SITE: u32 = 60;
    // pub const CONNECTED_GLOBAL: u32 = 70;
}

/// NetworkManager connection type strings, as reported by the
/// `PrimaryConnectionType` property.
pub mod nm_type {
    pub const WIRELESS: &str = "802-11-wireless";
    pub const WIRED: &str = "802-3-ethernet";
    pub const GSM: &str = "gsm";
    pub const CDMA: &str = "cdma";
    pub const BLUETOOTH: &str = "bluetooth";
    pub const VPN: &str = "vpn";
    pub const WIREGUARD: &str = "wireguard";
}
