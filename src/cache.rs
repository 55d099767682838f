//! In-memory cache for the device list
//!
//! Holds at most one snapshot of the device list together with its expiry
//! timestamp. The freshness decision lives here; callers pass `now` in, so
//! the cache never reads the clock itself and stays deterministic in tests.

use chrono::{DateTime, Duration, Utc};

use crate::device::DeviceList;

/// A cached snapshot of the device list with its expiry timestamp
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The cached device list
    data: DeviceList,
    /// Instant after which the snapshot must no longer be served
    expires_at: DateTime<Utc>,
}

/// Single-slot cache for the device list
///
/// Starts empty; an empty cache is never fresh. A snapshot is replaced
/// wholesale on every successful refresh and never mutated in place.
#[derive(Debug, Default)]
pub struct DeviceListCache {
    entry: Option<CacheEntry>,
}

impl DeviceListCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self { entry: None }
    }

    /// Returns true if a snapshot is present and has not expired at `now`
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|entry| entry.expires_at > now)
    }

    /// Returns the cached device list if it is still fresh at `now`
    ///
    /// Folds the freshness check and the read into one step so callers
    /// cannot observe a stale snapshot by mistake.
    pub fn get_if_fresh(&self, now: DateTime<Utc>) -> Option<&DeviceList> {
        self.entry
            .as_ref()
            .filter(|entry| entry.expires_at > now)
            .map(|entry| &entry.data)
    }

    /// Replaces the cached snapshot, expiring `ttl_secs` seconds after `now`
    ///
    /// This is the only mutation path.
    pub fn store(&mut self, data: DeviceList, now: DateTime<Utc>, ttl_secs: u64) {
        self.entry = Some(CacheEntry {
            data,
            expires_at: now + Duration::seconds(ttl_secs as i64),
        });
    }

    /// Test hook: marks any stored snapshot as already expired
    #[cfg(test)]
    pub(crate) fn force_expire(&mut self) {
        if let Some(entry) = &mut self.entry {
            entry.expires_at = Utc::now() - Duration::seconds(1);
        }
    }
}
