//! Cache configuration.
//!
//! The expansion cache is bounded by exactly one of a byte-size limit
//! (weighed over the serialized result) or an entry-count limit, and
//! every entry expires a fixed duration after write. The pair of
//! optional limits is validated once at construction; the engine never
//! sees a half-configured cache.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{WeftError, WeftResult};

/// Capacity bound for the expansion cache. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBound {
    /// Total serialized size of all cached results, in bytes.
    Bytes(u64),
    /// Number of cached results.
    Entries(usize),
}

/// Configuration for the expansion cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// When false, lookups always miss and store/invalidate are no-ops.
    pub enabled: bool,
    /// Entries expire this long after write, regardless of the bound.
    pub ttl: Duration,
    /// The single configured capacity bound.
    pub bound: CacheBound,
}

impl CacheConfig {
    /// Default time-to-live after write.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60);
    /// Default entry-count bound.
    pub const DEFAULT_MAX_ENTRIES: usize = 1024;

    /// Build a config from the raw optional limits, enforcing that
    /// exactly one of `max_bytes` / `max_entries` is set.
    pub fn from_limits(
        enabled: bool,
        ttl: Duration,
        max_bytes: Option<u64>,
        max_entries: Option<usize>,
    ) -> WeftResult<Self> {
        let bound = match (max_bytes, max_entries) {
            (Some(bytes), None) => CacheBound::Bytes(bytes),
            (None, Some(entries)) => CacheBound::Entries(entries),
            (Some(_), Some(_)) => {
                return Err(WeftError::config(
                    "cache bound: set max_bytes or max_entries, not both",
                ))
            }
            (None, None) => {
                return Err(WeftError::config(
                    "cache bound: one of max_bytes or max_entries is required",
                ))
            }
        };
        Ok(Self {
            enabled,
            ttl,
            bound,
        })
    }

    /// A disabled cache; lookups always miss.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ttl: Self::DEFAULT_TTL,
            bound: CacheBound::Entries(Self::DEFAULT_MAX_ENTRIES),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Self::DEFAULT_TTL,
            bound: CacheBound::Entries(Self::DEFAULT_MAX_ENTRIES),
        }
    }
}
