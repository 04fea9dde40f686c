//! In-memory result cache with a time-to-live.
//!
//! Keyed by `FetchKey` (currency + count). Expiry is checked lazily on `get`;
//! there is no background refresh. When a refetch fails and an earlier result
//! exists for the key, that result is served and flagged stale instead of
//! surfacing the error. Only a cold-start failure reaches the caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::clock::{elapsed_between, Clock};
use super::provider::{DataError, MarketDataProvider};
use crate::domain::{FetchKey, MarketEntry};

/// Default time-to-live for a cached listing.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// One stored listing and when it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub entries: Arc<[MarketEntry]>,
    pub fetched_at: DateTime<Utc>,
}

/// How a lookup was satisfied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Freshness {
    /// Fetched from the provider during this lookup.
    Fresh,
    /// Served from cache within TTL, no network call.
    Cached,
    /// Refetch failed; the last good listing is served past its TTL.
    Stale { error: DataError },
}

/// Result of a cache lookup.
#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub key: FetchKey,
    pub entries: Arc<[MarketEntry]>,
    pub fetched_at: DateTime<Utc>,
    pub freshness: Freshness,
}

impl CacheLookup {
    pub fn is_stale(&self) -> bool {
        matches!(self.freshness, Freshness::Stale { .. })
    }
}

/// TTL cache in front of a `MarketDataProvider`.
pub struct ResultCache<P, C> {
    provider: P,
    clock: C,
    ttl: Duration,
    entries: HashMap<FetchKey, CacheEntry>,
}

impl<P: MarketDataProvider, C: Clock> ResultCache<P, C> {
    pub fn new(provider: P, clock: C, ttl: Duration) -> Self {
        Self {
            provider,
            clock,
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Listing for `key`: cached within TTL, otherwise refetched.
    pub fn get(&mut self, key: &FetchKey) -> Result<CacheLookup, DataError> {
        let now = self.clock.now();
        if let Some(entry) = self.entries.get(key) {
            if !self.is_expired(entry, now) {
                debug!(key = %key, age_ms = elapsed_between(entry.fetched_at, now).as_millis() as u64, "cache hit");
                return Ok(CacheLookup {
                    key: *key,
                    entries: Arc::clone(&entry.entries),
                    fetched_at: entry.fetched_at,
                    freshness: Freshness::Cached,
                });
            }
            debug!(key = %key, "cache entry expired");
        }
        self.fetch(key)
    }

    /// Refetch `key` regardless of age. A failure still falls back to the
    /// previous listing if there is one.
    pub fn refresh(&mut self, key: &FetchKey) -> Result<CacheLookup, DataError> {
        self.fetch(key)
    }

    fn fetch(&mut self, key: &FetchKey) -> Result<CacheLookup, DataError> {
        // Stamped at request start, matching how the refresh driver times ticks.
        let fetched_at = self.clock.now();
        info!(key = %key, provider = self.provider.name(), "fetching markets");
        match self.provider.fetch_markets(key) {
            Ok(listing) => {
                let entries: Arc<[MarketEntry]> = listing.into();
                self.entries.insert(
                    *key,
                    CacheEntry {
                        entries: Arc::clone(&entries),
                        fetched_at,
                    },
                );
                Ok(CacheLookup {
                    key: *key,
                    entries,
                    fetched_at,
                    freshness: Freshness::Fresh,
                })
            }
            Err(error) => match self.entries.get(key) {
                Some(prior) => {
                    warn!(key = %key, %error, fetched_at = %prior.fetched_at, "fetch failed, serving stale listing");
                    Ok(CacheLookup {
                        key: *key,
                        entries: Arc::clone(&prior.entries),
                        fetched_at: prior.fetched_at,
                        freshness: Freshness::Stale { error },
                    })
                }
                None => {
                    warn!(key = %key, %error, "fetch failed with nothing cached");
                    Err(error)
                }
            },
        }
    }

    fn is_expired(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        elapsed_between(entry.fetched_at, now) >= self.ttl
    }

    /// Drop the stored entry for `key`. Returns whether one existed.
    pub fn invalidate(&mut self, key: &FetchKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
