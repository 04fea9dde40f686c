//! Market data: provider trait, CoinGecko client, fixture provider, clock, TTL cache

pub mod cache;
pub mod clock;
pub mod coingecko;
pub mod fixture;
pub mod provider;

pub use cache::{CacheEntry, CacheLookup, Freshness, ResultCache, DEFAULT_TTL};
pub use clock::{Clock, ManualClock, SystemClock};
pub use coingecko::{parse_markets, CoinGeckoProvider, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use fixture::FixtureProvider;
pub use provider::{DataError, MarketDataProvider};
