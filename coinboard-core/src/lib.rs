//! Coinboard Core — market data client, TTL result cache, view pipeline, refresh driver.
//!
//! The whole dashboard is one explicit pull-based pipeline:
//!
//! ```text
//! refresh tick ─▶ ResultCache::get ─▶ pipeline::project ─▶ DashboardView ─▶ presentation
//!                    │ (miss/expired)
//!                    ▼
//!              MarketDataProvider
//! ```
//!
//! - Domain types (market entries, currencies, sort fields, query params)
//! - Provider trait with a CoinGecko client and an offline fixture provider
//! - Result cache with injectable clock and stale-on-failure fallback
//! - Filter + stable sort projection and the derived chart series
//! - Refresh driver that never overlaps fetches
//! - TOML configuration and display formatting helpers

pub mod config;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod format;
pub mod pipeline;
pub mod refresh;

pub use config::{ConfigError, DashboardConfig};
pub use dashboard::Dashboard;
pub use data::{CacheLookup, DataError, Freshness, MarketDataProvider, ResultCache};
pub use domain::{Currency, FetchKey, MarketEntry, QueryParams, SortField};
pub use pipeline::{project, Card, DashboardView, ShareSlice};
pub use refresh::{RefreshDriver, TickDecision};
