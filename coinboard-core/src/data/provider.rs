//! Market data provider trait and structured error types.
//!
//! The `MarketDataProvider` trait abstracts over data sources (CoinGecko, a JSON
//! fixture) so the cache can be exercised against a mock in tests.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{FetchKey, MarketEntry};

/// Structured error types for data operations.
///
/// These are designed to be displayable in both CLI and TUI contexts.
/// An empty listing is not an error and has no variant here.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum DataError {
    /// Transport failure, timeout, or non-success HTTP status.
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not decode into the expected listing shape.
    #[error("unexpected response format: {0}")]
    Parse(String),
}

impl DataError {
    /// Short label for error history and log fields.
    pub fn category(&self) -> &'static str {
        match self {
            DataError::Network(_) => "network",
            DataError::Parse(_) => "parse",
        }
    }
}

/// Trait for market listing providers.
///
/// Implementations issue exactly one request per call and never retry.
/// The cache layer sits above this trait; providers don't know about it.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the top `key.count` assets by market cap in `key.currency`,
    /// in provider order (descending market cap).
    fn fetch_markets(&self, key: &FetchKey) -> Result<Vec<MarketEntry>, DataError>;
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_markets(&self, key: &FetchKey) -> Result<Vec<MarketEntry>, DataError> {
        (**self).fetch_markets(key)
    }
}
