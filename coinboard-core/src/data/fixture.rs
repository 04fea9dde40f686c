//! Offline provider serving a fixed markets listing.
//!
//! Used by `--fixture` runs and demos. The document has the same shape as the
//! live endpoint and goes through the same decoder, so a malformed fixture
//! fails exactly like a malformed response would.

use std::path::Path;

use tracing::debug;

use super::coingecko::parse_markets;
use super::provider::{DataError, MarketDataProvider};
use crate::domain::{FetchKey, MarketEntry};

/// Bundled sample listing (12 assets, USD).
const SAMPLE_MARKETS: &str = include_str!("../../fixtures/markets_usd.json");

/// Provider that answers every request from a fixed listing.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    entries: Vec<MarketEntry>,
}

impl FixtureProvider {
    pub fn new(entries: Vec<MarketEntry>) -> Self {
        Self { entries }
    }

    /// Decode a listing document.
    pub fn from_json(body: &str) -> Result<Self, DataError> {
        Ok(Self::new(parse_markets(body)?))
    }

    /// Read and decode a listing document from disk.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let body = std::fs::read_to_string(path).map_err(|e| {
            DataError::Network(format!("cannot read fixture {}: {e}", path.display()))
        })?;
        Self::from_json(&body)
    }

    /// The bundled sample listing.
    pub fn sample() -> Self {
        // The bundled document is covered by `sample_fixture_decodes`.
        Self::from_json(SAMPLE_MARKETS).unwrap_or_else(|_| Self::new(Vec::new()))
    }

    pub fn entries(&self) -> &[MarketEntry] {
        &self.entries
    }
}

impl MarketDataProvider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    /// Currency is ignored: the fixture carries one set of prices.
    fn fetch_markets(&self, key: &FetchKey) -> Result<Vec<MarketEntry>, DataError> {
        let take = key.count as usize;
        debug!(key = %key, available = self.entries.len(), "serving fixture listing");
        Ok(self.entries.iter().take(take).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Currency;

    #[test]
    fn sample_fixture_decodes() {
        let entries = parse_markets(SAMPLE_MARKETS).unwrap();
        assert_eq!(entries.len(), 12);
        assert_eq!(entries[0].id, "bitcoin");
        assert_eq!(FixtureProvider::sample().entries().len(), 12);
    }

    #[test]
    fn truncates_to_requested_count() {
        let provider = FixtureProvider::sample();
        let key = FetchKey {
            currency: Currency::Usd,
            count: 5,
        };
        let entries = provider.fetch_markets(&key).unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[4].id, "solana");
    }

    #[test]
    fn malformed_fixture_is_parse_error() {
        assert!(matches!(
            FixtureProvider::from_json("{}"),
            Err(DataError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = FixtureProvider::from_file(Path::new("/nonexistent/markets.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read fixture"));
    }
}
