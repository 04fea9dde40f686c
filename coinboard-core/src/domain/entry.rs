//! MarketEntry — one asset's market snapshot as delivered by the provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the markets listing.
///
/// Field names match the provider's JSON so the listing decodes directly.
/// Numeric values are carried through exactly as decoded; nothing in the core
/// rounds or rescales them. The sequence of entries is replaced wholesale on
/// every refresh, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(deserialize_with = "null_as_zero")]
    pub current_price: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub total_volume: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub market_cap: f64,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub high_24h: Option<f64>,
    #[serde(default)]
    pub low_24h: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl MarketEntry {
    /// Minimal constructor for the required fields; optional fields start empty.
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        current_price: f64,
        total_volume: f64,
        market_cap: f64,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            current_price,
            total_volume,
            market_cap,
            price_change_percentage_24h: None,
            market_cap_rank: None,
            high_24h: None,
            low_24h: None,
            last_updated: None,
        }
    }

    /// Symbol as shown on cards (`btc` → `BTC`).
    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }
}

/// The provider sends `null` for price, volume, or cap on thinly traded assets.
/// Those decode as zero so a single odd row cannot fail the whole listing;
/// a missing field is still a decode error.
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}
