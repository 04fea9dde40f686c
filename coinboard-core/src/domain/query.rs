//! User-selected query inputs and the cache/request key derived from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entry::MarketEntry;

/// Smallest result-set size the controls allow.
pub const MIN_COUNT: u32 = 5;
/// Largest result-set size the controls allow.
pub const MAX_COUNT: u32 = 20;
/// Result-set size used when nothing else is configured.
pub const DEFAULT_COUNT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("result count {count} is outside 5..=20")]
    CountOutOfRange { count: u32 },

    #[error("unknown currency '{0}' (expected one of: usd, eur, try, toman)")]
    UnknownCurrency(String),

    #[error("unknown sort field '{0}' (expected one of: market_cap, total_volume, current_price)")]
    UnknownSortField(String),
}

/// Display currency. Passed straight through to the provider; no local conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Try,
    Toman,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Eur, Currency::Try, Currency::Toman];

    /// Lowercase code sent as `vs_currency`.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Try => "try",
            Currency::Toman => "toman",
        }
    }

    /// Prefix used when formatting amounts.
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Try => "₺",
            Currency::Toman => "IRT ",
        }
    }

    pub fn next(self) -> Currency {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.code() == wanted)
            .ok_or_else(|| QueryError::UnknownCurrency(s.to_string()))
    }
}

/// Numeric field the ordered sequence is sorted by (always descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    MarketCap,
    TotalVolume,
    CurrentPrice,
}

impl SortField {
    pub const ALL: [SortField; 3] = [
        SortField::MarketCap,
        SortField::TotalVolume,
        SortField::CurrentPrice,
    ];

    /// Field name as it appears in the provider payload.
    pub fn api_name(self) -> &'static str {
        match self {
            SortField::MarketCap => "market_cap",
            SortField::TotalVolume => "total_volume",
            SortField::CurrentPrice => "current_price",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortField::MarketCap => "Market Cap",
            SortField::TotalVolume => "24h Volume",
            SortField::CurrentPrice => "Price",
        }
    }

    /// The raw value of this field on an entry.
    pub fn value(self, entry: &MarketEntry) -> f64 {
        match self {
            SortField::MarketCap => entry.market_cap,
            SortField::TotalVolume => entry.total_volume,
            SortField::CurrentPrice => entry.current_price,
        }
    }

    pub fn next(self) -> SortField {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.api_name() == wanted)
            .ok_or_else(|| QueryError::UnknownSortField(s.to_string()))
    }
}

/// The part of the query that reaches the provider, and therefore keys the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchKey {
    pub currency: Currency,
    pub count: u32,
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/top{}", self.currency, self.count)
    }
}

/// Everything the user controls: what to fetch, plus how to filter and order it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub currency: Currency,
    pub count: u32,
    pub sort_field: SortField,
    #[serde(default)]
    pub filter: String,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            currency: Currency::Usd,
            count: DEFAULT_COUNT,
            sort_field: SortField::MarketCap,
            filter: String::new(),
        }
    }
}

impl QueryParams {
    /// Build params, rejecting a count outside the allowed range.
    pub fn new(
        currency: Currency,
        count: u32,
        sort_field: SortField,
        filter: impl Into<String>,
    ) -> Result<Self, QueryError> {
        if !(MIN_COUNT..=MAX_COUNT).contains(&count) {
            return Err(QueryError::CountOutOfRange { count });
        }
        Ok(Self {
            currency,
            count,
            sort_field,
            filter: filter.into(),
        })
    }

    /// Same params with `count` clamped into the allowed range.
    pub fn with_count_clamped(mut self, count: u32) -> Self {
        self.count = count.clamp(MIN_COUNT, MAX_COUNT);
        self
    }

    /// Cache key / request parameters. Filter and sort are deliberately absent.
    pub fn fetch_key(&self) -> FetchKey {
        FetchKey {
            currency: self.currency,
            count: self.count,
        }
    }
}
