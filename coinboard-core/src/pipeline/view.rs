//! The single ordered sequence every presentation renders from.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::project;
use crate::data::{CacheLookup, Freshness};
use crate::domain::{Currency, MarketEntry, QueryParams, SortField};
use crate::format;

/// One ranked card: raw numbers plus their display strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    /// 1-based position in the ordered sequence.
    pub rank: usize,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub change_pct_24h: Option<f64>,
    pub volume: f64,
    pub price_display: String,
    pub change_display: String,
    pub volume_display: String,
}

impl Card {
    fn from_entry(rank: usize, entry: &MarketEntry, currency: Currency) -> Self {
        Self {
            rank,
            name: entry.name.clone(),
            symbol: entry.display_symbol(),
            price: entry.current_price,
            change_pct_24h: entry.price_change_percentage_24h,
            volume: entry.total_volume,
            price_display: format::format_price(entry.current_price, currency),
            change_display: format::format_change_pct(entry.price_change_percentage_24h),
            volume_display: format::format_volume_billions(entry.total_volume, currency),
        }
    }
}

/// One slice of the volume share breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareSlice {
    pub name: String,
    pub volume: f64,
    /// Fraction of the summed volume, in `0.0..=1.0`.
    pub fraction: f64,
}

/// Output of one render pass.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub params: QueryParams,
    /// Filtered and sorted entries; the source of every derived series.
    pub entries: Vec<MarketEntry>,
    pub cards: Vec<Card>,
    /// Size of the listing before filtering.
    pub fetched_count: usize,
    pub fetched_at: DateTime<Utc>,
    pub freshness: Freshness,
}

impl DashboardView {
    /// Project a cache lookup through the user's filter and sort.
    pub fn build(lookup: &CacheLookup, params: &QueryParams) -> Self {
        let entries = project(&lookup.entries, &params.filter, params.sort_field);
        let cards = entries
            .iter()
            .enumerate()
            .map(|(i, e)| Card::from_entry(i + 1, e, params.currency))
            .collect();

        Self {
            params: params.clone(),
            entries,
            cards,
            fetched_count: lookup.entries.len(),
            fetched_at: lookup.fetched_at,
            freshness: lookup.freshness.clone(),
        }
    }

    pub fn currency(&self) -> Currency {
        self.params.currency
    }

    pub fn sort_field(&self) -> SortField {
        self.params.sort_field
    }

    /// Active name filter, exactly as applied.
    pub fn filter(&self) -> &str {
        &self.params.filter
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_stale(&self) -> bool {
        matches!(self.freshness, Freshness::Stale { .. })
    }

    /// Bar chart input: `(name, raw 24h volume)` in display order.
    pub fn volume_series(&self) -> Vec<(String, f64)> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.total_volume))
            .collect()
    }

    pub fn total_volume(&self) -> f64 {
        self.entries.iter().map(|e| e.total_volume).sum()
    }

    /// Share-of-total volume breakdown in display order.
    ///
    /// Empty when there are no entries or the total volume is not positive;
    /// callers render that as an empty state.
    pub fn volume_share(&self) -> Vec<ShareSlice> {
        let total = self.total_volume();
        if !(total > 0.0) || !total.is_finite() {
            return Vec::new();
        }
        self.entries
            .iter()
            .map(|e| ShareSlice {
                name: e.name.clone(),
                volume: e.total_volume,
                fraction: e.total_volume / total,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FetchKey;
    use chrono::TimeZone;

    fn lookup(entries: Vec<MarketEntry>) -> CacheLookup {
        CacheLookup {
            key: FetchKey {
                currency: Currency::Usd,
                count: 10,
            },
            entries: entries.into(),
            fetched_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            freshness: Freshness::Fresh,
        }
    }

    fn sample() -> Vec<MarketEntry> {
        let mut btc = MarketEntry::new("bitcoin", "btc", "Bitcoin", 67000.0, 300.0, 1300.0);
        btc.price_change_percentage_24h = Some(1.5);
        let eth = MarketEntry::new("ethereum", "eth", "Ethereum", 3100.0, 100.0, 370.0);
        let usdt = MarketEntry::new("tether", "usdt", "Tether", 1.0, 600.0, 110.0);
        vec![btc, eth, usdt]
    }

    #[test]
    fn cards_follow_projection_order() {
        let params = QueryParams {
            sort_field: SortField::TotalVolume,
            ..QueryParams::default()
        };
        let view = DashboardView::build(&lookup(sample()), &params);

        let ranked: Vec<(usize, &str)> = view
            .cards
            .iter()
            .map(|c| (c.rank, c.symbol.as_str()))
            .collect();
        assert_eq!(ranked, [(1, "USDT"), (2, "BTC"), (3, "ETH")]);
        assert_eq!(view.cards[1].price_display, "$67,000.00");
        assert_eq!(view.cards[1].change_display, "+1.50%");
        assert_eq!(view.cards[2].change_display, "n/a");
    }

    #[test]
    fn series_derive_from_the_same_sequence() {
        let params = QueryParams {
            filter: "e".into(),
            sort_field: SortField::TotalVolume,
            ..QueryParams::default()
        };
        let view = DashboardView::build(&lookup(sample()), &params);

        // "Bitcoin" has no 'e'; Tether and Ethereum remain.
        assert_eq!(view.fetched_count, 3);
        assert_eq!(
            view.volume_series(),
            vec![("Tether".to_string(), 600.0), ("Ethereum".to_string(), 100.0)]
        );
        let share = view.volume_share();
        assert_eq!(share.len(), 2);
        assert!((share[0].fraction - 600.0 / 700.0).abs() < 1e-12);
        let sum: f64 = share.iter().map(|s| s.fraction).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_listing_gives_empty_views() {
        let view = DashboardView::build(&lookup(Vec::new()), &QueryParams::default());
        assert!(view.is_empty());
        assert!(view.cards.is_empty());
        assert!(view.volume_series().is_empty());
        assert!(view.volume_share().is_empty());
    }

    #[test]
    fn zero_total_volume_has_no_share_breakdown() {
        let zero = vec![MarketEntry::new("a", "a", "A", 1.0, 0.0, 1.0)];
        let view = DashboardView::build(&lookup(zero), &QueryParams::default());
        assert_eq!(view.cards.len(), 1);
        assert!(view.volume_share().is_empty());
    }

    #[test]
    fn stale_flag_carries_through() {
        let mut l = lookup(sample());
        l.freshness = Freshness::Stale {
            error: crate::data::DataError::Network("down".into()),
        };
        let view = DashboardView::build(&l, &QueryParams::default());
        assert!(view.is_stale());
        assert_eq!(view.entries.len(), 3);
    }

    #[test]
    fn serializes_for_json_output() {
        let view = DashboardView::build(&lookup(sample()), &QueryParams::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["freshness"]["state"], "fresh");
        assert_eq!(json["params"]["sort_field"], "market_cap");
        assert_eq!(json["cards"][0]["symbol"], "BTC");
    }
}
