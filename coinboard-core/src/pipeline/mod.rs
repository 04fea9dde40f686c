//! View pipeline: filter, stable sort, and the chart-ready projections.
//!
//! `project` is the only place ordering is decided. Every view (cards, volume
//! bars, volume share) is derived from its output and never re-sorts.

pub mod view;

pub use view::{Card, DashboardView, ShareSlice};

use crate::domain::{MarketEntry, SortField};

/// Filter by case-insensitive name substring, then stable-sort descending by `sort`.
///
/// Only an empty filter keeps every entry; whitespace is matched like any other
/// character. No match yields an empty vector. Entries with equal sort values keep their input order.
pub fn project(entries: &[MarketEntry], filter: &str, sort: SortField) -> Vec<MarketEntry> {
    let needle = filter.to_lowercase();

    let mut retained: Vec<MarketEntry> = entries
        .iter()
        .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    // `sort_by` is stable; reversing the comparison keeps ties in input order.
    retained.sort_by(|a, b| sort.value(b).total_cmp(&sort.value(a)));
    retained
}
