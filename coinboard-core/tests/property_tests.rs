//! Property tests for the view pipeline.
//!
//! Uses proptest to verify:
//! 1. Filtering only ever removes entries, and every survivor matches
//! 2. Output is ordered descending by the sort field
//! 3. Equal sort keys keep their input order
//! 4. Volume share fractions sum to 1 whenever the total is positive
//! 5. Projection is a permutation of the matching subset (nothing altered)

use chrono::{TimeZone, Utc};
use coinboard_core::data::{CacheLookup, Freshness};
use coinboard_core::domain::{Currency, FetchKey, MarketEntry, QueryParams, SortField};
use coinboard_core::pipeline::{project, DashboardView};
use proptest::prelude::*;

// ── Strategies ───────────────────────────────────────────────────────

const NAMES: &[&str] = &[
    "Bitcoin", "Ethereum", "Tether", "BNB", "Solana", "USDC", "XRP", "Dogecoin", "Toncoin",
    "Cardano", "Bitcoin Cash", "Shiba Inu",
];

fn arb_entry() -> impl Strategy<Value = MarketEntry> {
    (
        0..NAMES.len(),
        // Coarse buckets so ties are common.
        (0u32..8).prop_map(|v| f64::from(v) * 1000.0),
        0.0..1e11_f64,
        0.0..1e12_f64,
    )
        .prop_map(|(i, price, volume, cap)| {
            let name = NAMES[i];
            MarketEntry::new(name.to_lowercase(), &name[..2], name, price, volume, cap)
        })
}

fn arb_entries() -> impl Strategy<Value = Vec<MarketEntry>> {
    prop::collection::vec(arb_entry(), 0..25)
}

fn arb_sort() -> impl Strategy<Value = SortField> {
    prop::sample::select(SortField::ALL.to_vec())
}

fn arb_filter() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["", "bit", "COIN", " e ", "xyz", "inu"]).prop_map(String::from)
}

fn lookup(entries: Vec<MarketEntry>) -> CacheLookup {
    CacheLookup {
        key: FetchKey {
            currency: Currency::Usd,
            count: 20,
        },
        entries: entries.into(),
        fetched_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        freshness: Freshness::Fresh,
    }
}

proptest! {
    #[test]
    fn filter_yields_matching_subset(
        entries in arb_entries(),
        filter in arb_filter(),
        sort in arb_sort(),
    ) {
        let out = project(&entries, &filter, sort);
        let needle = filter.to_lowercase();

        prop_assert!(out.len() <= entries.len());
        for e in &out {
            prop_assert!(e.name.to_lowercase().contains(&needle));
        }
        let expected = entries
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .count();
        prop_assert_eq!(out.len(), expected);
    }

    #[test]
    fn output_is_sorted_descending(entries in arb_entries(), sort in arb_sort()) {
        let out = project(&entries, "", sort);
        for pair in out.windows(2) {
            prop_assert!(sort.value(&pair[0]) >= sort.value(&pair[1]));
        }
    }

    #[test]
    fn ties_keep_input_order(entries in arb_entries()) {
        // Tag each entry with its input position through `id`.
        let tagged: Vec<MarketEntry> = entries
            .into_iter()
            .enumerate()
            .map(|(i, mut e)| {
                e.id = i.to_string();
                e
            })
            .collect();
        let out = project(&tagged, "", SortField::CurrentPrice);

        for pair in out.windows(2) {
            if pair[0].current_price == pair[1].current_price {
                let a: usize = pair[0].id.parse().unwrap();
                let b: usize = pair[1].id.parse().unwrap();
                prop_assert!(a < b);
            }
        }
    }

    #[test]
    fn share_fractions_sum_to_one(entries in arb_entries(), filter in arb_filter()) {
        let params = QueryParams { filter, ..QueryParams::default() };
        let view = DashboardView::build(&lookup(entries), &params);
        let share = view.volume_share();

        if view.total_volume() > 0.0 {
            prop_assert_eq!(share.len(), view.entries.len());
            let sum: f64 = share.iter().map(|s| s.fraction).sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
            prop_assert!(share.iter().all(|s| (0.0..=1.0).contains(&s.fraction)));
        } else {
            prop_assert!(share.is_empty());
        }
    }

    #[test]
    fn projection_never_alters_values(entries in arb_entries(), sort in arb_sort()) {
        let out = project(&entries, "", sort);
        prop_assert_eq!(out.len(), entries.len());
        for e in &out {
            prop_assert!(entries.iter().any(|orig| orig == e));
        }
    }
}
