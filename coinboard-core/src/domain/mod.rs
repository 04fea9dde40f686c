//! Domain types for Coinboard

pub mod entry;
pub mod query;

pub use entry::MarketEntry;
pub use query::{
    Currency, FetchKey, QueryError, QueryParams, SortField, DEFAULT_COUNT, MAX_COUNT, MIN_COUNT,
};
