//! Dashboard — the pull-based render pass.
//!
//! `render` is the whole pipeline: cache lookup, projection, view. Filter and
//! sort are recomputed on every call, cache hit or not, so a control change
//! is visible immediately without a network round trip.

use tracing::debug;

use crate::data::{Clock, DataError, MarketDataProvider, ResultCache};
use crate::domain::QueryParams;
use crate::pipeline::DashboardView;

pub struct Dashboard<P, C> {
    cache: ResultCache<P, C>,
}

impl<P: MarketDataProvider, C: Clock> Dashboard<P, C> {
    pub fn new(cache: ResultCache<P, C>) -> Self {
        Self { cache }
    }

    pub fn render(&mut self, params: &QueryParams) -> Result<DashboardView, DataError> {
        let lookup = self.cache.get(&params.fetch_key())?;
        let view = DashboardView::build(&lookup, params);
        debug!(
            key = %lookup.key,
            shown = view.entries.len(),
            fetched = view.fetched_count,
            "rendered view"
        );
        Ok(view)
    }

    /// Refetch regardless of TTL, then render. A failed refetch still serves
    /// the previous listing flagged stale.
    pub fn force_refresh(&mut self, params: &QueryParams) -> Result<DashboardView, DataError> {
        let lookup = self.cache.refresh(&params.fetch_key())?;
        Ok(DashboardView::build(&lookup, params))
    }

    pub fn cache(&self) -> &ResultCache<P, C> {
        &self.cache
    }
}
