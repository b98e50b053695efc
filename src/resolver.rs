//! Cascade resolution: selection in, override lists out.
//!
//! The resolver owns the name↔ID cache and the response cache, and turns the
//! current temporary selection into a request against the cascading-options
//! backend. Resolution is a best-effort live preview: failures are logged and
//! swallowed, and the caller keeps whatever overrides it already had.
//!
//! The three stages are public on purpose. The session controller runs them
//! separately so a response that arrives after a newer resolve has started
//! can be discarded before anything is merged (see [`crate::session`]).

use std::sync::Arc;
use std::time::Duration;

use crate::cache::NameIdCache;
use crate::cache::response::ResponseCache;
use crate::error::Result;
use crate::graph;
use crate::remote::{CascadeBackend, CascadeParams};
use crate::types::{
    BaseOptions, CASCADING_CATEGORIES, CascadeOverrides, FilterCategory, OptionSets, Selection,
};

pub struct CascadeResolver {
    backend: Arc<dyn CascadeBackend>,
    names: Arc<NameIdCache>,
    responses: ResponseCache,
}

impl CascadeResolver {
    pub fn new(backend: Arc<dyn CascadeBackend>, cache_ttl: Duration) -> Self {
        Self {
            backend,
            names: Arc::new(NameIdCache::new()),
            responses: ResponseCache::new(cache_ttl),
        }
    }

    pub fn names(&self) -> &NameIdCache {
        &self.names
    }

    /// Drop all memoized responses. Used by `clear_all`.
    pub fn clear_response_cache(&self) {
        self.responses.clear();
    }

    /// Fetch the unfiltered base options and seed the name↔ID cache.
    /// Called once at session start; the returned lists also populate the
    /// host's non-cascading filters.
    pub async fn seed(&self) -> Result<BaseOptions> {
        let base = self.backend.base_options().await?;
        self.names.seed(&base);
        Ok(base)
    }

    /// Build the seven optional request parameters from a selection.
    ///
    /// Each category contributes the ID of its first selected name, or
    /// nothing when the name is unknown to the cache. The open category is
    /// forced absent regardless of its selection: while a dropdown is
    /// expanded, its own selection must not constrain its own option list.
    ///
    /// Identical inputs produce identical parameters, so the response-cache
    /// key is stable across calls.
    pub fn build_params(
        &self,
        selection: &Selection,
        open_category: Option<FilterCategory>,
    ) -> CascadeParams {
        let mut params = CascadeParams::default();
        for category in CASCADING_CATEGORIES {
            if open_category == Some(*category) {
                continue;
            }
            let id = self
                .names
                .resolve_first_id(*category, selection.get(*category));
            params.set(*category, id);
        }
        params
    }

    /// One cached round-trip to the cascading-options endpoint.
    ///
    /// Network and server errors are logged and mapped to `None`; the live
    /// preview never surfaces an error to the user.
    pub async fn fetch(&self, params: &CascadeParams) -> Option<OptionSets> {
        let key = params.cache_key();
        let backend = Arc::clone(&self.backend);
        let params = *params;
        self.responses
            .get_or_fetch(&key, move || async move {
                match backend.cascade_options(&params).await {
                    Ok(sets) => Some(sets),
                    Err(e) => {
                        tracing::warn!("cascade resolve failed, keeping previous overrides: {e}");
                        None
                    }
                }
            })
            .await
    }

    /// Merge a response into the name↔ID cache and produce override lists
    /// for the categories impacted by the last-changed category.
    ///
    /// Every returned list is merged into the cache (the response always
    /// carries all seven), but overrides are published only for the impacted
    /// set; with no last-changed category, all seven are published.
    pub fn merge_overrides(
        &self,
        sets: &OptionSets,
        last_changed: Option<FilterCategory>,
    ) -> CascadeOverrides {
        for category in CASCADING_CATEGORIES {
            self.names.merge(*category, sets.get(*category));
        }

        let impacted: &[FilterCategory] = match last_changed {
            Some(changed) => graph::impacted_by(changed),
            None => CASCADING_CATEGORIES,
        };

        let mut overrides = CascadeOverrides::new();
        for category in impacted {
            overrides.set(*category, sets.names(*category));
        }
        overrides
    }

    /// All three stages in one call, for callers that do not need the
    /// staleness check in between.
    pub async fn resolve(
        &self,
        selection: &Selection,
        open_category: Option<FilterCategory>,
        last_changed: Option<FilterCategory>,
    ) -> Option<CascadeOverrides> {
        let params = self.build_params(selection, open_category);
        let sets = self.fetch(&params).await?;
        Some(self.merge_overrides(&sets, last_changed))
    }
}
