//! Remote cascading-options boundary.
//!
//! The engine talks to exactly two endpoints: the cascading-options endpoint,
//! which re-derives valid option sets from a partial selection, and the
//! unfiltered base-options endpoint used once at session start to seed the
//! name↔ID cache. Both sit behind the [`CascadeBackend`] trait so tests can
//! run against an in-process mock instead of a live server.

pub mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BaseOptions, CASCADING_CATEGORIES, FilterCategory, OptionSets};

/// The seven optional integer parameters of a cascade request.
///
/// An absent parameter is omitted from the request entirely, never sent as
/// null or empty. Construction is deterministic: identical selections produce
/// byte-identical [`cache_key`](CascadeParams::cache_key) values, which is
/// what makes response caching work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeParams {
    pub branch_id: Option<i64>,
    pub tl_id: Option<i64>,
    pub rm_id: Option<i64>,
    pub source_tl_id: Option<i64>,
    pub source_rm_id: Option<i64>,
    pub dealer_id: Option<i64>,
    pub lender_id: Option<i64>,
}

impl CascadeParams {
    pub fn get(&self, category: FilterCategory) -> Option<i64> {
        match category {
            FilterCategory::Branch => self.branch_id,
            FilterCategory::TeamLead => self.tl_id,
            FilterCategory::Rm => self.rm_id,
            FilterCategory::SourceTeamLead => self.source_tl_id,
            FilterCategory::SourceRm => self.source_rm_id,
            FilterCategory::Dealer => self.dealer_id,
            FilterCategory::Lender => self.lender_id,
        }
    }

    pub fn set(&mut self, category: FilterCategory, id: Option<i64>) {
        let slot = match category {
            FilterCategory::Branch => &mut self.branch_id,
            FilterCategory::TeamLead => &mut self.tl_id,
            FilterCategory::Rm => &mut self.rm_id,
            FilterCategory::SourceTeamLead => &mut self.source_tl_id,
            FilterCategory::SourceRm => &mut self.source_rm_id,
            FilterCategory::Dealer => &mut self.dealer_id,
            FilterCategory::Lender => &mut self.lender_id,
        };
        *slot = id;
    }

    /// True when no category contributes a constraint.
    pub fn is_empty(&self) -> bool {
        CASCADING_CATEGORIES.iter().all(|c| self.get(*c).is_none())
    }

    /// Query pairs for the present parameters only, in canonical order.
    pub fn query_pairs(&self) -> Vec<(&'static str, i64)> {
        CASCADING_CATEGORIES
            .iter()
            .filter_map(|c| self.get(*c).map(|id| (c.param_name(), id)))
            .collect()
    }

    /// Canonical serialization of all seven slots, present or not, used as
    /// the response-cache key. Absent slots serialize as `-` so that
    /// "no branch" and "branch 0" can never collide.
    pub fn cache_key(&self) -> String {
        let parts: Vec<String> = CASCADING_CATEGORIES
            .iter()
            .map(|c| match self.get(*c) {
                Some(id) => format!("{}={}", c.param_name(), id),
                None => format!("{}=-", c.param_name()),
            })
            .collect();
        parts.join("&")
    }
}

/// Backend that re-derives valid option sets from a partial selection.
#[async_trait]
pub trait CascadeBackend: Send + Sync {
    /// One round-trip to the cascading-options endpoint.
    async fn cascade_options(&self, params: &CascadeParams) -> Result<OptionSets>;

    /// The unfiltered base options, fetched once at session start.
    async fn base_options(&self) -> Result<BaseOptions>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_roundtrip() {
        let mut params = CascadeParams::default();
        for (i, category) in CASCADING_CATEGORIES.iter().enumerate() {
            params.set(*category, Some(i as i64));
        }
        for (i, category) in CASCADING_CATEGORIES.iter().enumerate() {
            assert_eq!(params.get(*category), Some(i as i64));
        }
    }

    #[test]
    fn test_query_pairs_omit_absent() {
        let mut params = CascadeParams::default();
        params.set(FilterCategory::Branch, Some(7));
        params.set(FilterCategory::Dealer, Some(3));

        assert_eq!(params.query_pairs(), [("branch_id", 7), ("dealer_id", 3)]);
    }

    #[test]
    fn test_cache_key_is_canonical() {
        let mut a = CascadeParams::default();
        a.set(FilterCategory::Dealer, Some(3));
        a.set(FilterCategory::Branch, Some(7));

        let mut b = CascadeParams::default();
        b.set(FilterCategory::Branch, Some(7));
        b.set(FilterCategory::Dealer, Some(3));

        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(
            a.cache_key(),
            "branch_id=7&tl_id=-&rm_id=-&source_tl_id=-&source_rm_id=-&dealer_id=3&lender_id=-"
        );
    }

    #[test]
    fn test_cache_key_distinguishes_absent_from_zero() {
        let absent = CascadeParams::default();
        let mut zero = CascadeParams::default();
        zero.set(FilterCategory::Branch, Some(0));

        assert_ne!(absent.cache_key(), zero.cache_key());
    }

    #[test]
    fn test_is_empty() {
        let mut params = CascadeParams::default();
        assert!(params.is_empty());
        params.set(FilterCategory::Lender, Some(1));
        assert!(!params.is_empty());
    }
}
