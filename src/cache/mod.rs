//! In-memory name↔ID mapping for the cascading filters.
//!
//! The UI works in display names; the backend works in integer IDs. This
//! cache bridges the two. It is seeded once from the unfiltered base-options
//! response and merged incrementally as cascade responses arrive. Entries are
//! additive for the lifetime of the session: a name seen once keeps its ID
//! even if later responses omit it. Stale entries are tolerated — the worst
//! case is a momentarily stale ID in a best-effort preview request.

pub mod response;

use std::collections::HashMap;

use dashmap::DashMap;

use crate::types::{BaseOptions, CascadeOption, FilterCategory, normalize_name};

/// Per-category map from normalized display name to backend-assigned ID.
///
/// All methods take `&self`; the cache is shared across concurrent resolve
/// attempts and merges are commutative (last-write-wins per name), so
/// out-of-order completion cannot corrupt it.
#[derive(Debug, Default)]
pub struct NameIdCache {
    maps: DashMap<FilterCategory, HashMap<String, i64>>,
}

impl NameIdCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate every category's map from the unfiltered base options.
    /// Called once at session start.
    pub fn seed(&self, base: &BaseOptions) {
        for category in crate::types::CASCADING_CATEGORIES {
            self.merge(*category, base.cascading.get(*category));
        }
    }

    /// Union `options` into the category's map. A later entry with an
    /// existing name overwrites the ID; there is no conflict error.
    pub fn merge(&self, category: FilterCategory, options: &[CascadeOption]) {
        if options.is_empty() {
            return;
        }
        let mut map = self.maps.entry(category).or_default();
        for option in options {
            map.insert(normalize_name(&option.name), option.id);
        }
    }

    /// ID for a single display name, if the cache has seen it.
    pub fn id_for(&self, category: FilterCategory, name: &str) -> Option<i64> {
        self.maps
            .get(&category)
            .and_then(|map| map.get(&normalize_name(name)).copied())
    }

    /// ID for the first selected name, if any.
    ///
    /// Only the first name is ever used when building cascade requests: the
    /// multi-select context is deliberately reduced to a single-ID context,
    /// so a second selected branch does not constrain downstream lists. A
    /// name with no cache entry resolves to `None` and the corresponding
    /// request parameter is simply omitted — never an error.
    pub fn resolve_first_id(&self, category: FilterCategory, names: &[String]) -> Option<i64> {
        names.first().and_then(|name| self.id_for(category, name))
    }

    /// Number of distinct names cached for a category.
    pub fn len(&self, category: FilterCategory) -> usize {
        self.maps.get(&category).map(|m| m.len()).unwrap_or(0)
    }
}
