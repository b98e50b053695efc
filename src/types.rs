use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::SluiceError;

/// The seven cascading filter categories.
///
/// Changing a selection in one of these may shrink or grow the valid option
/// sets of the others; the exact fan-out lives in [`crate::graph`]. The
/// independent filters (status, DPD bucket, repayment, PTP date) never
/// cascade and are carried only as plain lists on [`BaseOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterCategory {
    Branch,
    TeamLead,
    Rm,
    SourceTeamLead,
    SourceRm,
    Dealer,
    Lender,
}

/// All cascading categories in canonical order. Request parameters and cache
/// keys are always built in this order.
pub const CASCADING_CATEGORIES: &[FilterCategory] = &[
    FilterCategory::Branch,
    FilterCategory::TeamLead,
    FilterCategory::Rm,
    FilterCategory::SourceTeamLead,
    FilterCategory::SourceRm,
    FilterCategory::Dealer,
    FilterCategory::Lender,
];

pub const VALID_CATEGORIES: &[&str] = &[
    "branch",
    "teamLead",
    "rm",
    "sourceTeamLead",
    "sourceRm",
    "dealer",
    "lender",
];

impl FilterCategory {
    /// Query-parameter name used on the cascading-options endpoint.
    pub fn param_name(self) -> &'static str {
        match self {
            FilterCategory::Branch => "branch_id",
            FilterCategory::TeamLead => "tl_id",
            FilterCategory::Rm => "rm_id",
            FilterCategory::SourceTeamLead => "source_tl_id",
            FilterCategory::SourceRm => "source_rm_id",
            FilterCategory::Dealer => "dealer_id",
            FilterCategory::Lender => "lender_id",
        }
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterCategory::Branch => write!(f, "branch"),
            FilterCategory::TeamLead => write!(f, "teamLead"),
            FilterCategory::Rm => write!(f, "rm"),
            FilterCategory::SourceTeamLead => write!(f, "sourceTeamLead"),
            FilterCategory::SourceRm => write!(f, "sourceRm"),
            FilterCategory::Dealer => write!(f, "dealer"),
            FilterCategory::Lender => write!(f, "lender"),
        }
    }
}

impl FromStr for FilterCategory {
    type Err = SluiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "branch" => Ok(FilterCategory::Branch),
            "teamLead" => Ok(FilterCategory::TeamLead),
            "rm" => Ok(FilterCategory::Rm),
            "sourceTeamLead" => Ok(FilterCategory::SourceTeamLead),
            "sourceRm" => Ok(FilterCategory::SourceRm),
            "dealer" => Ok(FilterCategory::Dealer),
            "lender" => Ok(FilterCategory::Lender),
            _ => Err(SluiceError::InvalidCategory(s.to_string())),
        }
    }
}

/// Normalize a display name for use as a cache key.
///
/// One global rule, applied at every cache write and read: trim, collapse
/// internal whitespace to single spaces, fold to lowercase. Mismatched
/// normalization between write and read silently degrades a lookup to "no
/// constraint," so both sides must go through this function.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A per-category multi-selection of display names.
///
/// Names are unique within a category; order reflects UI click order. Only
/// the first name per category ever contributes to a cascade request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    values: HashMap<FilterCategory, Vec<String>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected names for a category, in click order.
    pub fn get(&self, category: FilterCategory) -> &[String] {
        self.values
            .get(&category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Replace a category's selection. Duplicates are dropped, keeping the
    /// first occurrence so click order survives.
    pub fn set(&mut self, category: FilterCategory, names: Vec<String>) {
        let mut unique = Vec::with_capacity(names.len());
        for name in names {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        if unique.is_empty() {
            self.values.remove(&category);
        } else {
            self.values.insert(category, unique);
        }
    }

    /// First selected name for a category, if any.
    pub fn first(&self, category: FilterCategory) -> Option<&str> {
        self.get(category).first().map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(|v| v.is_empty())
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Sorted, deduplicated view of a category's selection, used for the
    /// apply-time "did this category actually change" comparison.
    pub fn sorted_unique(&self, category: FilterCategory) -> Vec<String> {
        let mut names: Vec<String> = self.get(category).to_vec();
        names.sort();
        names.dedup();
        names
    }
}

/// One option as returned by the backend: a backend-assigned ID plus the
/// display name shown in the dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeOption {
    pub id: i64,
    pub name: String,
}

impl CascadeOption {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The seven per-category option lists returned by the cascading-options
/// endpoint. Field names match the wire contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionSets {
    #[serde(default)]
    pub branches: Vec<CascadeOption>,
    #[serde(default)]
    pub team_leads: Vec<CascadeOption>,
    #[serde(default)]
    pub rms: Vec<CascadeOption>,
    #[serde(default)]
    pub source_team_leads: Vec<CascadeOption>,
    #[serde(default)]
    pub source_rms: Vec<CascadeOption>,
    #[serde(default)]
    pub dealers: Vec<CascadeOption>,
    #[serde(default)]
    pub lenders: Vec<CascadeOption>,
}

impl OptionSets {
    pub fn get(&self, category: FilterCategory) -> &[CascadeOption] {
        match category {
            FilterCategory::Branch => &self.branches,
            FilterCategory::TeamLead => &self.team_leads,
            FilterCategory::Rm => &self.rms,
            FilterCategory::SourceTeamLead => &self.source_team_leads,
            FilterCategory::SourceRm => &self.source_rms,
            FilterCategory::Dealer => &self.dealers,
            FilterCategory::Lender => &self.lenders,
        }
    }

    /// Display names for a category, in response order.
    pub fn names(&self, category: FilterCategory) -> Vec<String> {
        self.get(category).iter().map(|o| o.name.clone()).collect()
    }
}

/// Unfiltered base options used to seed the name↔ID cache, plus the
/// independent non-cascading lists the host renders directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseOptions {
    #[serde(flatten)]
    pub cascading: OptionSets,

    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default)]
    pub ptp_date_buckets: Vec<String>,
    #[serde(default)]
    pub dpd_buckets: Vec<String>,
    #[serde(default)]
    pub repayment_numbers: Vec<u32>,
    #[serde(default)]
    pub emi_months: Vec<u32>,
}

/// Per-category option lists that replace the unfiltered base lists while a
/// filter panel is open. An absent category means "show the base list."
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeOverrides {
    lists: HashMap<FilterCategory, Vec<String>>,
}

impl CascadeOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: FilterCategory) -> Option<&[String]> {
        self.lists.get(&category).map(|v| v.as_slice())
    }

    pub fn set(&mut self, category: FilterCategory, names: Vec<String>) {
        self.lists.insert(category, names);
    }

    pub fn clear(&mut self) {
        self.lists.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// The list the UI should display: the override when one is present for
    /// the category, otherwise the unfiltered base list.
    pub fn display_list(&self, category: FilterCategory, base: &[String]) -> Vec<String> {
        match self.get(category) {
            Some(names) => names.to_vec(),
            None => base.to_vec(),
        }
    }
}
