//! Static dependency table for the cascading filters.
//!
//! For a changed category, the table answers "which categories' displayed
//! option lists must refresh." It is read-only data, constructed at compile
//! time and never mutated; the resolver consults it after every cascade
//! response to decide which override lists to publish.
//!
//! The table is deliberately asymmetric: branch fans out to everything
//! downstream, while dealer and lender feed back into the whole hierarchy
//! (picking a dealer narrows which branches and RMs are even relevant).

use crate::types::FilterCategory;

/// Categories whose displayed options must refresh after `changed` changes.
///
/// The changed category itself is not included; while its dropdown is the one
/// being edited, its own list is governed by the open-category exemption in
/// the resolver, not by this table.
pub fn impacted_by(changed: FilterCategory) -> &'static [FilterCategory] {
    use FilterCategory::*;
    match changed {
        Branch => &[TeamLead, Rm, SourceTeamLead, SourceRm, Dealer, Lender],
        TeamLead => &[Rm, Dealer, Lender],
        Rm => &[Dealer, Lender],
        SourceTeamLead => &[SourceRm, Dealer, Lender],
        SourceRm => &[Dealer, Lender],
        Dealer => &[Branch, TeamLead, Rm, SourceTeamLead, SourceRm, Lender],
        Lender => &[Branch, TeamLead, Rm, SourceTeamLead, SourceRm, Dealer],
    }
}
