//! Merging of shared-checklist species sub-lists
//!
//! A shared checklist page shows the viewed checklist's species first and then
//! "additional species" sections contributed by the other participants. The
//! same sighting can appear in more than one of these lists, but full counts
//! are shown only on the checklist being viewed while the continuation lists
//! may show "X" or partial counts. Merging therefore takes the maximum count
//! per name: summing would double-count one sighting.

use crate::app::models::SpeciesEntry;
use tracing::debug;

/// Merge the sub-lists of one checklist page into a single species list
///
/// The first sub-list is the primary checklist and seeds the result. For
/// every entry of a later sub-list, an existing entry with the same name keeps
/// the larger of the two counts; unseen names are appended. Order of first
/// appearance is preserved.
pub fn merge_sublists(sublists: Vec<Vec<SpeciesEntry>>) -> Vec<SpeciesEntry> {
    let mut lists = sublists.into_iter();
    let mut merged = lists.next().unwrap_or_default();

    for list in lists {
        for entry in list {
            match merged.iter_mut().find(|existing| existing.name == entry.name) {
                Some(existing) => {
                    if entry.count > existing.count {
                        debug!(
                            "Shared sub-list raises count for '{}' from {} to {}",
                            entry.name, existing.count, entry.count
                        );
                        existing.count = entry.count;
                    }
                }
                None => merged.push(entry),
            }
        }
    }

    merged
}
