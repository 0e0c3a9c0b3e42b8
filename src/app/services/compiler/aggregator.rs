//! Multi-checklist aggregation
//!
//! Combines extracted checklist records into one [`SummaryRecord`]. Unlike
//! the intra-page sub-list merge, records here are independent observations,
//! so counts for the same name are summed.

use super::date_check::{DateGroups, DateWarning};
use crate::{Error, Result};
use crate::app::models::{ChecklistRecord, SpeciesEntry, SummaryRecord};
use std::collections::HashSet;
use tracing::{debug, info};

/// Running totals over a batch of checklist records
#[derive(Debug, Default)]
pub struct Aggregator {
    summary: SummaryRecord,
    locations: HashSet<String>,
    anonymous_records: usize,
    dates: DateGroups,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one checklist record into the running totals
    ///
    /// # Errors
    ///
    /// Fails if the record's date cannot be encoded as a date code, or if a
    /// species total would overflow.
    pub fn add(&mut self, record: &ChecklistRecord) -> Result<()> {
        self.dates.add(&record.identifier, record.date)?;

        self.summary.total_distance_km += record.distance_km;
        self.summary.total_minutes += record.duration_minutes;

        for participant in &record.participants {
            if !self.summary.participants.contains(participant) {
                self.summary.participants.push(participant.clone());
            }
        }
        if record.has_anonymous_participant() {
            self.anonymous_records += 1;
        }

        self.locations.insert(record.location.clone());
        accumulate_species(&mut self.summary.species, &record.species)?;

        debug!(
            "Accumulated checklist {}: {} species so far",
            record.identifier,
            self.summary.species.len()
        );
        Ok(())
    }

    /// Finish aggregation: fold subspecies, sort, and check dates
    pub fn finish(self) -> Result<(SummaryRecord, Option<DateWarning>)> {
        let mut summary = self.summary;
        summary.includes_multiple_anonymous_contributors = self.anonymous_records > 1;
        summary.distinct_location_count = self.locations.len();
        summary.species = strip_and_remerge(summary.species)?;

        info!(
            "Compiled {} checklist(s): {} participants, {} locations, {} taxa",
            self.dates.record_count(),
            summary.participant_count(),
            summary.distinct_location_count,
            summary.species.len()
        );

        Ok((summary, self.dates.warning()))
    }
}

/// Aggregate a batch of records in one call
pub fn aggregate(records: &[ChecklistRecord]) -> Result<(SummaryRecord, Option<DateWarning>)> {
    let mut aggregator = Aggregator::new();
    for record in records {
        aggregator.add(record)?;
    }
    aggregator.finish()
}

/// Sum two counts for the same name, failing instead of wrapping
fn add_counts(name: &str, total: u32, count: u32) -> Result<u32> {
    total.checked_add(count).ok_or_else(|| {
        Error::data_validation(format!(
            "Total count for '{}' exceeds {} ({} + {})",
            name,
            u32::MAX,
            total,
            count
        ))
    })
}

/// Add one checklist's species into the running list, summing counts of
/// identical (unstripped) names
///
/// # Errors
///
/// Returns `Error::DataValidation` if a summed count overflows.
pub fn accumulate_species(totals: &mut Vec<SpeciesEntry>, species: &[SpeciesEntry]) -> Result<()> {
    for entry in species {
        match totals.iter_mut().find(|existing| existing.name == entry.name) {
            Some(existing) => existing.count = add_counts(&entry.name, existing.count, entry.count)?,
            None => totals.push(entry.clone()),
        }
    }
    Ok(())
}

/// Remove a trailing subspecies qualifier from a common name
///
/// Everything from the first `(` onwards is dropped, along with the single
/// character before it: "Dark-eyed Junco (Oregon)" becomes "Dark-eyed Junco".
/// Names without `(`, or starting with it, are returned unchanged.
pub fn strip_subspecies(name: &str) -> &str {
    match name.find('(') {
        Some(open) if open > 0 => {
            let head = &name[..open];
            let mut chars = head.chars();
            chars.next_back();
            chars.as_str()
        }
        _ => name,
    }
}

/// Strip subspecies qualifiers, sum the names that now collide and sort the
/// result by taxonomic order
///
/// A folded entry keeps the lowest taxonomic order of its constituents, so a
/// species and its subspecies groups sort at the species position. The sort is
/// stable: equal orders keep first-seen order.
///
/// # Errors
///
/// Returns `Error::DataValidation` if a folded count overflows.
pub fn strip_and_remerge(species: Vec<SpeciesEntry>) -> Result<Vec<SpeciesEntry>> {
    let mut folded: Vec<SpeciesEntry> = Vec::with_capacity(species.len());

    for entry in species {
        let stripped = strip_subspecies(&entry.name);
        match folded.iter_mut().find(|existing| existing.name == stripped) {
            Some(existing) => {
                existing.count = add_counts(stripped, existing.count, entry.count)?;
                existing.taxonomic_order = existing.taxonomic_order.min(entry.taxonomic_order);
            }
            None => folded.push(SpeciesEntry::new(
                stripped,
                entry.count,
                entry.taxonomic_order,
            )),
        }
    }

    folded.sort_by_key(|entry| entry.taxonomic_order);
    Ok(folded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::ObservationMethod;
    use crate::constants::ANONYMOUS_PARTICIPANT;
    use chrono::NaiveDate;

    fn record(
        identifier: &str,
        participants: &[&str],
        species: Vec<SpeciesEntry>,
    ) -> ChecklistRecord {
        ChecklistRecord {
            identifier: identifier.to_string(),
            date: NaiveDate::from_ymd_opt(2020, 10, 24).unwrap(),
            location: "Central Park".to_string(),
            participants: participants.iter().map(|p| p.to_string()).collect(),
            observation_method: ObservationMethod::Traveling,
            duration_minutes: 60.0,
            distance_km: 2.0,
            species,
        }
    }

    #[test]
    fn test_accumulate_sums_counts() {
        let mut totals = vec![SpeciesEntry::new("Mallard", 5, 336)];

        accumulate_species(
            &mut totals,
            &[
                SpeciesEntry::new("Mallard", 3, 336),
                SpeciesEntry::new("Gadwall", 0, 330),
            ],
        )
        .unwrap();

        assert_eq!(
            totals,
            vec![
                SpeciesEntry::new("Mallard", 8, 336),
                SpeciesEntry::new("Gadwall", 0, 330),
            ]
        );
    }

    #[test]
    fn test_accumulate_rejects_count_overflow() {
        let mut totals = vec![SpeciesEntry::new("Mallard", u32::MAX, 336)];

        let err = accumulate_species(&mut totals, &[SpeciesEntry::new("Mallard", 1, 336)])
            .unwrap_err();

        assert!(matches!(err, Error::DataValidation { .. }));
        assert!(err.to_string().contains("Mallard"));
        assert_eq!(totals[0].count, u32::MAX);
    }

    #[test]
    fn test_strip_and_remerge_rejects_count_overflow() {
        let err = strip_and_remerge(vec![
            SpeciesEntry::new("Dark-eyed Junco (Oregon)", u32::MAX, 31730),
            SpeciesEntry::new("Dark-eyed Junco", 1, 31712),
        ])
        .unwrap_err();

        assert!(matches!(err, Error::DataValidation { .. }));
        assert!(err.to_string().contains("Dark-eyed Junco"));
    }

    #[test]
    fn test_aggregate_reports_overflow_across_checklists() {
        let records = vec![
            record("S1", &["Ada"], vec![SpeciesEntry::new("Mallard", u32::MAX, 336)]),
            record("S2", &["Ada"], vec![SpeciesEntry::new("Mallard", 2, 336)]),
        ];

        assert!(aggregate(&records).is_err());
    }

    #[test]
    fn test_strip_subspecies() {
        assert_eq!(strip_subspecies("Dark-eyed Junco (Oregon)"), "Dark-eyed Junco");
        assert_eq!(strip_subspecies("Mallard"), "Mallard");
        // Exactly one character before '(' is dropped, whatever it is
        assert_eq!(strip_subspecies("Junco(Oregon)"), "Junc");
        assert_eq!(strip_subspecies("(Oregon)"), "(Oregon)");
        assert_eq!(strip_subspecies("Cañ (x)"), "Cañ");
    }

    #[test]
    fn test_strip_and_remerge_sums_subspecies() {
        let folded = strip_and_remerge(vec![
            SpeciesEntry::new("Dark-eyed Junco (Slate-colored)", 2, 31720),
            SpeciesEntry::new("Mallard", 1, 336),
            SpeciesEntry::new("Dark-eyed Junco (Oregon)", 3, 31730),
        ])
        .unwrap();

        assert_eq!(
            folded,
            vec![
                SpeciesEntry::new("Mallard", 1, 336),
                SpeciesEntry::new("Dark-eyed Junco", 5, 31720),
            ]
        );
    }

    #[test]
    fn test_strip_and_remerge_sort_is_stable() {
        let folded = strip_and_remerge(vec![
            SpeciesEntry::new("B", 1, 5),
            SpeciesEntry::new("A", 1, 5),
            SpeciesEntry::new("C", 1, 1),
        ])
        .unwrap();

        let names: Vec<_> = folded.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_aggregate_totals() {
        let records = vec![
            record("S1", &["Ada"], vec![SpeciesEntry::new("Mallard", 5, 336)]),
            record("S2", &["Grace", "Ada"], vec![SpeciesEntry::new("Mallard", 3, 336)]),
        ];

        let (summary, warning) = aggregate(&records).unwrap();

        assert_eq!(summary.participants, vec!["Ada", "Grace"]);
        assert_eq!(summary.total_minutes, 120.0);
        assert_eq!(summary.total_distance_km, 4.0);
        assert_eq!(summary.distinct_location_count, 1);
        assert_eq!(summary.species, vec![SpeciesEntry::new("Mallard", 8, 336)]);
        assert!(warning.is_none());
    }

    #[test]
    fn test_anonymous_flag_needs_two_records() {
        let one = vec![
            record("S1", &["Ada", ANONYMOUS_PARTICIPANT], Vec::new()),
            record("S2", &["Grace"], Vec::new()),
        ];
        let (summary, _) = aggregate(&one).unwrap();
        assert!(!summary.includes_multiple_anonymous_contributors);
        assert!(summary.participants.iter().any(|p| p == ANONYMOUS_PARTICIPANT));

        let two = vec![
            record("S1", &["Ada", ANONYMOUS_PARTICIPANT], Vec::new()),
            record("S2", &[ANONYMOUS_PARTICIPANT], Vec::new()),
        ];
        let (summary, _) = aggregate(&two).unwrap();
        assert!(summary.includes_multiple_anonymous_contributors);
        assert_eq!(summary.participant_count(), 2);
    }

    #[test]
    fn test_aggregate_empty_batch() {
        let (summary, warning) = aggregate(&[]).unwrap();
        assert_eq!(summary, SummaryRecord::default());
        assert!(warning.is_none());
    }

    #[test]
    fn test_aggregate_unencodable_date_names_checklist() {
        let mut old = record("S42", &["Ada"], Vec::new());
        old.date = NaiveDate::from_ymd_opt(1650, 5, 5).unwrap();

        let err = aggregate(&[record("S1", &["Ada"], Vec::new()), old]).unwrap_err();

        assert!(err.to_string().contains("S42"));
        assert!(err.to_string().contains("date"));
    }
}
