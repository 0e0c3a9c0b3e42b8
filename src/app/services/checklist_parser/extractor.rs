//! Checklist record extraction
//!
//! Pulls one [`ChecklistRecord`] out of one checklist page by running a fixed
//! sequence of marker scans. Each step starts at the cursor left by the
//! previous one, so fields are read strictly in page order and text already
//! consumed is never searched again.
//!
//! Extraction is all-or-nothing: the first step that fails aborts the record
//! with an [`Error::Extraction`] naming the checklist and the field that was
//! being sought.

use super::field_parsers::{clean_text, parse_count, parse_date, parse_distance, parse_duration};
use super::merge::merge_sublists;
use crate::app::models::{ChecklistField, ChecklistRecord, ObservationMethod, SpeciesEntry};
use crate::app::services::tag_scanner::{advance_past, extract_between, find_marker};
use crate::app::services::taxonomy::TaxonomyLookup;
use crate::constants::markers;
use crate::{Error, Result};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Extracts checklist records, resolving species names through a taxonomy
pub struct ChecklistExtractor<'a, T: TaxonomyLookup + ?Sized> {
    taxonomy: &'a T,
}

/// One page being scanned, with the identifier used in error reports
struct Page<'p> {
    identifier: &'p str,
    html: &'p str,
}

impl Page<'_> {
    /// Error for a marker that could not be found
    fn missing(&self, field: ChecklistField, what: &str) -> Error {
        Error::extraction(self.identifier, field, format!("{} not found", what))
    }

    /// Map a field parser error onto this page and field
    fn invalid(&self, field: ChecklistField) -> impl FnOnce(Error) -> Error + '_ {
        move |error| match error {
            Error::DataValidation { message } => {
                Error::extraction(self.identifier, field, message)
            }
            other => Error::extraction(self.identifier, field, other.to_string()),
        }
    }
}

impl<'a, T: TaxonomyLookup + ?Sized> ChecklistExtractor<'a, T> {
    /// Create an extractor backed by the given taxonomy
    pub fn new(taxonomy: &'a T) -> Self {
        Self { taxonomy }
    }

    /// Extract a checklist record from the page HTML
    ///
    /// # Arguments
    ///
    /// * `identifier` - Checklist identifier recorded on the result and used in errors
    /// * `html` - Raw page text
    ///
    /// # Errors
    ///
    /// Returns `Error::Extraction` when any field is missing or malformed, or
    /// when a species name is absent from the taxonomy.
    pub fn extract(&self, identifier: &str, html: &str) -> Result<ChecklistRecord> {
        let page = Page { identifier, html };

        let (date, cursor) = self.extract_date(&page, 0)?;
        let (location, cursor) = self.extract_location(&page, cursor)?;
        let (participants, cursor) = self.extract_participants(&page, cursor)?;
        let (observation_method, cursor) = self.extract_method(&page, cursor)?;

        let (duration_minutes, cursor) = if observation_method.has_duration() {
            self.extract_duration(&page, cursor)?
        } else {
            (0.0, cursor)
        };

        let (distance_km, cursor) = if observation_method.has_distance() {
            self.extract_distance(&page, cursor)?
        } else {
            (0.0, cursor)
        };

        let (species, _) = self.extract_species_list(&page, cursor)?;

        info!(
            "Extracted checklist {}: {} at {}, {} participant(s), {} species entries",
            identifier,
            date,
            location,
            participants.len(),
            species.len()
        );

        Ok(ChecklistRecord {
            identifier: identifier.to_string(),
            date,
            location,
            participants,
            observation_method,
            duration_minutes,
            distance_km,
            species,
        })
    }

    fn extract_date(&self, page: &Page<'_>, cursor: usize) -> Result<(NaiveDate, usize)> {
        let field = ChecklistField::Date;
        let (token, cursor) =
            extract_between(page.html, markers::DATE_OPEN, markers::DATE_CLOSE, cursor, None)
                .ok_or_else(|| page.missing(field, "date attribute"))?;
        let date = parse_date(token).map_err(page.invalid(field))?;

        debug!("{}: date {}", page.identifier, date);
        Ok((date, cursor))
    }

    fn extract_location(&self, page: &Page<'_>, cursor: usize) -> Result<(String, usize)> {
        let field = ChecklistField::Location;
        let cursor = advance_past(page.html, markers::LOCATION_LABEL, cursor, None)
            .ok_or_else(|| page.missing(field, "location label"))?;
        let (token, cursor) =
            extract_between(page.html, markers::SPAN_OPEN, markers::SPAN_CLOSE, cursor, None)
                .ok_or_else(|| page.missing(field, "location name"))?;
        let location = clean_text(token);

        debug!("{}: location '{}'", page.identifier, location);
        Ok((location, cursor))
    }

    /// Owner first, then any other participants on a shared checklist
    fn extract_participants(&self, page: &Page<'_>, cursor: usize) -> Result<(Vec<String>, usize)> {
        let field = ChecklistField::Participants;
        let cursor = advance_past(page.html, markers::OWNER_LABEL, cursor, None)
            .ok_or_else(|| page.missing(field, "owner label"))?;
        let (owner, mut cursor) =
            extract_between(page.html, markers::SPAN_OPEN, markers::SPAN_CLOSE, cursor, None)
                .ok_or_else(|| page.missing(field, "owner name"))?;

        let mut participants = vec![clean_text(owner)];

        // Single-observer checklists have no "other participants" block
        if let Some(label) =
            find_marker(page.html, markers::OTHER_PARTICIPANTS_LABEL, cursor, None)
        {
            let label_end = label + markers::OTHER_PARTICIPANTS_LABEL.len();
            let list_start =
                advance_past(page.html, markers::PARTICIPANT_BREADCRUMB, label_end, None)
                    .ok_or_else(|| page.missing(field, "participant list"))?;
            let list_end = find_marker(page.html, markers::BLOCK_CLOSE, list_start, None)
                .ok_or_else(|| page.missing(field, "end of participant list"))?;

            let mut position = list_start;
            while let Some((name, next)) = extract_between(
                page.html,
                markers::PARTICIPANT_OPEN,
                markers::SPAN_CLOSE,
                position,
                Some(list_end),
            ) {
                participants.push(clean_text(name));
                position = next;
            }

            cursor = list_end + markers::BLOCK_CLOSE.len();
        }

        debug!("{}: participants {:?}", page.identifier, participants);
        Ok((participants, cursor))
    }

    fn extract_method(&self, page: &Page<'_>, cursor: usize) -> Result<(ObservationMethod, usize)> {
        let (token, cursor) = extract_between(
            page.html,
            markers::PROTOCOL_OPEN,
            markers::SPAN_CLOSE,
            cursor,
            None,
        )
        .ok_or_else(|| page.missing(ChecklistField::ObservationMethod, "protocol"))?;
        let method = ObservationMethod::from_protocol(&clean_text(token));

        debug!("{}: protocol {}", page.identifier, method);
        Ok((method, cursor))
    }

    fn extract_duration(&self, page: &Page<'_>, cursor: usize) -> Result<(f64, usize)> {
        let field = ChecklistField::Duration;
        let (token, cursor) = extract_between(
            page.html,
            markers::DURATION_OPEN,
            markers::SPAN_CLOSE,
            cursor,
            None,
        )
        .ok_or_else(|| page.missing(field, "duration badge"))?;
        let minutes = parse_duration(&clean_text(token)).map_err(page.invalid(field))?;

        debug!("{}: duration {} min", page.identifier, minutes);
        Ok((minutes, cursor))
    }

    fn extract_distance(&self, page: &Page<'_>, cursor: usize) -> Result<(f64, usize)> {
        let field = ChecklistField::Distance;
        let (token, cursor) = extract_between(
            page.html,
            markers::DISTANCE_OPEN,
            markers::SPAN_CLOSE,
            cursor,
            None,
        )
        .ok_or_else(|| page.missing(field, "distance badge"))?;
        let km = parse_distance(&clean_text(token)).map_err(page.invalid(field))?;

        debug!("{}: distance {:.3} km", page.identifier, km);
        Ok((km, cursor))
    }

    /// Extract the primary species list and any shared "additional species"
    /// sub-lists, then merge them
    fn extract_species_list(
        &self,
        page: &Page<'_>,
        cursor: usize,
    ) -> Result<(Vec<SpeciesEntry>, usize)> {
        let field = ChecklistField::SpeciesList;
        let list_start = advance_past(page.html, markers::SPECIES_LIST_START, cursor, None)
            .ok_or_else(|| page.missing(field, "species list"))?;
        let list_end = find_marker(page.html, markers::SPECIES_LIST_END, list_start, None)
            .ok_or_else(|| page.missing(field, "end of species list"))?;

        // Each additional-species heading starts a new sub-list
        let mut boundaries = vec![list_start];
        let mut position = list_start;
        while let Some(found) =
            find_marker(page.html, markers::ADDITIONAL_SPECIES, position, Some(list_end))
        {
            boundaries.push(found);
            position = found + markers::ADDITIONAL_SPECIES.len();
        }

        let mut sublists = Vec::with_capacity(boundaries.len());
        for (index, &start) in boundaries.iter().enumerate() {
            let bound = boundaries.get(index + 1).copied().unwrap_or(list_end);
            sublists.push(self.extract_sublist(page, start, bound)?);
        }

        if sublists.len() > 1 {
            debug!(
                "{}: merging {} shared species sub-lists",
                page.identifier,
                sublists.len()
            );
        }

        Ok((
            merge_sublists(sublists),
            list_end + markers::SPECIES_LIST_END.len(),
        ))
    }

    /// Extract every species section between `start` and `bound`
    fn extract_sublist(
        &self,
        page: &Page<'_>,
        start: usize,
        bound: usize,
    ) -> Result<Vec<SpeciesEntry>> {
        let mut entries = Vec::new();
        let mut position = start;

        while find_marker(page.html, markers::SECTION_OPEN, position, Some(bound)).is_some() {
            let (entry, next) = self.extract_species(page, position, bound)?;
            entries.push(entry);
            position = next;
        }

        Ok(entries)
    }

    /// Extract one species section: name, taxonomic order and count
    fn extract_species(
        &self,
        page: &Page<'_>,
        cursor: usize,
        bound: usize,
    ) -> Result<(SpeciesEntry, usize)> {
        let field = ChecklistField::SpeciesList;
        let bound = Some(bound);

        let cursor = advance_past(page.html, markers::SECTION_OPEN, cursor, bound)
            .ok_or_else(|| page.missing(field, "species section"))?;
        let (raw_name, cursor) = extract_between(
            page.html,
            markers::SPECIES_NAME_OPEN,
            markers::SPAN_CLOSE,
            cursor,
            bound,
        )
        .ok_or_else(|| page.missing(field, "species name"))?;
        let name = clean_text(raw_name);

        let taxonomic_order = self
            .taxonomy
            .taxonomic_order(&name)
            .ok_or_else(|| page.invalid(field)(Error::taxon_not_found(name.clone())))?;

        let cursor = advance_past(page.html, markers::NUMBER_OBSERVED_LABEL, cursor, bound)
            .ok_or_else(|| page.missing(field, &format!("count label for '{}'", name)))?;
        let (count_token, cursor) =
            extract_between(page.html, markers::SPAN_OPEN, markers::SPAN_CLOSE, cursor, bound)
                .ok_or_else(|| page.missing(field, &format!("count for '{}'", name)))?;
        let count = parse_count(count_token).map_err(page.invalid(field))?;

        let cursor = advance_past(page.html, markers::SECTION_CLOSE, cursor, bound)
            .ok_or_else(|| page.missing(field, &format!("end of section for '{}'", name)))?;

        Ok((SpeciesEntry::new(name, count, taxonomic_order), cursor))
    }
}
