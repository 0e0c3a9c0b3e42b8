//! Taxonomy table row parsing
//!
//! Converts CSV records from the taxonomy reference table into
//! [`TaxonomyEntry`] values and validates the header row.

use crate::app::models::{TaxonomyCategory, TaxonomyEntry};
use crate::constants::{TAXONOMY_COLUMNS, TAXONOMY_REQUIRED_FIELDS};
use crate::{Error, Result};
use csv::StringRecord;

/// Byte-order mark some exports put in front of the first header column
const UTF8_BOM: char = '\u{feff}';

/// Check that a header record names exactly the expected columns, in order
pub fn header_matches(header: &StringRecord) -> bool {
    header.len() == TAXONOMY_COLUMNS.len()
        && header
            .iter()
            .zip(TAXONOMY_COLUMNS)
            .enumerate()
            .all(|(position, (actual, expected))| {
                let actual = if position == 0 {
                    actual.trim_start_matches(UTF8_BOM)
                } else {
                    actual
                };
                actual.trim() == *expected
            })
}

/// Parse one taxonomy row
///
/// The sequence key, category and common name are required. Trailing
/// columns may be blank or missing entirely.
///
/// # Arguments
///
/// * `record` - CSV fields for the row
/// * `line` - Line number, used in error messages
pub fn parse_taxonomy_record(record: &StringRecord, line: u64) -> Result<TaxonomyEntry> {
    if record.len() < TAXONOMY_REQUIRED_FIELDS {
        return Err(Error::taxonomy(format!(
            "Line {}: expected at least {} fields, found {}",
            line,
            TAXONOMY_REQUIRED_FIELDS,
            record.len()
        )));
    }

    if record.len() > TAXONOMY_COLUMNS.len() {
        return Err(Error::taxonomy(format!(
            "Line {}: expected at most {} fields, found {}",
            line,
            TAXONOMY_COLUMNS.len(),
            record.len()
        )));
    }

    let field = |index: usize| record.get(index).unwrap_or_default().trim().to_string();

    let sequence_key = field(0).parse::<u32>().map_err(|e| {
        Error::taxonomy(format!(
            "Line {}: invalid TAXON_ORDER '{}': {}",
            line,
            field(0),
            e
        ))
    })?;

    let category = field(1)
        .parse::<TaxonomyCategory>()
        .map_err(|e| match e {
            Error::Taxonomy { message } => Error::taxonomy(format!("Line {}: {}", line, message)),
            other => other,
        })?;

    let common_name = field(3);
    if common_name.is_empty() {
        return Err(Error::taxonomy(format!(
            "Line {}: empty PRIMARY_COM_NAME",
            line
        )));
    }

    Ok(TaxonomyEntry {
        sequence_key,
        category,
        species_code: field(2),
        common_name,
        scientific_name: field(4),
        order: field(5),
        family: field(6),
        species_group: field(7),
        report_as: field(8),
    })
}
