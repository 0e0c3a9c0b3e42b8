//! Checklist compilation service
//!
//! Turns a batch of retrieved checklist pages into one summary.
//!
//! # Architecture
//!
//! - [`aggregator`] - Sum-merge across checklists, subspecies folding, sorting
//! - [`date_check`] - Date codes and the mixed-date warning
//! - [`report`] - Plain-text rendering of the summary
//!
//! Extraction of every page completes before aggregation begins. A single
//! page that fails extraction fails the whole batch, so a summary is never
//! built from a partial set of checklists.

use crate::Result;
use crate::app::models::{ChecklistRecord, SummaryRecord};
use crate::app::services::checklist_parser::ChecklistExtractor;
use crate::app::services::retrieval::FetchedDocument;
use crate::app::services::taxonomy::TaxonomyLookup;
use serde::Serialize;
use tracing::info;

pub mod aggregator;
pub mod date_check;
pub mod report;

#[cfg(test)]
pub mod tests;

pub use aggregator::{Aggregator, accumulate_species, strip_and_remerge, strip_subspecies};
pub use date_check::{DateCode, DateWarning};
pub use report::{format_report, format_summary};

/// Result of compiling a batch of checklists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledSummary {
    pub summary: SummaryRecord,

    /// Present when the checklists do not all share one date
    pub date_warning: Option<DateWarning>,

    pub checklist_count: usize,
}

/// Extract every document, then aggregate the records
///
/// # Errors
///
/// Returns the first extraction error; nothing is aggregated in that case.
pub fn compile_documents<T: TaxonomyLookup + ?Sized>(
    documents: &[FetchedDocument],
    taxonomy: &T,
) -> Result<CompiledSummary> {
    let extractor = ChecklistExtractor::new(taxonomy);

    let records = documents
        .iter()
        .map(|doc| extractor.extract(&doc.identifier, &doc.html))
        .collect::<Result<Vec<_>>>()?;

    compile_records(&records)
}

/// Aggregate already-extracted records
pub fn compile_records(records: &[ChecklistRecord]) -> Result<CompiledSummary> {
    info!("Aggregating {} checklist record(s)", records.len());

    let (summary, date_warning) = aggregator::aggregate(records)?;

    Ok(CompiledSummary {
        summary,
        date_warning,
        checklist_count: records.len(),
    })
}
