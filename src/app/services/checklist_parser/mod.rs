//! Checklist page parsing
//!
//! This module turns the raw text of one eBird checklist page into a
//! [`ChecklistRecord`](crate::app::models::ChecklistRecord).
//!
//! # Architecture
//!
//! - [`extractor`] - The ordered field-by-field scan over one page
//! - [`field_parsers`] - Token conversion (dates, effort units, counts, entities)
//! - [`merge`] - Max-merge of a shared checklist's species sub-lists
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use ebird_compiler::app::services::checklist_parser::ChecklistExtractor;
//! use ebird_compiler::app::services::taxonomy::TaxonomyOrder;
//!
//! # fn example(taxonomy: TaxonomyOrder, html: &str) -> ebird_compiler::Result<()> {
//! let extractor = ChecklistExtractor::new(&taxonomy);
//! let record = extractor.extract("S76543210", html)?;
//! println!("{} species at {}", record.species.len(), record.location);
//! # Ok(())
//! # }
//! ```

pub mod extractor;
pub mod field_parsers;
pub mod merge;

#[cfg(test)]
pub mod tests;

pub use extractor::ChecklistExtractor;
pub use merge::merge_sublists;
