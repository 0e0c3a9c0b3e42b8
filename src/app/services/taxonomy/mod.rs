//! Taxonomy lookup service
//!
//! This module loads the eBird taxonomy reference table once and answers
//! "what is the taxonomic sequence key of species X" by exact common-name
//! match. Sequence keys give the summary its field-guide ordering.
//!
//! The table is downloadable from
//! <https://www.birds.cornell.edu/clementschecklist/download/>.

use crate::app::models::TaxonomyEntry;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

pub mod loader;
pub mod parser;

#[cfg(test)]
pub mod tests;

/// Resolves a species common name to its taxonomic sequence key
///
/// The extractor only needs this one question answered, so tests and
/// alternative sources can stand in for the full table.
pub trait TaxonomyLookup {
    /// Sequence key for an exact common name, or `None` if unknown
    fn taxonomic_order(&self, common_name: &str) -> Option<u32>;
}

impl TaxonomyLookup for HashMap<String, u32> {
    fn taxonomic_order(&self, common_name: &str) -> Option<u32> {
        self.get(common_name).copied()
    }
}

/// The loaded taxonomy table, indexed by common name
#[derive(Debug, Clone, Default)]
pub struct TaxonomyOrder {
    /// Rows in file order
    pub(crate) entries: Vec<TaxonomyEntry>,

    /// Common name to row index; the first row with a given name wins
    pub(crate) index: HashMap<String, usize>,

    /// File the table was loaded from, if any
    pub(crate) source_path: Option<PathBuf>,
}

impl TaxonomyOrder {
    /// Create an empty taxonomy
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a taxonomy from rows, keeping file order
    pub fn from_entries(entries: Vec<TaxonomyEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if let std::collections::hash_map::Entry::Vacant(e) =
                index.entry(entry.common_name.clone())
            {
                e.insert(position);
            } else {
                warn!(
                    "Duplicate taxonomy common name '{}' (sequence {}), keeping first",
                    entry.common_name, entry.sequence_key
                );
            }
        }

        Self {
            entries,
            index,
            source_path: None,
        }
    }

    /// Look up the full taxonomy row for a common name
    pub fn get(&self, common_name: &str) -> Option<&TaxonomyEntry> {
        self.index
            .get(common_name)
            .and_then(|&position| self.entries.get(position))
    }

    /// Number of rows loaded
    pub fn taxon_count(&self) -> usize {
        self.entries.len()
    }

    /// Path the table was loaded from, if it came from a file
    pub fn source_path(&self) -> Option<&std::path::Path> {
        self.source_path.as_deref()
    }
}

impl TaxonomyLookup for TaxonomyOrder {
    fn taxonomic_order(&self, common_name: &str) -> Option<u32> {
        self.get(common_name).map(|entry| entry.sequence_key)
    }
}
