//! Taxonomy table loading
//!
//! Reads the taxonomy reference table from disk (or any reader), optionally
//! downloading it first when the local copy is missing.

use super::TaxonomyOrder;
use super::parser::{header_matches, parse_taxonomy_record};
use crate::app::services::retrieval::PageSource;
use crate::constants::TAXONOMY_COLUMNS;
use crate::{Error, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

impl TaxonomyOrder {
    /// Load the taxonomy table from a CSV file
    ///
    /// # Errors
    ///
    /// Returns `Error::Taxonomy` if the file is missing or has the wrong
    /// header, and `Error::CsvParsing` for malformed CSV.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(missing_table_error(path));
        }

        let file = File::open(path)
            .map_err(|e| Error::io(format!("Failed to open taxonomy file {}", path.display()), e))?;

        let mut taxonomy = Self::from_reader(file, &path.display().to_string())?;
        taxonomy.source_path = Some(path.to_path_buf());
        Ok(taxonomy)
    }

    /// Load the taxonomy table from any reader
    ///
    /// # Arguments
    ///
    /// * `reader` - CSV text with the taxonomy header row
    /// * `source_name` - Name used in error messages
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut records = csv_reader.records();

        let header = match records.next() {
            Some(result) => result.map_err(|e| {
                Error::csv_parsing(source_name, "Failed to read taxonomy header", Some(e))
            })?,
            None => {
                return Err(Error::taxonomy(format!(
                    "Taxonomy file '{}' is empty",
                    source_name
                )));
            }
        };

        if !header_matches(&header) {
            return Err(Error::taxonomy(format!(
                "Unexpected header in '{}': expected {}, found {}",
                source_name,
                TAXONOMY_COLUMNS.join(","),
                describe_header(&header)
            )));
        }

        let mut entries = Vec::new();
        for result in records {
            let record = result.map_err(|e| {
                Error::csv_parsing(source_name, "Malformed taxonomy row", Some(e))
            })?;

            // Blank lines that survive the reader show up as one empty field
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            let line = record.position().map(|p| p.line()).unwrap_or_default();
            entries.push(parse_taxonomy_record(&record, line)?);
        }

        debug!("Parsed {} taxonomy rows from {}", entries.len(), source_name);

        let taxonomy = Self::from_entries(entries);
        info!(
            "Loaded {} taxa from {}",
            taxonomy.taxon_count(),
            source_name
        );
        Ok(taxonomy)
    }

    /// Load the taxonomy table, downloading it first if it is missing
    ///
    /// When `path` does not exist and `download_url` is set, the table is
    /// fetched through `source`, saved to `path` (creating parent
    /// directories), then parsed.
    pub fn load_or_download(
        path: &Path,
        source: &dyn PageSource,
        download_url: Option<&str>,
    ) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        let Some(url) = download_url else {
            return Err(missing_table_error(path));
        };

        warn!(
            "Taxonomy file {} not found, downloading from {}",
            path.display(),
            url
        );
        let text = source.fetch(url)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::io(
                    format!("Failed to create taxonomy directory {}", parent.display()),
                    e,
                )
            })?;
        }
        fs::write(path, &text).map_err(|e| {
            Error::io(format!("Failed to save taxonomy file {}", path.display()), e)
        })?;
        info!("Saved taxonomy table to {}", path.display());

        let mut taxonomy = Self::from_reader(text.as_bytes(), &path.display().to_string())?;
        taxonomy.source_path = Some(path.to_path_buf());
        Ok(taxonomy)
    }
}

fn missing_table_error(path: &Path) -> Error {
    Error::taxonomy(format!(
        "Taxonomy file not found at '{}'. Download eBird_Taxonomy.csv from \
         https://www.birds.cornell.edu/clementschecklist/download/ or set taxonomy_url",
        path.display()
    ))
}

fn describe_header(header: &StringRecord) -> String {
    header.iter().collect::<Vec<_>>().join(",")
}
