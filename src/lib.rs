//! eBird Compiler Library
//!
//! A Rust library for compiling a single summary report out of a batch of
//! eBird checklist pages.
//!
//! This library provides tools for:
//! - Scanning checklist HTML for literal markers with a forward-only cursor
//! - Extracting one structured record (date, location, participants, effort,
//!   species) per checklist page
//! - Resolving species names to taxonomic sequence keys
//! - Merging shared-checklist sub-lists and aggregating many checklists into
//!   one de-duplicated, taxonomically sorted summary
//! - Polite page retrieval (robots.txt crawl delay, throttling)

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod checklist_parser;
        pub mod compiler;
        pub mod retrieval;
        pub mod tag_scanner;
        pub mod taxonomy;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    ChecklistField, ChecklistRecord, ObservationMethod, SpeciesEntry, SummaryRecord,
};
pub use config::Config;

/// Result type alias for the checklist compiler
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for checklist extraction, aggregation and retrieval
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Taxonomy table could not be loaded
    #[error("Taxonomy error: {message}")]
    Taxonomy { message: String },

    /// Species name missing from the taxonomy table
    #[error("Species not found in taxonomy: '{name}'")]
    TaxonNotFound { name: String },

    /// A checklist page is missing a required field or the field is malformed
    #[error("Failed to extract {field} from checklist {identifier}: {message}")]
    Extraction {
        identifier: String,
        field: ChecklistField,
        message: String,
    },

    /// A page could not be retrieved
    #[error("Failed to download checklist from {url}: {message}")]
    Retrieval { url: String, message: String },

    /// Batch input could not be interpreted
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a taxonomy loading error
    pub fn taxonomy(message: impl Into<String>) -> Self {
        Self::Taxonomy {
            message: message.into(),
        }
    }

    /// Create a taxon not found error
    pub fn taxon_not_found(name: impl Into<String>) -> Self {
        Self::TaxonNotFound { name: name.into() }
    }

    /// Create a field-level extraction error
    pub fn extraction(
        identifier: impl Into<String>,
        field: ChecklistField,
        message: impl Into<String>,
    ) -> Self {
        Self::Extraction {
            identifier: identifier.into(),
            field,
            message: message.into(),
        }
    }

    /// Create a retrieval error
    pub fn retrieval(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Retrieval {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// The checklist field that failed, if this is an extraction error
    pub fn failed_field(&self) -> Option<ChecklistField> {
        match self {
            Self::Extraction { field, .. } => Some(*field),
            _ => None,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid configuration file: {}", error),
        }
    }
}
