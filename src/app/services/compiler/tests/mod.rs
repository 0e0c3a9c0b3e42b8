//! Shared test utilities and fixtures for compiler tests

use crate::app::services::retrieval::FetchedDocument;


/// Wrap page HTML as a retrieved document
pub fn create_test_document(identifier: &str, html: String) -> FetchedDocument {
    FetchedDocument {
        identifier: identifier.to_string(),
        url: format!("https://ebird.org/checklist/{}", identifier),
        html,
    }
}
