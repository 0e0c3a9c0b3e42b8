//! Batch input parsing
//!
//! A batch is a whitespace-separated list of entries. Each entry is a
//! checklist URL or a bare checklist identifier (`S76543210`), which is
//! expanded against the configured base URL.

use crate::constants::CHECKLIST_ID_PREFIX;
use crate::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// One checklist to retrieve
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistTarget {
    pub identifier: String,
    pub url: String,
}

impl ChecklistTarget {
    /// Build a target from a URL, deriving the identifier from its path
    pub fn from_url(url: &str) -> Result<Self> {
        let identifier = checklist_identifier(url).ok_or_else(|| {
            Error::invalid_input(format!("cannot determine checklist identifier from '{}'", url))
        })?;

        Ok(Self {
            identifier,
            url: url.to_string(),
        })
    }
}

/// Last non-empty path segment of a URL, with any query string dropped
pub fn checklist_identifier(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Parse a batch of entries into targets
///
/// Duplicate URLs are collapsed, keeping first-seen order.
///
/// # Errors
///
/// Returns `Error::InvalidInput` for an empty batch or an entry that is
/// neither a URL nor a checklist identifier.
pub fn parse_batch_input(input: &str, checklist_base_url: &str) -> Result<Vec<ChecklistTarget>> {
    let id_pattern = Regex::new(&format!(r"^{}\d+$", CHECKLIST_ID_PREFIX))
        .map_err(|e| Error::configuration(format!("invalid identifier pattern: {}", e)))?;

    let mut seen = HashSet::new();
    let mut targets = Vec::new();

    for entry in input.split_whitespace() {
        let url = if entry.starts_with("http://") || entry.starts_with("https://") {
            entry.to_string()
        } else if id_pattern.is_match(entry) {
            expand_identifier(entry, checklist_base_url)
        } else {
            return Err(Error::invalid_input(format!(
                "'{}' is not a checklist URL or identifier",
                entry
            )));
        };

        if !seen.insert(url.clone()) {
            debug!("Skipping duplicate checklist {}", url);
            continue;
        }
        targets.push(ChecklistTarget::from_url(&url)?);
    }

    if targets.is_empty() {
        return Err(Error::invalid_input("no checklist URLs found"));
    }

    Ok(targets)
}

fn expand_identifier(identifier: &str, checklist_base_url: &str) -> String {
    let separator = if checklist_base_url.ends_with('/') { "" } else { "/" };
    format!("{}{}{}", checklist_base_url, separator, identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://ebird.org/checklist/";

    #[test]
    fn test_checklist_identifier() {
        assert_eq!(
            checklist_identifier("https://ebird.org/checklist/S76543210").as_deref(),
            Some("S76543210")
        );
        assert_eq!(
            checklist_identifier("https://ebird.org/checklist/S76543210/").as_deref(),
            Some("S76543210")
        );
        assert_eq!(
            checklist_identifier("https://ebird.org/checklist/S1?share=true").as_deref(),
            Some("S1")
        );
        assert_eq!(checklist_identifier(""), None);
    }

    #[test]
    fn test_parse_mixed_entries() {
        let input = "https://ebird.org/checklist/S100\n  S200\tS300?";
        assert!(parse_batch_input(input, BASE).is_err());

        let targets = parse_batch_input(
            "https://ebird.org/checklist/S100\n  S200\thttp://example.org/c/S300?x=1",
            BASE,
        )
        .unwrap();

        assert_eq!(
            targets,
            vec![
                ChecklistTarget {
                    identifier: "S100".to_string(),
                    url: "https://ebird.org/checklist/S100".to_string(),
                },
                ChecklistTarget {
                    identifier: "S200".to_string(),
                    url: "https://ebird.org/checklist/S200".to_string(),
                },
                ChecklistTarget {
                    identifier: "S300".to_string(),
                    url: "http://example.org/c/S300?x=1".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_collapses_duplicates_in_order() {
        let targets = parse_batch_input(
            "S2 S1 https://ebird.org/checklist/S2 S1",
            "https://ebird.org/checklist",
        )
        .unwrap();

        let ids: Vec<_> = targets.iter().map(|t| t.identifier.as_str()).collect();
        assert_eq!(ids, vec!["S2", "S1"]);
    }

    #[test]
    fn test_parse_rejects_invalid_entries() {
        for input in ["ebird.org/checklist/S1", "12345", "s123", "S12a", "ftp://x/S1"] {
            let err = parse_batch_input(input, BASE).unwrap_err();
            assert!(matches!(err, Error::InvalidInput { .. }), "{}", input);
        }
    }

    #[test]
    fn test_parse_empty_batch() {
        let err = parse_batch_input(" \n\t ", BASE).unwrap_err();
        assert!(err.to_string().contains("no checklist URLs found"));
    }
}
