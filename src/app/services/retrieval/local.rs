//! Page source backed by saved checklist pages
//!
//! Pages are matched to checklists by file stem: `pages/S76543210.html`
//! serves checklist `S76543210`, whatever URL it is requested under.

use super::PageSource;
use super::input::{ChecklistTarget, checklist_identifier};
use crate::{Error, Result};
use glob::glob;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Saved HTML pages keyed by checklist identifier
#[derive(Debug, Clone, Default)]
pub struct LocalPageSource {
    pages: BTreeMap<String, PathBuf>,
}

impl LocalPageSource {
    /// Collect every file matching a glob pattern
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for a malformed pattern or one that
    /// matches no files.
    pub fn from_glob(pattern: &str) -> Result<Self> {
        let paths = glob(pattern).map_err(|e| {
            Error::invalid_input(format!("invalid page pattern '{}': {}", pattern, e))
        })?;

        let mut source = Self::default();
        for entry in paths {
            let path = entry.map_err(|e| {
                Error::io(format!("Failed to read {}", e.path().display()), e.into_error())
            })?;
            if path.is_file() {
                source.add_page(&path);
            }
        }

        if source.pages.is_empty() {
            return Err(Error::invalid_input(format!(
                "no saved pages match '{}'",
                pattern
            )));
        }

        info!("Found {} saved checklist page(s)", source.pages.len());
        Ok(source)
    }

    /// Register one saved page under its file stem
    pub fn add_page(&mut self, path: &Path) {
        if let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) {
            debug!("Saved page {} -> {}", stem, path.display());
            self.pages.insert(stem, path.to_path_buf());
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// One target per saved page, in identifier order
    pub fn targets(&self) -> Vec<ChecklistTarget> {
        self.pages
            .iter()
            .map(|(identifier, path)| ChecklistTarget {
                identifier: identifier.clone(),
                url: path.display().to_string(),
            })
            .collect()
    }

    fn lookup(&self, url: &str) -> Option<&PathBuf> {
        if let Some(path) = self.pages.values().find(|p| p.display().to_string() == url) {
            return Some(path);
        }
        checklist_identifier(url).and_then(|identifier| self.pages.get(&identifier))
    }
}

impl PageSource for LocalPageSource {
    fn fetch(&self, url: &str) -> Result<String> {
        let path = self
            .lookup(url)
            .ok_or_else(|| Error::retrieval(url, "no saved page for this checklist"))?;

        fs::read_to_string(path)
            .map_err(|e| Error::retrieval(url, format!("failed reading {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_pages(dir: &Path) {
        fs::write(dir.join("S100.html"), "<html>one</html>").unwrap();
        fs::write(dir.join("S200.html"), "<html>two</html>").unwrap();
        fs::write(dir.join("notes.txt"), "not a page").unwrap();
    }

    #[test]
    fn test_from_glob_collects_pages() {
        let temp_dir = TempDir::new().unwrap();
        create_pages(temp_dir.path());
        let pattern = format!("{}/*.html", temp_dir.path().display());

        let source = LocalPageSource::from_glob(&pattern).unwrap();

        assert_eq!(source.page_count(), 2);
        let ids: Vec<_> = source.targets().into_iter().map(|t| t.identifier).collect();
        assert_eq!(ids, vec!["S100", "S200"]);
    }

    #[test]
    fn test_fetch_by_path_or_checklist_url() {
        let temp_dir = TempDir::new().unwrap();
        create_pages(temp_dir.path());
        let source =
            LocalPageSource::from_glob(&format!("{}/*.html", temp_dir.path().display())).unwrap();

        let by_path = &source.targets()[0].url;
        assert_eq!(source.fetch(by_path).unwrap(), "<html>one</html>");
        assert_eq!(
            source.fetch("https://ebird.org/checklist/S200").unwrap(),
            "<html>two</html>"
        );

        let err = source.fetch("https://ebird.org/checklist/S999").unwrap_err();
        assert!(matches!(err, Error::Retrieval { .. }));
    }

    #[test]
    fn test_from_glob_without_matches() {
        let temp_dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.html", temp_dir.path().display());

        assert!(LocalPageSource::from_glob(&pattern).is_err());
        assert!(LocalPageSource::from_glob("[").is_err());
    }
}
