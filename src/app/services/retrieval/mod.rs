//! Checklist page retrieval
//!
//! Everything that gets page text into the compiler: interpreting the batch
//! input, polite HTTP fetching (robots.txt crawl delay, throttling), reading
//! saved pages from disk, and running a batch of fetches concurrently.
//!
//! # Architecture
//!
//! - [`input`] - Batch input parsing into checklist targets
//! - [`http`] - HTTP page source with cookies and throttling
//! - [`throttle`] - Minimum interval between accesses to a shared resource
//! - [`robots`] - robots.txt crawl-delay discovery
//! - [`local`] - Page source backed by saved HTML files
//! - [`batch`] - Concurrent, all-or-nothing batch retrieval

use crate::Result;
use serde::Serialize;

pub mod batch;
pub mod http;
pub mod input;
pub mod local;
pub mod robots;
pub mod throttle;

pub use batch::retrieve_batch;
pub use http::HtmlRetriever;
pub use input::{ChecklistTarget, checklist_identifier, parse_batch_input};
pub use local::LocalPageSource;
pub use robots::{RobotsTxt, base_url, resolve_crawl_delay};
pub use throttle::ThrottledSection;

/// Anything that can return the text behind a URL
///
/// Implementations must be shareable across the blocking worker threads used
/// for batch retrieval.
pub trait PageSource: Send + Sync {
    /// Fetch the full text at `url`
    ///
    /// # Errors
    ///
    /// Returns `Error::Retrieval` naming the URL when the text cannot be
    /// obtained.
    fn fetch(&self, url: &str) -> Result<String>;
}

/// A retrieved checklist page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedDocument {
    pub identifier: String,
    pub url: String,
    #[serde(skip)]
    pub html: String,
}
