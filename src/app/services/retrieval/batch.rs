//! Concurrent batch retrieval
//!
//! Each fetch runs on tokio's blocking pool; pacing is left to the page
//! source. The batch is all-or-nothing: the first failed fetch fails the
//! whole batch and fetches that have not started yet are skipped. Documents
//! come back in target order.

use super::{ChecklistTarget, FetchedDocument, PageSource};
use crate::{Error, Result};
use futures::future::try_join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Create the progress bar shown while a batch downloads
pub fn create_retrieval_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message("Retrieving checklists...");
    pb
}

/// Retrieve every target
///
/// # Errors
///
/// Returns the first retrieval error, or `Error::ProcessingInterrupted` if a
/// worker task panicked or was cancelled.
pub async fn retrieve_batch(
    source: Arc<dyn PageSource>,
    targets: Vec<ChecklistTarget>,
    progress: Option<ProgressBar>,
) -> Result<Vec<FetchedDocument>> {
    info!("Retrieving {} checklist page(s)", targets.len());
    let failed = Arc::new(AtomicBool::new(false));

    let tasks = targets.into_iter().map(|target| {
        let source = Arc::clone(&source);
        let failed = Arc::clone(&failed);
        let progress = progress.clone();

        async move {
            let handle = tokio::task::spawn_blocking(move || {
                if failed.load(Ordering::Acquire) {
                    debug!("Skipping {} after an earlier failure", target.identifier);
                    return Ok(None);
                }
                let html = source.fetch(&target.url).inspect_err(|_| {
                    failed.store(true, Ordering::Release);
                })?;
                debug!("Retrieved {} ({} bytes)", target.identifier, html.len());
                Ok::<_, Error>(Some(FetchedDocument {
                    identifier: target.identifier,
                    url: target.url,
                    html,
                }))
            });

            let document = handle.await.map_err(|e| {
                Error::processing_interrupted(format!("retrieval task failed: {}", e))
            })??;

            if let (Some(pb), Some(document)) = (&progress, &document) {
                pb.inc(1);
                pb.set_message(format!("Retrieved {}", document.identifier));
            }
            Ok::<_, Error>(document)
        }
    });

    // Skipped fetches yield `None`; the failure that caused them is the error
    let result = try_join_all(tasks).await.and_then(|documents| {
        documents
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::processing_interrupted("batch aborted after a failed fetch"))
    });

    if let Some(pb) = &progress {
        match &result {
            Ok(documents) => pb.finish_with_message(format!("Retrieved {} checklists", documents.len())),
            Err(_) => pb.abandon_with_message("Retrieval failed"),
        }
    }

    result
}
