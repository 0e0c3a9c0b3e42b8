//! Shared components for CLI commands
//!
//! Logging setup, layered configuration loading, batch input reading and
//! taxonomy loading used by more than one command.

use crate::app::services::retrieval::{HtmlRetriever, PageSource};
use crate::app::services::taxonomy::TaxonomyOrder;
use crate::config::{Config, default_config_path};
use crate::{Error, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the level derived from the verbosity
/// flags.
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ebird_compiler={}", log_level)));

    let result = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using the layered approach (file -> env -> args)
pub fn load_configuration(
    config_file: Option<&Path>,
    taxonomy_override: Option<&Path>,
) -> Result<Config> {
    match config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => info!("Using config file: {}", path.display()),
            None => info!("No config file found, using defaults and environment variables"),
        },
    }

    let mut config = Config::load_layered(config_file, |key| std::env::var(key).ok())?;

    if let Some(path) = taxonomy_override {
        config = config.with_taxonomy_path(path);
    }

    config.validate()?;
    Ok(config)
}

/// Read the raw batch text: an input file if given, otherwise standard input
pub async fn read_batch_text(input_file: Option<&PathBuf>) -> anyhow::Result<String> {
    match input_file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read checklist list {}", path.display())),
        None => {
            info!("Reading checklist URLs from standard input");
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read checklist URLs from standard input")?;
            Ok(text)
        }
    }
}

/// Load the taxonomy table on the blocking pool, downloading it if missing
pub async fn load_taxonomy(config: &Config) -> anyhow::Result<TaxonomyOrder> {
    let path = config.taxonomy_path.clone();
    let download_url = config.taxonomy_url.clone();
    let source: Arc<dyn PageSource> =
        Arc::new(HtmlRetriever::from_config(config, Duration::ZERO));

    let taxonomy = tokio::task::spawn_blocking(move || {
        TaxonomyOrder::load_or_download(&path, source.as_ref(), download_url.as_deref())
    })
    .await
    .context("Taxonomy loading task failed")??;

    match taxonomy.source_path() {
        Some(loaded_from) => info!(
            "Loaded {} taxa from {}",
            taxonomy.taxon_count(),
            loaded_from.display()
        ),
        None => info!("Loaded {} taxa", taxonomy.taxon_count()),
    }
    Ok(taxonomy)
}
