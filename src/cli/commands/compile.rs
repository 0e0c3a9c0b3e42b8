//! Compile command implementation
//!
//! Resolves the batch of checklists, picks a page source (saved pages or the
//! throttled HTTP retriever), retrieves every page, then extracts and
//! aggregates them into one summary.

use super::shared::{load_configuration, load_taxonomy, read_batch_text};
use crate::app::services::compiler::{CompiledSummary, compile_documents, format_report};
use crate::app::services::retrieval::batch::create_retrieval_progress_bar;
use crate::app::services::retrieval::{
    ChecklistTarget, HtmlRetriever, LocalPageSource, PageSource, parse_batch_input,
    resolve_crawl_delay, retrieve_batch,
};
use crate::cli::args::{CompileArgs, OutputFormat};
use crate::config::Config;
use anyhow::Context;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Run the compile command
pub async fn run_compile(args: CompileArgs) -> anyhow::Result<()> {
    let start_time = Instant::now();
    info!("Starting eBird compiler");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let mut config = load_configuration(args.config_file.as_deref(), args.taxonomy.as_deref())?;
    if !args.show_progress() {
        config = config.without_progress();
    }
    if args.ignore_robots {
        config = config.without_robots_txt();
    }

    let (source, targets) = prepare_source(&args, &config).await?;
    info!("Compiling {} checklist(s)", targets.len());

    let taxonomy = load_taxonomy(&config).await?;

    let progress = config
        .show_progress
        .then(|| create_retrieval_progress_bar(targets.len() as u64));
    let documents = retrieve_batch(source, targets, progress).await?;

    let compiled = compile_documents(&documents, &taxonomy)?;
    info!(
        "Compiled {} checklist(s) in {:.1}s",
        compiled.checklist_count,
        start_time.elapsed().as_secs_f64()
    );

    print_summary(&compiled, args.output_format)
}

/// Choose the page source and build the target list
async fn prepare_source(
    args: &CompileArgs,
    config: &Config,
) -> anyhow::Result<(Arc<dyn PageSource>, Vec<ChecklistTarget>)> {
    if let Some(pattern) = &args.pages {
        let local = LocalPageSource::from_glob(pattern)?;
        let targets = if args.entries.is_empty() && args.input_file.is_none() {
            local.targets()
        } else {
            let text = batch_text(args).await?;
            parse_batch_input(&text, &config.checklist_base_url)?
        };
        let source: Arc<dyn PageSource> = Arc::new(local);
        return Ok((source, targets));
    }

    let text = batch_text(args).await?;
    let targets = parse_batch_input(&text, &config.checklist_base_url)?;

    let retriever = Arc::new(HtmlRetriever::from_config(config, config.default_crawl_delay()));
    if config.respect_robots_txt {
        let probe = Arc::clone(&retriever);
        let first_url = targets[0].url.clone();
        let default_delay = config.default_crawl_delay();

        let delay = tokio::task::spawn_blocking(move || {
            resolve_crawl_delay(probe.as_ref(), &first_url, probe.user_agent(), default_delay)
        })
        .await
        .context("robots.txt lookup task failed")?;

        retriever.set_crawl_delay(delay);
    }
    info!("Crawl delay: {:?}", retriever.crawl_delay());

    let source: Arc<dyn PageSource> = retriever;
    Ok((source, targets))
}

async fn batch_text(args: &CompileArgs) -> anyhow::Result<String> {
    if args.entries.is_empty() {
        read_batch_text(args.input_file.as_ref()).await
    } else {
        Ok(args.entries.join("\n"))
    }
}

fn print_summary(compiled: &CompiledSummary, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            print!("{}", format_report(compiled, true));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(compiled)
                .context("Failed to serialize summary as JSON")?;
            println!("{}", json);
        }
    }
    Ok(())
}
