//! Inspect command implementation
//!
//! Extracts a single saved checklist page and prints the structured record,
//! which is the quickest way to see why a page fails extraction.

use super::shared::{load_configuration, load_taxonomy};
use crate::app::models::ChecklistRecord;
use crate::app::services::checklist_parser::ChecklistExtractor;
use crate::app::services::compiler::report::format_duration;
use crate::cli::args::{InspectArgs, OutputFormat};
use crate::constants::MILES_PER_KM;
use anyhow::Context;
use tracing::info;

/// Run the inspect command
pub async fn run_inspect(args: InspectArgs) -> anyhow::Result<()> {
    args.validate()?;

    let config = load_configuration(args.config_file.as_deref(), args.taxonomy.as_deref())?;
    let taxonomy = load_taxonomy(&config).await?;

    let html = tokio::fs::read_to_string(&args.html_file)
        .await
        .with_context(|| format!("Failed to read {}", args.html_file.display()))?;

    let identifier = args.identifier();
    info!("Extracting checklist {} from {}", identifier, args.html_file.display());
    let record = ChecklistExtractor::new(&taxonomy).extract(&identifier, &html)?;

    match args.output_format {
        OutputFormat::Text => print!("{}", format_record(&record)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&record)
                .context("Failed to serialize checklist as JSON")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Render one extracted checklist
pub fn format_record(record: &ChecklistRecord) -> String {
    let mut out = format!("Checklist {}:\n", record.identifier);

    out.push_str(&format!("  Date:          {}\n", record.date.format("%Y-%m-%d")));
    out.push_str(&format!("  Location:      {}\n", record.location));
    out.push_str(&format!("  Participants:  {}\n", record.participants.join(", ")));
    out.push_str(&format!("  Protocol:      {}\n", record.observation_method));
    if record.observation_method.has_duration() {
        out.push_str(&format!(
            "  Duration:      {}\n",
            format_duration(record.duration_minutes)
        ));
    }
    if record.observation_method.has_distance() {
        out.push_str(&format!(
            "  Distance:      {:.2} miles\n",
            record.distance_km * MILES_PER_KM
        ));
    }
    out.push_str(&format!("  Individuals:   {}\n", record.total_individuals()));
    out.push_str("  Species:\n");
    for entry in &record.species {
        out.push_str(&format!(
            "    {:>6}  {} [{}]\n",
            entry.display_count(),
            entry.name,
            entry.taxonomic_order
        ));
    }

    out
}
