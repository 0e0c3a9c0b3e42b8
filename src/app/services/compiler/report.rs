//! Plain-text summary report

use super::CompiledSummary;
use crate::app::models::SummaryRecord;
use crate::constants::MINUTES_PER_HOUR;
use colored::*;

/// Format a duration in minutes as "H hr, M min", or "M min" under an hour
pub fn format_duration(total_minutes: f64) -> String {
    let minutes = total_minutes.round().max(0.0) as u64;
    let per_hour = MINUTES_PER_HOUR as u64;

    if minutes < per_hour {
        format!("{} min", minutes)
    } else {
        format!("{} hr, {} min", minutes / per_hour, minutes % per_hour)
    }
}

/// Render the summary block followed by any date warning
///
/// With `highlight_warning` the "Warning:" label is printed in bold yellow
/// for terminal output.
pub fn format_report(compiled: &CompiledSummary, highlight_warning: bool) -> String {
    let mut out = format_summary(&compiled.summary);

    if let Some(warning) = &compiled.date_warning {
        let label = if highlight_warning {
            "Warning:".yellow().bold().to_string()
        } else {
            "Warning:".to_string()
        };
        out.push_str(&format!("\n{} {}\n", label, warning));
    }

    out
}

/// Render the summary block
pub fn format_summary(summary: &SummaryRecord) -> String {
    let (species, other_taxa) = summary.species_counts();

    let anonymous_note = if summary.includes_multiple_anonymous_contributors {
        " (participant count may be inexact due to anonymous checklists)"
    } else {
        ""
    };
    let other_taxa_note = if other_taxa > 0 {
        format!(" (+{} other taxa)", other_taxa)
    } else {
        String::new()
    };

    let mut out = String::from("Summary of observations:\n");
    out.push_str(&format!(
        "  Participants:    {}{}\n",
        summary.participant_count(),
        anonymous_note
    ));
    out.push_str(&format!(
        "  Total distance:  {:.1} miles\n",
        summary.total_distance_miles()
    ));
    out.push_str(&format!(
        "  Total time:      {}\n",
        format_duration(summary.total_minutes)
    ));
    out.push_str(&format!("  # Locations:     {}\n", summary.distinct_location_count));
    out.push_str(&format!("  # Species:       {}{}\n", species, other_taxa_note));
    out.push_str(&format!("  # Individuals:   {}\n", summary.total_individuals()));

    if !summary.species.is_empty() {
        let name_width = summary
            .species
            .iter()
            .map(|s| s.name.chars().count())
            .max()
            .unwrap_or_default();
        let count_width = summary
            .species
            .iter()
            .map(|s| s.display_count().len())
            .max()
            .unwrap_or_default();

        out.push_str("\n  Species list:\n");
        for entry in &summary.species {
            out.push_str(&format!(
                "    {:<name_width$}  {:>count_width$}\n",
                entry.name,
                entry.display_count(),
            ));
        }
    }

    out
}
