//! Command-line argument definitions for the eBird compiler
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the eBird checklist compiler
///
/// Compiles one summary (participants, effort, locations, species totals)
/// from a batch of eBird checklists.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ebird-compiler",
    version,
    about = "Compile a single summary from a batch of eBird checklists",
    long_about = "Downloads a batch of eBird checklists (or reads saved checklist pages), extracts \
                  date, location, participants, effort and species counts from each, and compiles \
                  one summary with de-duplicated participants, summed effort and a taxonomically \
                  sorted species list. Shared checklists are merged without double counting."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Compile a summary from checklist URLs or identifiers
    Compile(CompileArgs),
    /// Extract and show a single saved checklist page
    Inspect(InspectArgs),
}

/// Arguments for the compile command
#[derive(Debug, Clone, Parser)]
pub struct CompileArgs {
    /// Checklist URLs or identifiers (S12345678)
    ///
    /// When none are given, entries are read from --input-file, or from
    /// standard input when no file is given either. Entries are separated by
    /// whitespace.
    #[arg(value_name = "ENTRIES", help = "Checklist URLs or identifiers")]
    pub entries: Vec<String>,

    /// File containing checklist URLs or identifiers
    #[arg(
        short = 'i',
        long = "input-file",
        value_name = "FILE",
        help = "Read checklist URLs or identifiers from a file"
    )]
    pub input_file: Option<PathBuf>,

    /// Read saved checklist pages instead of downloading
    ///
    /// Glob pattern such as "pages/*.html". Each file's stem is its checklist
    /// identifier. With no entries given, every matching page is compiled.
    #[arg(
        long = "pages",
        value_name = "GLOB",
        help = "Compile saved checklist pages matching a glob pattern"
    )]
    pub pages: Option<String>,

    /// Path to the eBird taxonomy table (CSV)
    #[arg(
        short = 't',
        long = "taxonomy",
        value_name = "FILE",
        help = "Path to the eBird taxonomy CSV file"
    )]
    pub taxonomy: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// config.toml in the ebird-compiler user config directory.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Output format for the summary
    #[arg(
        long = "format",
        value_enum,
        default_value = "text",
        help = "Output format for the summary"
    )]
    pub output_format: OutputFormat,

    /// Skip robots.txt and use the configured default crawl delay
    #[arg(long = "ignore-robots", help = "Do not read robots.txt for a crawl delay")]
    pub ignore_robots: bool,

    /// Disable the progress bar
    #[arg(long = "no-progress", help = "Disable the progress bar")]
    pub no_progress: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors and the summary itself. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the inspect command
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// Saved checklist page (HTML)
    #[arg(value_name = "HTML_FILE", help = "Saved checklist page to extract")]
    pub html_file: PathBuf,

    /// Checklist identifier to report; defaults to the file stem
    #[arg(long = "identifier", value_name = "ID")]
    pub identifier: Option<String>,

    /// Path to the eBird taxonomy table (CSV)
    #[arg(short = 't', long = "taxonomy", value_name = "FILE")]
    pub taxonomy: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Output format for the extracted record
    #[arg(long = "format", value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON for scripting
    Json,
}

impl Commands {
    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        let (verbose, quiet) = match self {
            Commands::Compile(args) => (args.verbose, args.quiet),
            Commands::Inspect(args) => (args.verbose, false),
        };

        if quiet {
            "error"
        } else {
            match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Commands::Compile(args) if args.quiet)
    }
}

impl CompileArgs {
    /// Validate the compile arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(input_file) = &self.input_file {
            if !self.entries.is_empty() {
                return Err(Error::invalid_input(
                    "give checklist entries either as arguments or with --input-file, not both",
                ));
            }
            if !input_file.is_file() {
                return Err(Error::configuration(format!(
                    "Input file does not exist: {}",
                    input_file.display()
                )));
            }
        }

        if let Some(taxonomy) = &self.taxonomy {
            if taxonomy.is_dir() {
                return Err(Error::configuration(format!(
                    "Taxonomy path is a directory: {}",
                    taxonomy.display()
                )));
            }
        }

        Ok(())
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

impl InspectArgs {
    /// Validate the inspect arguments
    pub fn validate(&self) -> Result<()> {
        if !self.html_file.is_file() {
            return Err(Error::configuration(format!(
                "Checklist page does not exist: {}",
                self.html_file.display()
            )));
        }
        Ok(())
    }

    /// Identifier to report: explicit, else the file stem
    pub fn identifier(&self) -> String {
        self.identifier.clone().unwrap_or_else(|| {
            self.html_file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }
}
