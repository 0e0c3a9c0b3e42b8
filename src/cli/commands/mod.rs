//! Command implementations for the eBird compiler CLI
//!
//! Each subcommand lives in its own module:
//! - `compile`: retrieve a batch of checklists and print the summary
//! - `inspect`: extract one saved checklist page and print the record
//! - `shared`: logging, configuration and taxonomy loading used by both

pub mod compile;
pub mod inspect;
pub mod shared;

use crate::cli::args::{Args, Commands};

/// Set up logging, then dispatch to the subcommand handler
pub async fn run(args: Args) -> anyhow::Result<()> {
    let Some(command) = args.command else {
        anyhow::bail!("no command given; run with --help for usage");
    };

    shared::setup_logging(command.get_log_level(), command.is_quiet())?;

    match command {
        Commands::Compile(compile_args) => compile::run_compile(compile_args).await,
        Commands::Inspect(inspect_args) => inspect::run_inspect(inspect_args).await,
    }
}
