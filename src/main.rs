use clap::Parser;
use ebird_compiler::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to install CTRL+C signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            result = commands::run(args) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(ebird_compiler::Error::processing_interrupted(
                    "Interrupted by user",
                )
                .into())
            }
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("eBird Compiler - Checklist Summary Tool");
    println!("=======================================");
    println!();
    println!("Compile one summary (participants, distance, time, locations and");
    println!("species totals) from a batch of eBird checklists.");
    println!();
    println!("USAGE:");
    println!("    ebird-compiler <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    compile     Retrieve checklists and print the compiled summary");
    println!("    inspect     Extract a single saved checklist page");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Compile checklists given as URLs or identifiers:");
    println!("    ebird-compiler compile https://ebird.org/checklist/S76543210 S76543211");
    println!();
    println!("    # Compile a list of checklists from a file, as JSON:");
    println!("    ebird-compiler compile --input-file checklists.txt --format json");
    println!();
    println!("    # Compile saved pages without touching the network:");
    println!("    ebird-compiler compile --pages 'saved/*.html'");
    println!();
    println!("For detailed help on any command, use:");
    println!("    ebird-compiler <COMMAND> --help");
}
