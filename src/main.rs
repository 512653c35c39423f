use clap::Parser;
use scan_splitter::cli::{self, Args};
use scan_splitter::SplitterError;
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
        tokio::select! {
            result = cli::run(args) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(anyhow::Error::from(SplitterError::ProcessingInterrupted {
                    reason: "Processing interrupted by user".to_string(),
                }))
            }
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Scan Splitter - Composite Body Scan Export Splitter");
    println!("===================================================");
    println!();
    println!("Split composite scan exports into anthro measurement and landmark");
    println!("tables, then aggregate many subjects into a single table.");
    println!();
    println!("USAGE:");
    println!("    scan-splitter <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    single      Split one composite scan file");
    println!("    batch       Split every composite scan in a directory");
    println!("    aggregate   Aggregate split anthro files into one table");
    println!("    run         Batch split a directory, then aggregate it");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Split all *_composite.txt scans below a directory:");
    println!("    scan-splitter batch /path/to/scans --recurse");
    println!();
    println!("    # Aggregate with a canonical name list and a default location:");
    println!("    scan-splitter aggregate /path/to/scans --names names.csv --location-fill CPEN");
    println!();
    println!("For detailed help on any command, use:");
    println!("    scan-splitter <COMMAND> --help");
}
