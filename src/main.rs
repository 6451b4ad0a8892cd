// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so JSON on stdout stays clean)
// 3. Create the one shared HTTP client and build the snapshot with it
// 4. Print the snapshot and exit with a proper code
//    (0 = complete, 1 = some files skipped, 2 = error)
//
// The HttpFetcher is created before the first request and dropped only when
// `run` returns, after the builder has awaited every fetch.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod blame;    // src/blame/ - data model and blame page extraction
mod cli;      // src/cli.rs - command-line parsing
mod error;    // src/error.rs - error taxonomy
mod github;   // src/github/ - HTTP fetching, tree listing, blame URLs
mod snapshot; // src/snapshot/ - per-file loading and the snapshot builder

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use blame::Snapshot;
use cli::Cli;
use github::{FetcherConfig, GithubTreeLister, HttpFetcher};
use snapshot::SnapshotBuilder;

// The #[tokio::main] attribute transforms our async main into a real main function
#[tokio::main]
async fn main() {
    // Parse command-line arguments (handles --help and --version too)
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Run our application logic and capture the exit code
    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole anyhow context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins over --verbose when it is set
fn init_logging(verbose: bool) {
    let default = if verbose {
        "blame_snapshot=debug"
    } else {
        "blame_snapshot=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// This is the main application logic
// Returns:
//   Ok(0) = every file was loaded
//   Ok(1) = snapshot printed, but some files were skipped
//   Err = listing failed, or a file failed under fail-fast
async fn run(cli: Cli) -> Result<i32> {
    // Build the one HTTP client shared by every request
    // The timeout is only set when --timeout-secs was given
    let fetcher_config = FetcherConfig {
        timeout: cli.timeout_secs.map(Duration::from_secs),
        ..FetcherConfig::default()
    };
    let fetcher = HttpFetcher::new(&fetcher_config).context("could not create HTTP client")?;

    // The lister borrows the same client for the git trees API call
    let lister = GithubTreeLister::new(&fetcher, cli.api_host.clone());

    // List, fetch and extract everything
    // `fetcher` outlives this await, so no request can lose its client
    let builder = SnapshotBuilder::new(&lister, &fetcher, cli.crawl_config());
    let snapshot = builder
        .build(&cli.repo, &cli.revision)
        .await
        .with_context(|| format!("could not snapshot {}@{}", cli.repo, cli.revision))?;

    print_snapshot(&snapshot, cli.json)?;

    if snapshot.is_complete() {
        Ok(0) // Exit code 0 = complete snapshot
    } else {
        Ok(1) // Exit code 1 = some files skipped
    }
}

// Prints the snapshot either as a table or JSON
fn print_snapshot(snapshot: &Snapshot, json: bool) -> Result<()> {
    if json {
        // Serialize the whole snapshot (every hunk and line) and print
        let output = serde_json::to_string_pretty(snapshot)?;
        println!("{}", output);
    } else {
        // Print a human-readable per-file summary
        print_table(snapshot);
    }
    Ok(())
}

// Prints one row per file, then a summary
fn print_table(snapshot: &Snapshot) {
    println!("📸 {} @ {}", snapshot.repo, snapshot.revision);
    println!();

    // Print table header
    println!("{:<70} {:>7} {:>7} {:>9}", "FILE", "HUNKS", "LINES", "COMMENTS");
    println!("{}", "=".repeat(96));

    // Print each file, in listing order
    for file in &snapshot.files {
        // Count across all hunks of the file
        let lines = file.lines().count();
        let comments = file.lines().filter(|l| l.is_comment).count();

        // Truncate URL if too long for display
        let url_display = if file.url.len() > 67 {
            format!("...{}", &file.url[file.url.len() - 64..])
        } else {
            file.url.clone()
        };

        println!(
            "{:<70} {:>7} {:>7} {:>9}",
            url_display,
            file.hunks.len(),
            lines,
            comments
        );
    }

    println!();

    // Print summary
    println!("📊 Summary:");
    println!("   📄 Files: {}", snapshot.files.len());
    println!("   📝 Lines: {}", snapshot.line_count());
    println!("   💬 Comment lines: {}", snapshot.comment_line_count());

    // Skipped files only exist under --skip-failures
    if !snapshot.failures.is_empty() {
        println!("   ⚠️  Skipped: {}", snapshot.failures.len());
        for failure in &snapshot.failures {
            println!("      {}: {}", failure.url, failure.cause);
        }
    }
}
