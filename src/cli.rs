// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There is a single command: give it a repository and a revision and it
// prints the blame snapshot for that revision.
//
//   blame-snapshot tikv/tikv 25862308221cb5f332b3761f0f090ace64db0bc3 --json
//
// Everything the crawl needs is configured here: there is no config file and
// no environment variable besides RUST_LOG (read by the logger in main.rs).
//
// Rust concepts:
// - Derive macros: clap generates the parser from the struct definition
// - Option<T>: an optional flag that may be absent
// - impl blocks: turning parsed flags into the builder's settings
// =============================================================================

use clap::Parser;

use crate::snapshot::{CrawlConfig, FailurePolicy};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// Each field becomes a positional argument or a --flag
#[derive(Parser, Debug)]
#[command(
    name = "blame-snapshot",
    version,
    about = "Capture per-line blame data for every file of a GitHub repository revision",
    long_about = "blame-snapshot lists every file at a revision, fetches each file's blame page \
                  concurrently, and reports when each line was last changed and whether it is a comment."
)]
pub struct Cli {
    /// Repository in owner/name form (e.g., tikv/tikv)
    ///
    /// This is a positional argument (required, no flag needed)
    pub repo: String,

    /// Commit SHA, branch or tag to snapshot
    ///
    /// Branch names may contain slashes (e.g., release/1.0)
    pub revision: String,

    /// Output the snapshot as JSON instead of a summary table
    ///
    /// This is an optional flag: --json
    #[arg(long)]
    pub json: bool,

    /// Maximum number of blame pages fetched at once (default: 16)
    ///
    /// Higher is faster but more likely to hit GitHub's rate limits.
    /// A value of 0 is treated as 1.
    #[arg(long, default_value_t = 16)]
    pub concurrency: usize,

    /// Record files that fail to load instead of failing the whole snapshot
    ///
    /// Without this flag, the first failing file (in listing order) aborts
    /// the run with exit code 2. With it, failures are listed and the exit
    /// code is 1.
    #[arg(long)]
    pub skip_failures: bool,

    /// Per-request timeout in seconds (default: no timeout)
    ///
    /// Option<u64> means the flag can be left out entirely
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Host serving blame pages (default: github.com)
    #[arg(long, default_value = "github.com")]
    pub host: String,

    /// Host serving the git trees API (default: api.github.com)
    #[arg(long, default_value = "api.github.com")]
    pub api_host: String,

    /// Verbose (debug) logging
    ///
    /// Ignored when RUST_LOG is set
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    // Collects the flags the snapshot builder cares about
    // (the transport flags are read separately in main.rs)
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            blame_host: self.host.clone(),
            concurrency: self.concurrency,
            policy: if self.skip_failures {
                FailurePolicy::SkipAndReport
            } else {
                FailurePolicy::FailFast
            },
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is `revision` a String and not a typed commit id?
//    - GitHub accepts a SHA, a branch or a tag in the same URL position
//    - We pass it through untouched, so one String covers all three
//
// 2. What does default_value_t do?
//    - It gives the field a typed default (here the usize 16)
//    - default_value (without _t) takes a string instead, used for hosts
//
// 3. Why a crawl_config() method instead of passing Cli around?
//    - The builder should not know about the command line
//    - Tests can build a CrawlConfig directly without parsing arguments
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["blame-snapshot", "tikv/tikv", "abc123"]);
        assert_eq!(cli.repo, "tikv/tikv");
        assert_eq!(cli.revision, "abc123");
        assert!(!cli.json);
        assert_eq!(cli.timeout_secs, None);

        let config = cli.crawl_config();
        assert_eq!(config.blame_host, "github.com");
        assert_eq!(config.concurrency, 16);
        assert_eq!(config.policy, FailurePolicy::FailFast);
    }

    #[test]
    fn test_skip_failures_flag() {
        let cli = Cli::parse_from([
            "blame-snapshot",
            "a/b",
            "main",
            "--skip-failures",
            "--concurrency",
            "4",
            "--timeout-secs",
            "30",
        ]);
        let config = cli.crawl_config();
        assert_eq!(config.policy, FailurePolicy::SkipAndReport);
        assert_eq!(config.concurrency, 4);
        assert_eq!(cli.timeout_secs, Some(30));
    }

    #[test]
    fn test_missing_revision_is_rejected() {
        assert!(Cli::try_parse_from(["blame-snapshot", "a/b"]).is_err());
    }
}
