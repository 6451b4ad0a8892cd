// src/github/mod.rs
// =============================================================================
// This module handles everything that talks to GitHub.
//
// Currently implements:
// - Downloading pages with one shared HTTP client (fetch)
// - Listing the files of a revision via the git trees API (listing)
// - Building blame page URLs for those files (url)
//
// Rust concepts:
// - Modules: Organizing related functionality
// - Public API: What other parts of the app can use
// =============================================================================

mod fetch;
mod listing;
mod url;

pub use fetch::{Fetch, FetcherConfig, HttpFetcher};
pub use listing::{GithubTreeLister, ListFiles};
pub use url::blame_url;
