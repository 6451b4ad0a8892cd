// src/github/listing.rs
// =============================================================================
// This module lists the files present in a repository revision.
//
// We use the git trees API with `recursive=1`, which returns every entry of
// the tree in one response:
//
//   GET https://api.github.com/repos/{repo}/git/trees/{revision}?recursive=1
//   { "sha": "...", "tree": [ { "path": "src/lib.rs", "type": "blob" }, ... ],
//     "truncated": false }
//
// Only "blob" entries are files; "tree" entries are directories and have no
// blame page.
// =============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::fetch::Fetch;
use crate::error::{Error, Result};

/// Enumerates the file paths of a repository revision
#[async_trait]
pub trait ListFiles: Send + Sync {
    async fn list_files(&self, repo: &str, revision: &str) -> Result<Vec<String>>;
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Lists files through the GitHub git trees API
pub struct GithubTreeLister<'a, F: Fetch> {
    fetcher: &'a F,
    api_host: String,
}

impl<'a, F: Fetch> GithubTreeLister<'a, F> {
    pub fn new(fetcher: &'a F, api_host: impl Into<String>) -> Self {
        GithubTreeLister {
            fetcher,
            api_host: api_host.into(),
        }
    }

    fn tree_url(&self, repo: &str, revision: &str) -> String {
        format!(
            "https://{}/repos/{}/git/trees/{}?recursive=1",
            self.api_host, repo, revision
        )
    }
}

#[async_trait]
impl<'a, F: Fetch> ListFiles for GithubTreeLister<'a, F> {
    async fn list_files(&self, repo: &str, revision: &str) -> Result<Vec<String>> {
        let url = self.tree_url(repo, revision);
        debug!(%url, "listing tree");

        let body = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|e| Error::listing(repo, revision, e.to_string()))?;

        parse_tree_listing(repo, revision, &body)
    }
}

/// Parses a git trees API payload into blob paths, in payload order
pub fn parse_tree_listing(repo: &str, revision: &str, body: &str) -> Result<Vec<String>> {
    let response: TreeResponse = serde_json::from_str(body)
        .map_err(|e| Error::listing(repo, revision, format!("unparsable payload: {}", e)))?;

    if response.truncated {
        warn!(repo, revision, "tree listing was truncated by the API; snapshot will be partial");
    }

    let paths: Vec<String> = response
        .tree
        .into_iter()
        .filter(|entry| entry.kind == "blob")
        .map(|entry| entry.path)
        .collect();

    if paths.is_empty() {
        return Err(Error::listing(repo, revision, "no files in tree"));
    }

    Ok(paths)
}
