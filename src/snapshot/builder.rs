// src/snapshot/builder.rs
// =============================================================================
// This module builds a Snapshot for one repository revision.
//
// How it works:
// 1. Ask the lister for every file path at the revision (one call)
// 2. Turn each path into a blame page URL
// 3. Load the pages concurrently, at most `concurrency` at a time
// 4. Put every result back in its listing slot, then decide success or
//    failure according to the FailurePolicy
//
// Pages finish in whatever order the network allows. Results are keyed by
// their index in the listing, so the Snapshot's file order never depends on
// timing.
//
// The fetcher is borrowed for the whole build, and every load future is
// driven to completion before `build` returns. The caller cannot drop the
// shared client while a fetch is still outstanding.
//
// Rust concepts:
// - Streams: buffer_unordered runs a bounded number of futures at once
// - Generics with ?Sized: works with concrete types and `dyn` trait objects
// - Option slots: a Vec<Option<_>> filled in by index as results arrive
// =============================================================================

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::loader::load_file;
use crate::blame::{File, FileFailure, Snapshot};
use crate::error::{Error, Result};
use crate::github::{blame_url, Fetch, ListFiles};

/// What to do when a single file cannot be loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Fail the whole build with the first failure in listing order.
    /// Files already in flight are still allowed to finish.
    #[default]
    FailFast,
    /// Keep every file that loaded and record the rest in `Snapshot::failures`
    SkipAndReport,
}

/// Settings for one crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Host serving blame pages, e.g. "github.com"
    pub blame_host: String,
    /// Maximum number of blame pages fetched at once
    pub concurrency: usize,
    pub policy: FailurePolicy,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig {
            blame_host: "github.com".to_string(),
            concurrency: 16,
            policy: FailurePolicy::FailFast,
        }
    }
}

pub struct SnapshotBuilder<'a, L: ListFiles + ?Sized, F: Fetch + ?Sized> {
    lister: &'a L,
    fetcher: &'a F,
    config: CrawlConfig,
}

impl<'a, L: ListFiles + ?Sized, F: Fetch + ?Sized> SnapshotBuilder<'a, L, F> {
    pub fn new(lister: &'a L, fetcher: &'a F, config: CrawlConfig) -> Self {
        SnapshotBuilder {
            lister,
            fetcher,
            config,
        }
    }

    /// Lists, fetches and extracts every file of `repo` at `revision`
    ///
    /// Fails with Error::Listing before any page is fetched if the listing
    /// is unusable. Under FailFast, any per-file failure fails the build.
    pub async fn build(&self, repo: &str, revision: &str) -> Result<Snapshot> {
        info!(repo, revision, "listing files");
        let paths = self.lister.list_files(repo, revision).await?;

        if paths.is_empty() {
            return Err(Error::listing(repo, revision, "no files in tree"));
        }

        let urls = paths
            .iter()
            .map(|path| {
                blame_url(&self.config.blame_host, repo, revision, path).ok_or_else(|| {
                    Error::listing(repo, revision, format!("cannot build blame url for {}", path))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            files = urls.len(),
            concurrency = self.config.concurrency,
            "fetching blame pages"
        );
        let results = self.load_all(&urls).await;

        let snapshot = self.assemble(repo, revision, urls, results)?;
        info!(
            files = snapshot.files.len(),
            skipped = snapshot.failures.len(),
            lines = snapshot.line_count(),
            "snapshot complete"
        );
        Ok(snapshot)
    }

    // Runs every load to completion and returns results in `urls` order
    async fn load_all(&self, urls: &[String]) -> Vec<Result<File>> {
        let concurrency = self.config.concurrency.max(1);
        let mut slots: Vec<Option<Result<File>>> = (0..urls.len()).map(|_| None).collect();

        let mut loads = stream::iter(urls.iter().enumerate())
            .map(|(index, url)| async move { (index, load_file(self.fetcher, url).await) })
            .buffer_unordered(concurrency);

        while let Some((index, result)) = loads.next().await {
            match &result {
                Ok(file) => debug!(url = %file.url, hunks = file.hunks.len(), "loaded"),
                Err(e) => warn!(error = %e, "file failed"),
            }
            slots[index] = Some(result);
        }

        // buffer_unordered yields exactly once per input, so every slot is set
        slots.into_iter().flatten().collect()
    }

    fn assemble(
        &self,
        repo: &str,
        revision: &str,
        urls: Vec<String>,
        results: Vec<Result<File>>,
    ) -> Result<Snapshot> {
        let mut files = Vec::with_capacity(results.len());
        let mut failures = Vec::new();

        for (url, result) in urls.into_iter().zip(results) {
            match result {
                Ok(file) => files.push(file),
                Err(e) if self.config.policy == FailurePolicy::SkipAndReport && e.is_per_file() => {
                    failures.push(FileFailure {
                        url,
                        cause: e.to_string(),
                    })
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Snapshot {
            repo: repo.to_string(),
            revision: revision.to_string(),
            files,
            failures,
        })
    }
}
