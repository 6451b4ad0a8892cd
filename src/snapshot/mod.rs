// src/snapshot/mod.rs
// =============================================================================
// This module turns a repository revision into a Snapshot.
//
// Submodules:
// - loader: one file URL -> File (fetch + extract)
// - builder: listing -> bounded concurrent loads -> ordered Snapshot
// =============================================================================

mod builder;
mod loader;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{CrawlConfig, FailurePolicy, SnapshotBuilder};
