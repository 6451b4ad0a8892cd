// src/blame/mod.rs
// =============================================================================
// This module holds the blame data model and the page extractor.
//
// Submodules:
// - model: Snapshot, File, BlameHunk, Line (plain owned values)
// - extract: turns one blame page's HTML into BlameHunk records
// =============================================================================

mod extract;
mod model;

pub use extract::{extract_hunks, Field, MalformedDocument};
pub use model::{BlameHunk, File, FileFailure, Line, Snapshot};

#[cfg(test)]
pub(crate) use extract::fixtures;
