// src/error.rs
// =============================================================================
// Error types shared by the fetcher, the listing lookup, and the snapshot
// builder.
//
// There are exactly three ways a crawl can go wrong:
// - Listing: we could not find out which files exist at the revision
// - Transport: one blame page could not be downloaded
// - MalformedDocument: one blame page downloaded fine but is missing a piece
//   of markup we depend on
//
// Nothing in this crate retries. Every error is surfaced to the caller once.
// =============================================================================

use thiserror::Error;

use crate::blame::MalformedDocument;

/// Result type alias used across the crawl modules.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a snapshot.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The file listing for the repository/revision failed or was unusable
    #[error("listing failed for {repo}@{revision}: {reason}")]
    Listing {
        repo: String,
        revision: String,
        reason: String,
    },

    /// A network fetch failed (connect, TLS, timeout or non-2xx status)
    #[error("failed to fetch {url}: {reason}")]
    Transport { url: String, reason: String },

    /// A fetched blame page lacks an expected structural element
    #[error("malformed blame page {url}: {source}")]
    MalformedDocument {
        url: String,
        #[source]
        source: MalformedDocument,
    },
}

impl Error {
    pub fn listing(repo: &str, revision: &str, reason: impl Into<String>) -> Self {
        Error::Listing {
            repo: repo.to_string(),
            revision: revision.to_string(),
            reason: reason.into(),
        }
    }

    pub fn transport(url: &str, reason: impl Into<String>) -> Self {
        Error::Transport {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the per-file kinds that a skip-and-report crawl may record
    pub fn is_per_file(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::MalformedDocument { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blame::Field;

    #[test]
    fn test_malformed_message_names_field() {
        let err = Error::MalformedDocument {
            url: "https://github.com/a/b/blame/c/d.rs".to_string(),
            source: MalformedDocument::Missing(Field::CommitDate),
        };
        let message = err.to_string();
        assert!(message.contains("d.rs"));
        assert!(std::error::Error::source(&err)
            .map(|s| s.to_string().contains("commit date"))
            .unwrap_or(false));
    }

    #[test]
    fn test_listing_is_not_per_file() {
        assert!(!Error::listing("a/b", "c", "empty").is_per_file());
        assert!(Error::transport("https://x", "HTTP 500").is_per_file());
    }
}
