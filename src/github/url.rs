// src/github/url.rs
// =============================================================================
// Builds blame page URLs:
//
//   https://{host}/{repo}/blame/{revision}/{filepath}
//
// Each path segment is percent-encoded by the `url` crate, so a file named
// `docs/my notes.md` becomes `docs/my%20notes.md`. The `/` separators are
// kept as-is, in the path and in the revision (`release/1.0` is a valid
// branch name).
// =============================================================================

use url::Url;

/// Composes the blame view URL for one file
///
/// Returns None if the host or repo do not form a valid base URL.
pub fn blame_url(host: &str, repo: &str, revision: &str, path: &str) -> Option<String> {
    let mut url = Url::parse(&format!("https://{}/", host)).ok()?;

    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(repo.split('/'))
        .push("blame")
        .extend(revision.split('/'))
        .extend(path.split('/'));

    Some(url.to_string())
}
