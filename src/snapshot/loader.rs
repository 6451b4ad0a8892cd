// src/snapshot/loader.rs
// =============================================================================
// Loads one file's blame data: fetch the page, extract its hunks.
//
// No retries. Fetch failures come back as Error::Transport, extraction
// failures as Error::MalformedDocument carrying the page URL.
// =============================================================================

use crate::blame::{extract_hunks, File};
use crate::error::{Error, Result};
use crate::github::Fetch;

pub async fn load_file<F: Fetch + ?Sized>(fetcher: &F, url: &str) -> Result<File> {
    let page = fetcher.fetch(url).await?;

    let hunks = extract_hunks(&page).map_err(|source| Error::MalformedDocument {
        url: url.to_string(),
        source,
    })?;

    Ok(File {
        url: url.to_string(),
        hunks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blame::fixtures::{hunk, page, row};
    use crate::blame::{Field, MalformedDocument};
    use crate::snapshot::testing::FakeFetcher;

    const URL: &str = "https://github.com/a/b/blame/c/src/lib.rs";

    #[tokio::test]
    async fn test_loads_file() {
        let body = page(&[hunk("2019-07-18T08:13:24Z", &[row(1, "a"), row(2, "b")])]);
        let fetcher = FakeFetcher::new().page(URL, 0, body);

        let file = load_file(&fetcher, URL).await.unwrap();
        assert_eq!(file.url, URL);
        assert_eq!(file.hunks.len(), 1);
        assert_eq!(file.hunks[0].lines.len(), 2);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let fetcher = FakeFetcher::new().failing(URL, 0, "HTTP 503 Service Unavailable");

        let result = load_file(&fetcher, URL).await;
        assert!(matches!(result, Err(Error::Transport { .. })));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_page_names_url_and_field() {
        let body = page(&[r#"<div class="blame-hunk"><div class="width-full"></div></div>"#.to_string()]);
        let fetcher = FakeFetcher::new().page(URL, 0, body);

        match load_file(&fetcher, URL).await {
            Err(Error::MalformedDocument { url, source }) => {
                assert_eq!(url, URL);
                assert_eq!(source, MalformedDocument::Missing(Field::CommitDate));
            }
            other => panic!("expected malformed document, got {:?}", other),
        }
    }
}
