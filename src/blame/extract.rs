// src/blame/extract.rs
// =============================================================================
// This module turns one GitHub blame page into BlameHunk records.
//
// The page is HTML, not an API, so we locate everything by CSS class:
//
//   .blame-hunk                  one per commit run, in document order
//     .blame-commit-date         holds <time-ago datetime="...Z">
//     .width-full                the code column
//       .d-flex                  one per line row
//         .js-line-number        the line number text
//         .blob-code             the code cell (kept as raw markup)
//         .pl-c                  present when the row has a comment token
//
// Parsing is synchronous and pure: same text in, same hunks out.
//
// Rust concepts:
// - Lifetimes: ElementRef<'a> borrows from the parsed Html document
// - Traits: a tiny query interface over scraper's element references
// - LazyLock: selectors are parsed once and shared
// =============================================================================

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use super::model::{BlameHunk, Line};

/// A structural piece of the blame page that must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CommitDate,
    Timestamp,
    CodeColumn,
    LineNumber,
    CodeContent,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::CommitDate => "commit date",
            Field::Timestamp => "timestamp attribute",
            Field::CodeColumn => "code column",
            Field::LineNumber => "line number",
            Field::CodeContent => "code content",
        };
        f.write_str(name)
    }
}

/// Why a blame page could not be turned into hunks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedDocument {
    #[error("missing {0}")]
    Missing(Field),

    #[error("unparsable line number {0:?}")]
    BadLineNumber(String),

    #[error("unparsable timestamp {0:?}")]
    BadTimestamp(String),
}

// Every selector here is a constant, so a parse failure is a programmer error
fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("constant selector must parse")
}

static HUNK: LazyLock<Selector> = LazyLock::new(|| selector(".blame-hunk"));
static COMMIT_DATE: LazyLock<Selector> = LazyLock::new(|| selector(".blame-commit-date"));
static TIME_AGO: LazyLock<Selector> = LazyLock::new(|| selector("time-ago"));
static CODE_COLUMN: LazyLock<Selector> = LazyLock::new(|| selector(".width-full"));
static LINE_ROW: LazyLock<Selector> = LazyLock::new(|| selector(".d-flex"));
static LINE_NUMBER: LazyLock<Selector> = LazyLock::new(|| selector(".js-line-number"));
static CODE_CONTENT: LazyLock<Selector> = LazyLock::new(|| selector(".blob-code"));
static COMMENT: LazyLock<Selector> = LazyLock::new(|| selector(".pl-c"));

// The two queries the extractor needs from a markup tree
trait Query<'a> {
    fn find_all(&self, selector: &Selector) -> Vec<ElementRef<'a>>;
    fn find_first(&self, selector: &Selector) -> Option<ElementRef<'a>>;
}

impl<'a> Query<'a> for ElementRef<'a> {
    fn find_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.select(selector).collect()
    }

    fn find_first(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.select(selector).next()
    }
}

/// Extracts every blame hunk from a blame page, in document order
///
/// A page with no hunks yields an empty Vec. A single malformed hunk or row
/// fails the whole page; partial results are never returned.
pub fn extract_hunks(html: &str) -> Result<Vec<BlameHunk>, MalformedDocument> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    root.find_all(&HUNK)
        .into_iter()
        .map(parse_hunk)
        .collect()
}

fn parse_hunk(hunk: ElementRef<'_>) -> Result<BlameHunk, MalformedDocument> {
    let date = hunk
        .find_first(&COMMIT_DATE)
        .ok_or(MalformedDocument::Missing(Field::CommitDate))?;

    let raw = date
        .find_first(&TIME_AGO)
        .and_then(|time| time.value().attr("datetime"))
        .ok_or(MalformedDocument::Missing(Field::Timestamp))?;

    let timestamp = parse_timestamp(raw)?;

    let column = hunk
        .find_first(&CODE_COLUMN)
        .ok_or(MalformedDocument::Missing(Field::CodeColumn))?;

    let lines = column
        .find_all(&LINE_ROW)
        .into_iter()
        .map(parse_line)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BlameHunk { timestamp, lines })
}

fn parse_line(row: ElementRef<'_>) -> Result<Line, MalformedDocument> {
    let number_text: String = row
        .find_first(&LINE_NUMBER)
        .ok_or(MalformedDocument::Missing(Field::LineNumber))?
        .text()
        .collect();

    let parsed = number_text.trim().parse::<u32>();
    let line_number = match parsed {
        Ok(n) if n > 0 => n,
        _ => return Err(MalformedDocument::BadLineNumber(number_text)),
    };

    let content = row
        .find_first(&CODE_CONTENT)
        .ok_or(MalformedDocument::Missing(Field::CodeContent))?
        .html();

    // Presence test only: `x = 1 // note` counts as a comment line
    let is_comment = row.find_first(&COMMENT).is_some();

    Ok(Line {
        line_number,
        content,
        is_comment,
    })
}

// GitHub writes UTC timestamps as `2019-07-18T08:13:24Z`, sometimes with a
// fractional part. The trailing zone designator is dropped, the rest is read
// as UTC wall time, and any fraction is truncated to whole seconds.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, MalformedDocument> {
    let bad = || MalformedDocument::BadTimestamp(raw.to_string());
    let trimmed = raw.trim();
    let naive = trimmed.strip_suffix('Z').unwrap_or(trimmed);

    let parsed = NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f").map_err(|_| bad())?;
    let whole_seconds = parsed.with_nanosecond(0).ok_or_else(bad)?;

    Ok(whole_seconds.and_utc())
}

#[cfg(test)]
pub(crate) mod fixtures {
    // Builders for blame pages shaped like GitHub's markup

    pub fn row(number: u32, code: &str) -> String {
        format!(
            r#"<div class="d-flex flex-justify-start">
                 <div class="blob-num js-line-number">{number}</div>
                 <div class="blob-code blob-code-inner">{code}</div>
               </div>"#
        )
    }

    pub fn hunk(datetime: &str, rows: &[String]) -> String {
        format!(
            r#"<div class="blame-hunk d-flex">
                 <div class="blame-commit">
                   <div class="blame-commit-date"><time-ago datetime="{datetime}">2 years ago</time-ago></div>
                 </div>
                 <div class="width-full">{}</div>
               </div>"#,
            rows.join("\n")
        )
    }

    pub fn page(hunks: &[String]) -> String {
        format!(
            "<!DOCTYPE html><html><body><div class=\"blame-container\">{}</div></body></html>",
            hunks.join("\n")
        )
    }
}
