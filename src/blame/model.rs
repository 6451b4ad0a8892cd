// src/blame/model.rs
// =============================================================================
// The in-memory snapshot model.
//
// Ownership is a plain tree: a Snapshot owns its Files, a File owns its
// BlameHunks, a BlameHunk owns its Lines. Nothing is shared and nothing
// points back up, so everything is a plain owned value (Vec of structs).
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of a blamed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// 1-based line number as shown in the blame view
    pub line_number: u32,
    /// Raw markup of the code cell, syntax-highlighting spans included
    pub content: String,
    /// True when the row contains a comment token anywhere
    pub is_comment: bool,
}

/// A contiguous run of lines last touched by one commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlameHunk {
    pub timestamp: DateTime<Utc>,
    pub lines: Vec<Line>,
}

/// One repository file's blame history as rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// The blame page this file was loaded from
    pub url: String,
    pub hunks: Vec<BlameHunk>,
}

impl File {
    /// Iterates the file's lines in document order, across all hunks
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.hunks.iter().flat_map(|hunk| hunk.lines.iter())
    }
}

/// A file that was skipped under the skip-and-report policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub url: String,
    pub cause: String,
}

/// Every file's blame data for one repository revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub repo: String,
    pub revision: String,
    /// Files in listing order
    pub files: Vec<File>,
    /// Files that could not be loaded. Always empty under fail-fast.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub failures: Vec<FileFailure>,
}

impl Snapshot {
    pub fn line_count(&self) -> usize {
        self.files.iter().map(|f| f.lines().count()).sum()
    }

    pub fn comment_line_count(&self) -> usize {
        self.files
            .iter()
            .flat_map(|f| f.lines())
            .filter(|line| line.is_comment)
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn line(n: u32, is_comment: bool) -> Line {
        Line {
            line_number: n,
            content: format!("<td class=\"blob-code\">{}</td>", n),
            is_comment,
        }
    }

    #[test]
    fn test_file_lines_concatenate_hunks_in_order() {
        let ts = Utc.with_ymd_and_hms(2020, 5, 1, 12, 0, 0).unwrap();
        let file = File {
            url: "https://github.com/a/b/blame/c/lib.rs".to_string(),
            hunks: vec![
                BlameHunk { timestamp: ts, lines: vec![line(1, false), line(2, true)] },
                BlameHunk { timestamp: ts, lines: vec![line(3, false)] },
            ],
        };

        let numbers: Vec<u32> = file.lines().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_snapshot_counts() {
        let ts = Utc.with_ymd_and_hms(2020, 5, 1, 12, 0, 0).unwrap();
        let snapshot = Snapshot {
            repo: "a/b".to_string(),
            revision: "c".to_string(),
            files: vec![
                File {
                    url: "u1".to_string(),
                    hunks: vec![BlameHunk { timestamp: ts, lines: vec![line(1, true), line(2, false)] }],
                },
                File { url: "u2".to_string(), hunks: vec![] },
            ],
            failures: vec![],
        };

        assert_eq!(snapshot.line_count(), 2);
        assert_eq!(snapshot.comment_line_count(), 1);
        assert!(snapshot.is_complete());
    }

    #[test]
    fn test_failures_omitted_from_json_when_empty() {
        let snapshot = Snapshot {
            repo: "a/b".to_string(),
            revision: "c".to_string(),
            files: vec![],
            failures: vec![],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(!json.contains("failures"));
    }
}
