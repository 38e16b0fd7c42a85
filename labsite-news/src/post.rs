//! News post parsing: frontmatter year and the first body line.

use std::fs;
use std::path::{Path, PathBuf};

use labsite_common::{LabsiteError, Result};
use regex::Regex;
use std::sync::LazyLock;

static DATE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*date:\s*["']?(\d{4})"#).expect("valid regex"));

const FENCE: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsPost {
    /// Four-digit year from the `date:` field, or empty.
    pub year: String,
    /// First non-empty, trimmed line after the frontmatter.
    pub first_line: String,
}

impl NewsPost {
    /// Parse a post. `None` when the frontmatter is missing or unterminated,
    /// or when the body has no text.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text.lines();
        if lines.next()?.trim_end() != FENCE {
            return None;
        }

        let mut frontmatter = String::new();
        let mut closed = false;
        for line in lines.by_ref() {
            if line.starts_with(FENCE) {
                closed = true;
                break;
            }
            frontmatter.push_str(line);
            frontmatter.push('\n');
        }
        if !closed {
            return None;
        }

        let year = DATE_FIELD
            .captures(&frontmatter)
            .map(|c| c[1].to_string())
            .unwrap_or_default();
        let first_line = lines.map(str::trim).find(|l| !l.is_empty())?.to_string();

        Some(Self { year, first_line })
    }
}

/// Read every `*.md` post in `dir`, in file-name order.
///
/// Posts that cannot be read or parsed are logged and skipped.
pub fn scan_news_dir(dir: &Path) -> Result<Vec<(PathBuf, NewsPost)>> {
    let io_err = |source: std::io::Error| LabsiteError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
        .collect();
    paths.sort();

    let mut posts = Vec::with_capacity(paths.len());
    for path in paths {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "news.unreadable");
                continue;
            }
        };
        match NewsPost::parse(&text) {
            Some(post) => posts.push((path, post)),
            None => tracing::debug!(path = %path.display(), "news.skipped_no_frontmatter"),
        }
    }
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_year_and_first_line() {
        let text = "---\ntitle: x\ndate: 2024-04-01\n---\n\n  M1狭間君の論文が公開されました。  \nsecond\n";
        let post = NewsPost::parse(text).unwrap();
        assert_eq!(post.year, "2024");
        assert_eq!(post.first_line, "M1狭間君の論文が公開されました。");
    }

    #[test]
    fn quoted_date_and_crlf() {
        let text = "---\r\ndate: \"2023-12-24\"\r\n---\r\nbody\r\n";
        let post = NewsPost::parse(text).unwrap();
        assert_eq!(post.year, "2023");
        assert_eq!(post.first_line, "body");
    }

    #[test]
    fn missing_date_gives_empty_year() {
        let post = NewsPost::parse("---\ntitle: x\n---\nbody").unwrap();
        assert_eq!(post.year, "");
    }

    #[test]
    fn posts_without_frontmatter_are_skipped() {
        assert_eq!(NewsPost::parse("just text\n"), None);
        assert_eq!(NewsPost::parse("---\ndate: 2024-01-01\nnever closed"), None);
        assert_eq!(NewsPost::parse("---\ndate: 2024-01-01\n---\n\n   \n"), None);
    }

    #[test]
    fn scan_reads_markdown_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.md"), "---\ndate: 2022-01-01\n---\nsecond").unwrap();
        fs::write(dir.path().join("a.md"), "---\ndate: 2021-01-01\n---\nfirst").unwrap();
        fs::write(dir.path().join("notes.txt"), "---\ndate: 2020-01-01\n---\nignored").unwrap();
        fs::write(dir.path().join("c.md"), "no frontmatter").unwrap();

        let posts = scan_news_dir(dir.path()).unwrap();
        let lines: Vec<_> = posts.iter().map(|(_, p)| p.first_line.as_str()).collect();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn scan_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_news_dir(&dir.path().join("nope")).is_err());
    }
}
