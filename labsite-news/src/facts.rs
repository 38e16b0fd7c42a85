//! Pattern extraction over the first line of a news post.
//!
//! Announcements are written in Japanese, e.g.
//! `M1狭間君の論文が情報処理学会で公開されました。 [詳細](https://…)`.
//! Authors are the names carrying an honorific suffix, the publisher is the
//! bracketed venue or the phrase after the subject marker, and the link is
//! the first Markdown link target.

use regex::Regex;
use std::sync::LazyLock;

static ANNOUNCEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"掲載|公開されました|で公開されました|で掲載されました|論文が|で研究発表を行いました")
        .expect("valid regex")
});

/// Group 2 matches when the bracket is the label of a Markdown link.
static BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\](\()?").expect("valid regex"));

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\]\(([^)]+)\)").expect("valid regex"));

static PAPER_SUBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"論文が(.+?)(?:に|で)").expect("valid regex"));

static SUBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"が(.+?)(?:で|に)").expect("valid regex"));

/// Optional separators, optional grade code (M1, B4, D2), then a lazily
/// matched name directly before an honorific.
static AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[と、,\s]*)?(?:[MBD]\d+)?([一-龥ぁ-んァ-ンA-Za-z]+?)(?:君|さん|氏|先生)")
        .expect("valid regex")
});

static GRADE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[MBDF]\d+").expect("valid regex"));

const NAME_SEPARATORS: &[char] = &['と', '、', ',', ' '];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFacts {
    pub authors: Vec<String>,
    pub publisher: String,
    pub link: String,
}

pub fn is_announcement(line: &str) -> bool {
    ANNOUNCEMENT.is_match(line)
}

/// Target of the first Markdown link, or empty.
pub fn extract_link(line: &str) -> String {
    LINK.captures(line)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default()
}

pub fn extract_publisher(line: &str) -> String {
    let bracketed = BRACKET
        .captures_iter(line)
        .find(|c| c.get(2).is_none())
        .map(|c| c[1].trim().to_string());
    bracketed
        .or_else(|| PAPER_SUBJECT.captures(line).map(|c| c[1].trim().to_string()))
        .or_else(|| SUBJECT.captures(line).map(|c| c[1].trim().to_string()))
        .unwrap_or_default()
}

/// Distinct author names in order of first appearance.
pub fn extract_authors(line: &str) -> Vec<String> {
    let mut authors: Vec<String> = Vec::new();
    for caps in AUTHOR.captures_iter(line) {
        let raw = caps[1].trim();
        let name = GRADE_PREFIX.replace(raw, "");
        let name = name.trim_start_matches(NAME_SEPARATORS).trim();
        if !name.is_empty() && !authors.iter().any(|a| a == name) {
            authors.push(name.to_string());
        }
    }
    authors
}

/// Facts for an announcement line; `None` when the line is not an
/// announcement or yields neither authors nor a publisher.
pub fn extract_facts(line: &str) -> Option<PostFacts> {
    if !is_announcement(line) {
        return None;
    }
    let authors = extract_authors(line);
    let publisher = extract_publisher(line);
    if authors.is_empty() && publisher.is_empty() {
        return None;
    }
    Some(PostFacts {
        authors,
        publisher,
        link: extract_link(line),
    })
}
