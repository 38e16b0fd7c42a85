//! HTML metadata extraction for achievement links.
//!
//! Titles and authors come from well-known `<meta>` fields first
//! (Highwire `citation_*`, OpenGraph, Dublin Core). Pages without them fall
//! back to `<title>` and to elements whose `class`/`id` mentions "author".
//! [`conference_title`] covers listing pages that print a title next to an
//! author credit and carry no metadata at all.

use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

static META: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("valid selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));
static WITH_CLASS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[class]").expect("valid selector"));
static WITH_ID: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[id]").expect("valid selector"));

/// `(attribute, value)` pairs in resolution order.
const TITLE_META: [(&str, &str); 4] = [
    ("name", "citation_title"),
    ("property", "og:title"),
    ("name", "dc.title"),
    ("name", "title"),
];

const AUTHOR_META: [(&str, &str); 3] = [
    ("name", "citation_author"),
    ("name", "author"),
    ("name", "dc.creator"),
];

const AUTHOR_SEPARATORS: [char; 3] = [',', '、', ';'];

/// Characters trimmed from a same-line title candidate.
const TITLE_TRIM: &[char] = &[' ', '-', ':', '—', '–', '\t'];

/// Candidates at or below this many characters are treated as labels.
const MIN_TITLE_CHARS: usize = 10;

const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    /// Empty when nothing usable was found.
    pub title: String,
    /// Raw author strings in page order.
    pub authors: Vec<String>,
}

pub fn extract_metadata(html: &str) -> PageMetadata {
    let doc = Html::parse_document(html);
    PageMetadata {
        title: extract_title(&doc),
        authors: extract_authors(&doc),
    }
}

fn meta_contents<'a>(
    doc: &'a Html,
    attr: &'static str,
    value: &'static str,
) -> impl Iterator<Item = &'a str> + 'a {
    doc.select(&META)
        .filter(move |m| m.value().attr(attr) == Some(value))
        .filter_map(|m| m.value().attr("content"))
        .map(str::trim)
        .filter(|c| !c.is_empty())
}

fn extract_title(doc: &Html) -> String {
    TITLE_META
        .iter()
        .find_map(|&(attr, value)| meta_contents(doc, attr, value).next())
        .map(str::to_string)
        .or_else(|| {
            doc.select(&TITLE)
                .next()
                .map(|t| t.text().collect::<String>().trim().to_string())
        })
        .unwrap_or_default()
}

fn extract_authors(doc: &Html) -> Vec<String> {
    for (attr, value) in AUTHOR_META {
        let found: Vec<String> = meta_contents(doc, attr, value).map(str::to_string).collect();
        if !found.is_empty() {
            return found;
        }
    }
    authors_from_marked_elements(doc)
}

fn mentions_author(attr: Option<&str>) -> bool {
    attr.is_some_and(|v| v.to_lowercase().contains("author"))
}

fn joined_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Class matches are visited before id matches; names keep first-seen order.
fn authors_from_marked_elements(doc: &Html) -> Vec<String> {
    let by_class = doc
        .select(&WITH_CLASS)
        .filter(|el| mentions_author(el.value().attr("class")));
    let by_id = doc
        .select(&WITH_ID)
        .filter(|el| mentions_author(el.value().attr("id")));

    let mut authors: Vec<String> = Vec::new();
    for el in by_class.chain(by_id) {
        let text = joined_text(el);
        for part in text.split(AUTHOR_SEPARATORS) {
            let part = part.trim();
            if !part.is_empty() && !authors.iter().any(|a| a == part) {
                authors.push(part.to_string());
            }
        }
    }
    authors
}

/// Non-empty, trimmed lines of the page's visible text.
pub fn visible_lines(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut text = String::new();
    for node in doc.tree.root().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(|a| a.value().as_element())
            .any(|e| HIDDEN_ELEMENTS.contains(&e.name()));
        if !hidden {
            text.push_str(fragment);
            text.push('\n');
        }
    }
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Find a title near the first usable occurrence of `author` in `lines`.
///
/// The previous line wins when it is long enough; otherwise the matching
/// line minus the author name is tried. Matching is an exact,
/// case-sensitive substring test.
pub fn title_from_lines<S: AsRef<str>>(lines: &[S], author: &str) -> Option<String> {
    if author.is_empty() {
        return None;
    }
    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if !line.contains(author) {
            continue;
        }
        if let Some(prev) = i.checked_sub(1).map(|p| lines[p].as_ref()) {
            if prev.chars().count() > MIN_TITLE_CHARS {
                return Some(prev.to_string());
            }
        }
        let stripped = line.replace(author, "");
        let candidate = stripped.trim_matches(TITLE_TRIM);
        if candidate.chars().count() > MIN_TITLE_CHARS {
            return Some(candidate.to_string());
        }
    }
    None
}

/// Title heuristic for conference listing pages without metadata.
pub fn conference_title(html: &str, author: &str) -> Option<String> {
    title_from_lines(&visible_lines(html), author)
}
