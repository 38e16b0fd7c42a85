//! Metadata enricher: fill titles and correct primary authors from link pages.

use std::path::Path;

use labsite_common::store::{load_book, save_book};
use labsite_common::{AchievementBook, AchievementRecord};

use crate::extract::{PageMetadata, conference_title, extract_metadata};
use crate::family::family_from_full;
use crate::source::PageSource;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichSummary {
    /// Records with a non-empty link.
    pub processed: usize,
    /// Individual field updates (title and authors count separately).
    pub changed: usize,
}

pub struct Enricher<S> {
    source: S,
    co_author: String,
}

impl<S: PageSource> Enricher<S> {
    pub fn new(source: S, co_author: impl Into<String>) -> Self {
        Self {
            source,
            co_author: co_author.into(),
        }
    }

    /// Fetch and scrape one page. Any fetch failure degrades to empty
    /// metadata and no HTML.
    pub async fn scrape(&self, url: &str) -> (PageMetadata, Option<String>) {
        match self.source.fetch_page(url).await {
            Ok(html) => (extract_metadata(&html), Some(html)),
            Err(err) => {
                tracing::warn!(url, error = %err, "enrich.fetch_failed");
                (PageMetadata::default(), None)
            }
        }
    }

    /// Update one record in place. Returns `None` when it has no link,
    /// otherwise the number of fields changed.
    pub async fn enrich_record(&self, id: &str, record: &mut AchievementRecord) -> Option<usize> {
        let link = record.link.trim().to_string();
        if link.is_empty() {
            return None;
        }

        let (meta, html) = self.scrape(&link).await;
        let mut title = meta.title;
        if title.is_empty() {
            let anchor = record.primary_author().filter(|a| !a.is_empty());
            if let (Some(html), Some(author)) = (html.as_deref(), anchor) {
                if let Some(found) = conference_title(html, author) {
                    tracing::debug!(id, author, title = %found, "enrich.conference_title");
                    title = found;
                }
            }
        }

        let mut changed = 0;
        if let Some(first) = meta.authors.first() {
            let family = family_from_full(first);
            if record.primary_author() != Some(family.as_str()) {
                tracing::debug!(id, from = ?record.primary_author(), to = %family, "enrich.author");
                record.set_primary_author(&family, &self.co_author);
                changed += 1;
            }
        }
        if !title.is_empty() && record.title != title {
            tracing::debug!(id, title = %title, "enrich.title");
            record.title = title;
            changed += 1;
        }
        Some(changed)
    }

    /// Enrich every linked record, one fetch at a time, in book order.
    pub async fn enrich_book(&self, book: &mut AchievementBook) -> EnrichSummary {
        let mut summary = EnrichSummary::default();
        for (id, record) in book.iter_mut() {
            if let Some(changed) = self.enrich_record(id, record).await {
                summary.processed += 1;
                summary.changed += changed;
            }
        }
        tracing::info!(
            processed = summary.processed,
            changed = summary.changed,
            "enrich.done"
        );
        summary
    }

    /// Load `path`, enrich it, and write it back when anything changed.
    pub async fn enrich_file(&self, path: &Path) -> labsite_common::Result<EnrichSummary> {
        let mut book = load_book(path)?;
        let summary = self.enrich_book(&mut book).await;
        if summary.changed > 0 {
            save_book(path, &book)?;
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use labsite_common::DEFAULT_CO_AUTHOR;
    use labsite_http::HttpError;
    use std::collections::HashMap;

    struct StubSource(HashMap<String, String>);

    #[async_trait]
    impl PageSource for StubSource {
        async fn fetch_page(&self, url: &str) -> Result<String, HttpError> {
            self.0
                .get(url)
                .cloned()
                .ok_or_else(|| HttpError::Network("unreachable".into()))
        }
    }

    fn enricher(pages: &[(&str, &str)]) -> Enricher<StubSource> {
        let map = pages
            .iter()
            .map(|(u, h)| (u.to_string(), h.to_string()))
            .collect();
        Enricher::new(StubSource(map), DEFAULT_CO_AUTHOR)
    }

    fn linked(author: &str, link: &str) -> AchievementRecord {
        AchievementRecord::synthesized(author, DEFAULT_CO_AUTHOR, "2024", "JSIAM", link)
    }

    #[tokio::test]
    async fn fills_title_and_replaces_author() {
        let e = enricher(&[(
            "http://p/1",
            r#"<head><meta name="citation_title" content="Tidal Flows">
               <meta name="citation_author" content="Taro Hazama"></head>"#,
        )]);
        let mut record = linked("狭間", "http://p/1");
        assert_eq!(e.enrich_record("a", &mut record).await, Some(2));
        assert_eq!(record.title, "Tidal Flows");
        assert_eq!(record.authors, vec!["Hazama".to_string(), DEFAULT_CO_AUTHOR.to_string()]);
    }

    #[tokio::test]
    async fn identical_values_count_no_changes() {
        let e = enricher(&[(
            "http://p/1",
            r#"<head><title>Same</title><meta name="author" content="狭間"></head>"#,
        )]);
        let mut record = linked("狭間", "http://p/1");
        record.title = "Same".into();
        assert_eq!(e.enrich_record("a", &mut record).await, Some(0));
    }

    #[tokio::test]
    async fn conference_heuristic_runs_without_metadata_title() {
        let e = enricher(&[(
            "http://conf/program",
            "<body><p>Numerical Study of Coastal Waves</p><p>狭間 (Univ.)</p></body>",
        )]);
        let mut record = linked("狭間", "http://conf/program");
        assert_eq!(e.enrich_record("a", &mut record).await, Some(1));
        assert_eq!(record.title, "Numerical Study of Coastal Waves");
        assert_eq!(record.primary_author(), Some("狭間"));
    }

    #[tokio::test]
    async fn fetch_failure_degrades_silently() {
        let e = enricher(&[]);
        let mut record = linked("狭間", "http://down/");
        let before = record.clone();
        assert_eq!(e.enrich_record("a", &mut record).await, Some(0));
        assert_eq!(record, before);
    }

    #[tokio::test]
    async fn records_without_links_are_not_processed() {
        let e = enricher(&[]);
        let mut book = AchievementBook::new();
        book.insert("a", linked("狭間", "   "));
        book.insert("b", linked("飯間", "http://down/"));
        let summary = e.enrich_book(&mut book).await;
        assert_eq!(summary, EnrichSummary { processed: 1, changed: 0 });
    }
}
