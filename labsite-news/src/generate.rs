//! The achievement generator pipeline.

use std::path::Path;

use labsite_common::store::{load_book, save_book};
use labsite_common::{AchievementBook, Result};

use crate::facts::extract_facts;
use crate::merge::{Synthesizer, merge_and_renumber, retain_curated};
use crate::post::{NewsPost, scan_news_dir};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Posts with readable frontmatter and body.
    pub posts_scanned: usize,
    /// Posts that announced a publication with usable facts.
    pub posts_matched: usize,
    pub retained: usize,
    pub synthesized: usize,
    /// Records in the written file.
    pub written: usize,
}

pub struct Generator {
    co_author: String,
    id_prefix: String,
}

impl Generator {
    pub fn new(co_author: impl Into<String>, id_prefix: impl Into<String>) -> Self {
        Self {
            co_author: co_author.into(),
            id_prefix: id_prefix.into(),
        }
    }

    /// Rebuild the record set from `existing` and the parsed posts.
    ///
    /// Titled records in `existing` are kept; untitled ones are dropped and
    /// rebuilt from the posts.
    pub fn regenerate<'p>(
        &self,
        existing: AchievementBook,
        posts: impl IntoIterator<Item = &'p NewsPost>,
    ) -> (AchievementBook, GenerateSummary) {
        let mut summary = GenerateSummary::default();
        let curated = retain_curated(existing);
        summary.retained = curated.len();

        let mut synth = Synthesizer::new(&self.co_author);

        for post in posts {
            summary.posts_scanned += 1;
            let Some(facts) = extract_facts(&post.first_line) else {
                continue;
            };
            summary.posts_matched += 1;
            let added = synth.push_post(&post.year, &facts);
            tracing::debug!(
                line = %post.first_line,
                authors = ?facts.authors,
                publisher = %facts.publisher,
                added,
                "generate.post"
            );
        }

        let synthesized = synth.finish();
        summary.synthesized = synthesized.len();
        let book = merge_and_renumber(curated, synthesized, &self.id_prefix);
        summary.written = book.len();
        (book, summary)
    }

    /// Scan `news_dir`, regenerate against `out_path`, and overwrite it.
    pub fn generate_file(&self, news_dir: &Path, out_path: &Path) -> Result<GenerateSummary> {
        let posts = scan_news_dir(news_dir)?;
        let existing = load_existing(out_path);
        let (book, summary) = self.regenerate(existing, posts.iter().map(|(_, p)| p));
        save_book(out_path, &book)?;
        tracing::info!(
            scanned = summary.posts_scanned,
            matched = summary.posts_matched,
            retained = summary.retained,
            synthesized = summary.synthesized,
            written = summary.written,
            path = %out_path.display(),
            "generate.done"
        );
        Ok(summary)
    }
}

/// Previous output, or an empty book when it is absent or unusable.
fn load_existing(path: &Path) -> AchievementBook {
    if !path.exists() {
        return AchievementBook::new();
    }
    load_book(path).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "generate.existing_ignored");
        AchievementBook::new()
    })
}
