//! Record synthesis, curated-record merge, ordering, and renumbering.

use std::cmp::Ordering;
use std::collections::HashSet;

use labsite_common::{AchievementBook, AchievementRecord, DedupKey};

use crate::facts::PostFacts;

/// Prefix for synthesized records before the final renumbering.
pub const TEMP_ID_PREFIX: &str = "new";

/// Builds one record per author, skipping repeats of a [`DedupKey`].
pub struct Synthesizer<'a> {
    co_author: &'a str,
    seen: HashSet<DedupKey>,
    out: AchievementBook,
}

impl<'a> Synthesizer<'a> {
    pub fn new(co_author: &'a str) -> Self {
        Self {
            co_author,
            seen: HashSet::new(),
            out: AchievementBook::new(),
        }
    }

    /// Add records for one post; returns how many were new.
    pub fn push_post(&mut self, year: &str, facts: &PostFacts) -> usize {
        let mut added = 0;
        for author in &facts.authors {
            let record = AchievementRecord::synthesized(
                author,
                self.co_author,
                year,
                &facts.publisher,
                &facts.link,
            );
            if !self.seen.insert(record.dedup_key()) {
                continue;
            }
            let id = temp_id(self.out.len() + 1);
            self.out.insert(id, record);
            added += 1;
        }
        added
    }

    pub fn finish(self) -> AchievementBook {
        self.out
    }
}

fn temp_id(n: usize) -> String {
    format!("{TEMP_ID_PREFIX}-{n:03}")
}

/// Keep only records with a title; untitled ones are regenerated each run.
pub fn retain_curated(book: AchievementBook) -> AchievementBook {
    book.iter()
        .filter(|(_, r)| r.is_curated())
        .map(|(id, r)| (id.to_string(), r.clone()))
        .collect()
}

/// Year descending (unparsable as 0), then publisher, then primary author.
pub fn compare_records(a: &AchievementRecord, b: &AchievementRecord) -> Ordering {
    b.year_rank()
        .cmp(&a.year_rank())
        .then_with(|| a.publisher.cmp(&b.publisher))
        .then_with(|| {
            a.primary_author()
                .unwrap_or_default()
                .cmp(b.primary_author().unwrap_or_default())
        })
}

/// Concatenate, sort stably, and assign `<prefix>-001`, `<prefix>-002`, ...
pub fn merge_and_renumber(
    curated: AchievementBook,
    synthesized: AchievementBook,
    prefix: &str,
) -> AchievementBook {
    let mut records = curated.into_records();
    records.extend(synthesized.into_records());
    records.sort_by(compare_records);
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| (format!("{prefix}-{:03}", i + 1), r))
        .collect()
}
