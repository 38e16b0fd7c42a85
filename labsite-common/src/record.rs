//! Achievement records and the ordered mapping that holds them.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// One structured entry describing a publication or presentation.
///
/// Missing fields deserialize to their empty value. Keys outside the known
/// schema are kept in [`AchievementRecord::extra`] and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementRecord {
    pub title: String,
    pub tags: Vec<String>,
    /// Primary author followed by the co-author label.
    pub authors: Vec<String>,
    pub year: String,
    pub publisher: String,
    pub link: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Content identity used to suppress duplicate synthesized records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub author: String,
    pub year: String,
    pub publisher: String,
}

impl AchievementRecord {
    /// Build an untitled record for one author of a news announcement.
    pub fn synthesized(
        author: &str,
        co_author: &str,
        year: &str,
        publisher: &str,
        link: &str,
    ) -> Self {
        Self {
            authors: vec![author.to_string(), co_author.to_string()],
            year: year.to_string(),
            publisher: publisher.to_string(),
            link: link.to_string(),
            ..Self::default()
        }
    }

    pub fn primary_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Records with a title are treated as manually curated.
    pub fn is_curated(&self) -> bool {
        !self.title.is_empty()
    }

    /// Replace the author list with `[primary, co_author]`.
    pub fn set_primary_author(&mut self, primary: &str, co_author: &str) {
        self.authors = vec![primary.to_string(), co_author.to_string()];
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            author: self.primary_author().unwrap_or_default().to_string(),
            year: self.year.clone(),
            publisher: self.publisher.clone(),
        }
    }

    /// Numeric year for ordering; anything unparsable ranks as 0.
    pub fn year_rank(&self) -> i64 {
        self.year.trim().parse().unwrap_or(0)
    }
}

/// Identifier → record mapping that keeps insertion order.
///
/// Serializes as a plain JSON object whose keys appear in the order the
/// records were inserted, which is the order the generator renumbers in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AchievementBook {
    entries: Vec<(String, AchievementRecord)>,
}

impl AchievementBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a record, replacing the value in place if the id already exists.
    pub fn insert(&mut self, id: impl Into<String>, record: AchievementRecord) {
        let id = id.into();
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some((_, slot)) => *slot = record,
            None => self.entries.push((id, record)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&AchievementRecord> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, v)| v)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AchievementRecord)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut AchievementRecord)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn records(&self) -> impl Iterator<Item = &AchievementRecord> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn into_records(self) -> Vec<AchievementRecord> {
        self.entries.into_iter().map(|(_, v)| v).collect()
    }
}

impl FromIterator<(String, AchievementRecord)> for AchievementBook {
    fn from_iter<I: IntoIterator<Item = (String, AchievementRecord)>>(iter: I) -> Self {
        let mut book = Self::new();
        for (id, record) in iter {
            book.insert(id, record);
        }
        book
    }
}

impl Serialize for AchievementBook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, record) in &self.entries {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AchievementBook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BookVisitor;

        impl<'de> Visitor<'de> for BookVisitor {
            type Value = AchievementBook;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object mapping ids to achievement records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut book = AchievementBook::new();
                while let Some((id, record)) =
                    access.next_entry::<String, AchievementRecord>()?
                {
                    book.insert(id, record);
                }
                Ok(book)
            }
        }

        deserializer.deserialize_map(BookVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_default_to_empty() {
        let record: AchievementRecord = serde_json::from_value(json!({ "title": "Foo" })).unwrap();
        assert_eq!(record.title, "Foo");
        assert!(record.authors.is_empty());
        assert_eq!(record.year, "");
        assert_eq!(record.primary_author(), None);
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let input = json!({
            "title": "",
            "authors": ["狭間", "飯間等"],
            "date": "2024-04-01"
        });
        let record: AchievementRecord = serde_json::from_value(input).unwrap();
        assert_eq!(record.extra.get("date"), Some(&json!("2024-04-01")));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["date"], json!("2024-04-01"));
        assert_eq!(back["authors"], json!(["狭間", "飯間等"]));
    }

    #[test]
    fn book_preserves_document_order() {
        let raw = r#"{"zeta": {"title": "z"}, "alpha": {"title": "a"}, "mid": {}}"#;
        let book: AchievementBook = serde_json::from_str(raw).unwrap();
        assert_eq!(book.ids().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);

        let rendered = serde_json::to_string(&book).unwrap();
        let zeta = rendered.find("zeta").unwrap();
        let alpha = rendered.find("alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn insert_replaces_existing_id_in_place() {
        let mut book = AchievementBook::new();
        book.insert("a", AchievementRecord::default());
        book.insert("b", AchievementRecord::default());
        let titled = AchievementRecord {
            title: "x".into(),
            ..Default::default()
        };
        book.insert("a", titled);
        assert_eq!(book.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(book.get("a").unwrap().title, "x");
    }

    #[test]
    fn year_rank_treats_garbage_as_zero() {
        let mut record = AchievementRecord::default();
        assert_eq!(record.year_rank(), 0);
        record.year = "2023".into();
        assert_eq!(record.year_rank(), 2023);
        record.year = "n/a".into();
        assert_eq!(record.year_rank(), 0);
    }
}
