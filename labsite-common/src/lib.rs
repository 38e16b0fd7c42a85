//! Common types and utilities shared across labsite crates.
//!
//! This crate owns the achievement record model, the on-disk JSON store,
//! observability helpers, and the shared error type. Both pipelines (the
//! metadata enricher in `labsite-web` and the generator in `labsite-news`)
//! read and write records exclusively through the types defined here.
//!
//! # Overview
//!
//! - [`AchievementRecord`]: one publication/event entry
//! - [`AchievementBook`]: insertion-ordered mapping of identifiers to records
//! - [`store`]: load/save of the achievements JSON file
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`LabsiteError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use labsite_common::{AchievementBook, AchievementRecord, DEFAULT_CO_AUTHOR};
//!
//! let mut book = AchievementBook::new();
//! let record = AchievementRecord::synthesized("狭間", DEFAULT_CO_AUTHOR, "2024", "情報処理学会", "");
//! book.insert("new-001", record);
//! assert_eq!(book.len(), 1);
//! assert_eq!(book.get("new-001").unwrap().primary_author(), Some("狭間"));
//! ```
use std::path::PathBuf;

pub mod observability;
pub mod record;
pub mod store;

pub use record::{AchievementBook, AchievementRecord, DedupKey};

/// Lab affiliation credit appended after every primary author.
pub const DEFAULT_CO_AUTHOR: &str = "飯間等";

/// `User-Agent` sent when fetching record links.
pub const DEFAULT_USER_AGENT: &str = "iima-lab-bot/1.0 (+https://example.local)";

/// Identifier prefix used for the final, renumbered output.
pub const DEFAULT_ID_PREFIX: &str = "achievement";

/// Error types used across the labsite workspace.
#[derive(thiserror::Error, Debug)]
pub enum LabsiteError {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The achievements file exists but is not a valid record mapping.
    #[error("malformed achievements JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Records could not be rendered back to JSON.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenient alias for results that use [`LabsiteError`].
pub type Result<T> = std::result::Result<T, LabsiteError>;
