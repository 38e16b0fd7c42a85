//! Achievement generation from news posts.
//!
//! Posts are Markdown files with a `---` frontmatter block. The first body
//! line of each post is checked against publication-announcement keywords;
//! matching lines yield authors, a publisher, and a link, which become one
//! untitled record per author. The [`Generator`] then merges these with the
//! curated (titled) records already on disk, sorts, and renumbers.

pub mod facts;
pub mod generate;
pub mod merge;
pub mod post;

pub use facts::{PostFacts, extract_facts};
pub use generate::{GenerateSummary, Generator};
pub use post::{NewsPost, scan_news_dir};
