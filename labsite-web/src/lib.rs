//! Page scraping and the metadata enricher.
//!
//! - Page metadata extraction and the conference-page title heuristic (`extract`)
//! - Family-name normalization for scraped author strings (`family`)
//! - The [`source::PageSource`] seam over `labsite-http` (`source`)
//! - The enrichment pipeline over an achievements file (`enrich`)

pub mod enrich;
pub mod extract;
pub mod family;
pub mod source;

pub use enrich::{EnrichSummary, Enricher};
pub use extract::{PageMetadata, conference_title, extract_metadata};
pub use family::family_from_full;
pub use source::PageSource;
