//! Catalog ingestion and retrieval for the Vintage Store assistant.
//!
//! The crawl pipeline fetches listing pages per category, parses the
//! product blocks with tolerant multi-pattern selectors, normalizes and
//! de-duplicates the records, and replaces the durable catalog snapshot
//! wholesale. The read side serves ranked retrieval contexts and
//! best-effort product mention resolution over the current snapshot.

pub mod crawl;
pub mod errors;
pub mod fetch;
pub mod mention;
pub mod models;
pub mod normalize;
pub mod parse;
pub mod retrieval;
pub mod store;

pub use crawl::Crawler;
pub use errors::{CatalogError, CatalogResult};
pub use fetch::{HttpFetcher, PageFetcher};
pub use mention::resolve_mention;
pub use models::{PLACEHOLDER_IMAGE, ParsedProduct, ProductRecord};
pub use normalize::CatalogNormalizer;
pub use parse::ListingParser;
pub use retrieval::{SHOP_INFO, retrieve};
pub use store::{CatalogSnapshot, CatalogStore};
