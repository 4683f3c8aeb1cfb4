//! Catalog data model.

use serde::{Deserialize, Serialize};

/// Image shown when a listing block carries no resolvable image URL.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x400?text=Vintage+Store";

/// Category label for records whose listing carries no usable label.
pub const DEFAULT_CATEGORY: &str = "Khác";

/// One product in a catalog snapshot.
///
/// Records are created in bulk by a crawl run and replaced wholesale by
/// the next successful run; they are never mutated field-by-field. The
/// trimmed `name` doubles as the de-duplication and mention-match key,
/// so no two records in a snapshot share one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Run-unique identifier (`{run-timestamp}-{counter}`).
    pub id: String,
    pub name: String,
    /// Canonical form: digits (with separators) followed by `₫`.
    pub price: String,
    pub category: String,
    /// Absolute, scheme-qualified detail-page link.
    pub url: String,
    pub image_url: String,
}

/// Parser output for one listing block, before the normalizer assigns
/// an id and category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedProduct {
    pub name: String,
    pub price: String,
    pub url: String,
    pub image_url: Option<String>,
}
