//! Crawl-run normalization.
//!
//! Assigns run-unique identifiers, stamps the source category, and
//! de-duplicates by trimmed name within the run. Duplicates across
//! separate runs are irrelevant: each successful run replaces the whole
//! catalog.

use chrono::Utc;
use tracing::debug;

use crate::models::{DEFAULT_CATEGORY, PLACEHOLDER_IMAGE, ParsedProduct, ProductRecord};

/// Accumulates one crawl run's records.
pub struct CatalogNormalizer {
    run_stamp: i64,
    counter: u32,
    records: Vec<ProductRecord>,
}

impl CatalogNormalizer {
    pub fn new() -> Self {
        Self {
            run_stamp: Utc::now().timestamp_millis(),
            counter: 0,
            records: Vec::new(),
        }
    }

    /// Fold one page's parsed blocks into the run.
    ///
    /// First-seen-wins: a block whose trimmed name already exists in
    /// this run is dropped. Returns the number of records added.
    pub fn absorb(&mut self, parsed: Vec<ParsedProduct>, category: &str) -> usize {
        let category = if category.trim().is_empty() {
            DEFAULT_CATEGORY
        } else {
            category
        };

        let mut added = 0;
        for product in parsed {
            let name = product.name.trim().to_string();
            if self.records.iter().any(|r| r.name == name) {
                debug!(name = %name, "duplicate name within run - keeping first occurrence");
                continue;
            }

            self.counter += 1;
            self.records.push(ProductRecord {
                id: format!("{}-{}", self.run_stamp, self.counter),
                name,
                price: product.price,
                category: category.to_string(),
                url: product.url,
                image_url: product
                    .image_url
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            });
            added += 1;
        }
        added
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finish the run.
    pub fn into_records(self) -> Vec<ProductRecord> {
        self.records
    }
}

impl Default for CatalogNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(name: &str) -> ParsedProduct {
        ParsedProduct {
            name: name.to_string(),
            price: "100.000₫".to_string(),
            url: "https://shop.example/p/x".to_string(),
            image_url: None,
        }
    }

    #[test]
    fn first_seen_name_wins() {
        let mut normalizer = CatalogNormalizer::new();
        let added = normalizer.absorb(vec![parsed("Áo Dài Lụa"), parsed("Áo Dài Lụa")], "Áo");
        assert_eq!(added, 1);
        assert_eq!(normalizer.len(), 1);
    }

    #[test]
    fn dedup_spans_pages_within_a_run() {
        let mut normalizer = CatalogNormalizer::new();
        normalizer.absorb(vec![parsed("Đầm Hoa")], "Đầm");
        let added = normalizer.absorb(vec![parsed("  Đầm Hoa  "), parsed("Đầm Maxi")], "Đầm");
        assert_eq!(added, 1);

        let names: Vec<_> = normalizer
            .into_records()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Đầm Hoa", "Đầm Maxi"]);
    }

    #[test]
    fn ids_are_unique_within_a_run() {
        let mut normalizer = CatalogNormalizer::new();
        normalizer.absorb(vec![parsed("A"), parsed("B"), parsed("C")], "Áo");
        let records = normalizer.into_records();
        let mut ids: Vec<_> = records.iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), records.len());
    }

    #[test]
    fn missing_image_gets_placeholder_and_blank_category_defaults() {
        let mut normalizer = CatalogNormalizer::new();
        normalizer.absorb(vec![parsed("Nón Lá")], "  ");
        let records = normalizer.into_records();
        assert_eq!(records[0].image_url, PLACEHOLDER_IMAGE);
        assert_eq!(records[0].category, DEFAULT_CATEGORY);
    }
}
