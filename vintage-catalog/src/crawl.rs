//! Crawl orchestration.
//!
//! Sequential walk over configured categories × paginated listing
//! pages. Per-page failures are logged and end that category only; one
//! broken category never aborts the run. A run that yields nothing at
//! all surfaces `EmptyCrawl` so callers keep the previous snapshot.

use tracing::{debug, info, warn};

use vintage_core::config::{CategorySettings, CrawlerSettings};

use crate::errors::{CatalogError, CatalogResult};
use crate::fetch::PageFetcher;
use crate::models::ProductRecord;
use crate::normalize::CatalogNormalizer;
use crate::parse::ListingParser;

pub struct Crawler<F: PageFetcher> {
    fetcher: F,
    parser: ListingParser,
    settings: CrawlerSettings,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F, settings: CrawlerSettings) -> Self {
        Self {
            fetcher,
            parser: ListingParser::new(),
            settings,
        }
    }

    /// Run a full crawl over all configured categories.
    ///
    /// Returns the de-duplicated record list for this run, or
    /// `EmptyCrawl` when no category produced anything.
    pub async fn run(&self) -> CatalogResult<Vec<ProductRecord>> {
        let mut normalizer = CatalogNormalizer::new();

        for category in &self.settings.categories {
            self.crawl_category(category, &mut normalizer).await;
        }

        if normalizer.is_empty() {
            return Err(CatalogError::EmptyCrawl);
        }

        info!(total = normalizer.len(), "crawl run complete");
        Ok(normalizer.into_records())
    }

    /// Pages are numbered from 1; the first page without product
    /// blocks ends the category (end of listing, not an error).
    async fn crawl_category(&self, category: &CategorySettings, normalizer: &mut CatalogNormalizer) {
        for page in 1..=self.settings.max_pages {
            let url = self.page_url(&category.path, page);

            let html = match self.fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(category = %category.label, url = %url, error = %e, "skipping rest of category");
                    break;
                }
            };

            let parsed = self.parser.parse_listing(&html, &self.settings.base_url);
            if parsed.is_empty() {
                debug!(category = %category.label, page, "no product blocks - end of listing");
                break;
            }

            let added = normalizer.absorb(parsed, &category.label);
            info!(category = %category.label, page, added, "crawled listing page");
        }
    }

    fn page_url(&self, path: &str, page: u32) -> String {
        format!(
            "{}{}?page={}",
            self.settings.base_url.trim_end_matches('/'),
            path,
            page
        )
    }
}
