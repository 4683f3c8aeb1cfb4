//! Listing page parsing.
//!
//! The site's markup is not consistent across categories, so every
//! field is located through an ordered table of selector patterns and
//! the first pattern that yields a result wins. New markup variants are
//! handled by extending the tables, not by new branching code.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::models::ParsedProduct;

/// Currency symbol the shop prices use.
pub const CURRENCY: char = '₫';

/// Container patterns for one product block, in priority order.
const BLOCK_SELECTORS: &[&str] = &[
    "li.product-item",
    "div.product-item",
    "div.product-card",
    "div.product-block",
    "div.col-product",
    "article.product",
];

const NAME_SELECTORS: &[&str] = &[
    "h3.product-name a",
    "h3.product-name",
    ".product-title a",
    ".product-title",
    ".name a",
    "h3 a",
    "h2 a",
];

const PRICE_SELECTORS: &[&str] = &[
    ".price-new",
    ".special-price",
    "span.price",
    ".price",
    ".product-price",
];

const IMAGE_SELECTORS: &[&str] = &["img.product-image", "img.lazyload", "img"];

const LINK_SELECTORS: &[&str] = &["h3.product-name a", ".product-title a", ".name a", "a[href]"];

/// Parses listing markup into partial product records.
pub struct ListingParser {
    block_selectors: Vec<Selector>,
    name_selectors: Vec<Selector>,
    price_selectors: Vec<Selector>,
    image_selectors: Vec<Selector>,
    link_selectors: Vec<Selector>,
}

impl ListingParser {
    pub fn new() -> Self {
        Self {
            block_selectors: parse_selectors(BLOCK_SELECTORS),
            name_selectors: parse_selectors(NAME_SELECTORS),
            price_selectors: parse_selectors(PRICE_SELECTORS),
            image_selectors: parse_selectors(IMAGE_SELECTORS),
            link_selectors: parse_selectors(LINK_SELECTORS),
        }
    }

    /// Extract all product blocks from a listing page.
    ///
    /// Blocks missing a name or a price are skipped, never fatal. An
    /// empty result means the page has no recognizable listing (end of
    /// pagination, or an unknown markup variant).
    pub fn parse_listing(&self, html: &str, origin: &str) -> Vec<ParsedProduct> {
        let document = Html::parse_document(html);
        let base = Url::parse(origin).ok();

        let blocks = self.find_blocks(&document);
        let mut products = Vec::with_capacity(blocks.len());

        for block in blocks {
            let Some(name) = self.first_text(&block, &self.name_selectors) else {
                debug!("skipping block without a name");
                continue;
            };
            let Some(raw_price) = self.first_text(&block, &self.price_selectors) else {
                debug!(name = %name, "skipping block without a price");
                continue;
            };

            let url = self
                .extract_link(&block, origin, base.as_ref())
                .unwrap_or_else(|| origin.to_string());
            let image_url = self.extract_image(&block);

            products.push(ParsedProduct {
                name,
                price: normalize_price(&raw_price),
                url,
                image_url,
            });
        }

        products
    }

    /// First block selector yielding any match wins for the whole page.
    fn find_blocks<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        for selector in &self.block_selectors {
            let blocks: Vec<ElementRef<'a>> = document.select(selector).collect();
            if !blocks.is_empty() {
                return blocks;
            }
        }
        Vec::new()
    }

    fn first_text(&self, block: &ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
        for selector in selectors {
            if let Some(element) = block.select(selector).next() {
                let text = collect_text(&element);
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
        None
    }

    fn extract_link(
        &self,
        block: &ElementRef<'_>,
        origin: &str,
        base: Option<&Url>,
    ) -> Option<String> {
        for selector in &self.link_selectors {
            for element in block.select(selector) {
                if let Some(href) = element.value().attr("href") {
                    if let Some(link) = resolve_link(href, origin, base) {
                        return Some(link);
                    }
                }
            }
        }
        None
    }

    /// Lazy-load attribute is preferred over the plain source.
    fn extract_image(&self, block: &ElementRef<'_>) -> Option<String> {
        for selector in &self.image_selectors {
            if let Some(element) = block.select(selector).next() {
                let src = element
                    .value()
                    .attr("data-src")
                    .or_else(|| element.value().attr("src"))
                    .map(str::trim)
                    .unwrap_or_default();
                if !src.is_empty() {
                    return Some(fix_protocol_relative(src));
                }
            }
        }
        None
    }
}

impl Default for ListingParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_selectors(patterns: &[&str]) -> Vec<Selector> {
    patterns
        .iter()
        .map(|p| Selector::parse(p).expect("valid selector"))
        .collect()
}

/// Joined, whitespace-normalized text of an element.
fn collect_text(element: &ElementRef<'_>) -> String {
    let mut buffer = String::new();
    for part in element.text() {
        let trimmed = part.trim();
        if !trimmed.is_empty() {
            if !buffer.is_empty() {
                buffer.push(' ');
            }
            buffer.push_str(trimmed);
        }
    }
    buffer
}

/// Text up to the first currency symbol, symbol re-appended. Trailing
/// was-price/strikethrough text after the first symbol is discarded.
fn normalize_price(raw: &str) -> String {
    match raw.split_once(CURRENCY) {
        Some((head, _)) => format!("{}{}", head.trim(), CURRENCY),
        None => raw.trim().to_string(),
    }
}

/// `//host/...` links get an explicit scheme.
fn fix_protocol_relative(src: &str) -> String {
    if let Some(rest) = src.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        src.to_string()
    }
}

/// Root-relative paths are prefixed with the site origin; absolute
/// links pass through; anything else resolves against the base URL.
fn resolve_link(href: &str, origin: &str, base: Option<&Url>) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    if href.starts_with("//") {
        return Some(fix_protocol_relative(href));
    }
    if href.starts_with('/') {
        return Some(format!("{}{}", origin.trim_end_matches('/'), href));
    }

    base?.join(href).ok().map(|u| u.to_string())
}
