//! Relevance retrieval over the catalog snapshot.
//!
//! Case-insensitive token matching against record names and categories,
//! with a featured-items fallback so the assistant always has context
//! to work with.

use crate::models::ProductRecord;
use crate::store::CatalogSnapshot;

/// Fixed shop information, prefixed when the query asks about the shop
/// itself rather than products.
pub const SHOP_INFO: &str = "\
- Shop tên: Vintage Store.
- Giờ làm việc: 8h - 22h hàng ngày.
- Địa chỉ: 123 Đường ABC, Quận 1.
- Chính sách: Đổi trả trong 3 ngày nếu lỗi.
- Ship: Đồng giá 30k toàn quốc.";

const SHOP_KEYWORDS: &[&str] = &[
    "link", "địa chỉ", "address", "liên hệ", "contact", "giờ", "ship", "đổi trả",
];

const MATCH_HEADER: &str = "Sản phẩm phù hợp với yêu cầu:";
const FALLBACK_HEADER: &str = "Không tìm thấy sản phẩm khớp chính xác, đây là các sản phẩm nổi bật:";

/// Build a bounded, formatted context block for a free-text query.
///
/// A record matches when any query token (≥ 2 characters) occurs in
/// its lowercased name or category. An empty match set degrades to the
/// first `top_k` records of the catalog, never to an empty context.
pub fn retrieve(snapshot: &CatalogSnapshot, query: &str, top_k: usize) -> String {
    let lowered = query.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split_whitespace()
        .filter(|t| t.chars().count() >= 2)
        .collect();

    let matches: Vec<&ProductRecord> = snapshot
        .records
        .iter()
        .filter(|r| record_matches(r, &tokens))
        .take(top_k)
        .collect();

    let mut out = String::new();

    if SHOP_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        out.push_str(SHOP_INFO);
        out.push_str("\n\n");
    }

    if matches.is_empty() {
        out.push_str(FALLBACK_HEADER);
        out.push('\n');
        for record in snapshot.records.iter().take(top_k) {
            push_record(&mut out, record);
        }
    } else {
        out.push_str(MATCH_HEADER);
        out.push('\n');
        for record in &matches {
            push_record(&mut out, record);
        }
    }

    out
}

fn record_matches(record: &ProductRecord, tokens: &[&str]) -> bool {
    if tokens.is_empty() {
        return false;
    }
    let name = record.name.to_lowercase();
    let category = record.category.to_lowercase();
    tokens
        .iter()
        .any(|t| name.contains(t) || category.contains(t))
}

fn push_record(out: &mut String, record: &ProductRecord) {
    out.push_str(&format!(
        "- {} | Giá: {} | Loại: {}\n  Link: {}\n",
        record.name, record.price, record.category, record.url
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> CatalogSnapshot {
        let records = [
            ("Áo Dài Lụa", "Áo"),
            ("Áo Khoác Denim", "Áo"),
            ("Đầm Hoa", "Đầm"),
            ("Đầm Maxi Trắng", "Đầm"),
            ("Túi Cói", "Phụ kiện"),
            ("Kính Râm Retro", "Phụ kiện"),
        ]
        .iter()
        .enumerate()
        .map(|(i, (name, category))| ProductRecord {
            id: format!("run-{i}"),
            name: name.to_string(),
            price: "250.000₫".to_string(),
            category: category.to_string(),
            url: format!("https://shop.example/p/{i}"),
            image_url: "https://cdn.example.com/x.jpg".to_string(),
        })
        .collect();
        CatalogSnapshot::from_records(records)
    }

    #[test]
    fn matches_name_tokens_case_insensitively() {
        let context = retrieve(&snapshot(), "ĐẦM nào xinh", 5);
        assert!(context.starts_with(MATCH_HEADER));
        assert!(context.contains("Đầm Hoa"));
        assert!(context.contains("Đầm Maxi Trắng"));
        assert!(!context.contains("Túi Cói"));
    }

    #[test]
    fn matches_category_when_name_does_not() {
        let context = retrieve(&snapshot(), "phụ kiện gì đẹp", 5);
        assert!(context.contains("Túi Cói"));
        assert!(context.contains("Kính Râm Retro"));
    }

    #[test]
    fn zero_matches_fall_back_to_first_top_k() {
        let context = retrieve(&snapshot(), "giày sneaker", 3);
        assert!(context.starts_with(FALLBACK_HEADER));
        assert!(context.contains("Áo Dài Lụa"));
        assert!(context.contains("Đầm Hoa"));
        assert!(!context.contains("Đầm Maxi Trắng"));
    }

    #[test]
    fn result_count_is_bounded_by_top_k() {
        let context = retrieve(&snapshot(), "đầm áo túi kính", 2);
        assert_eq!(context.matches("- ").count(), 2);
    }

    #[test]
    fn shop_keywords_prefix_shop_info() {
        let context = retrieve(&snapshot(), "cho xin địa chỉ shop", 5);
        assert!(context.starts_with(SHOP_INFO));
    }

    #[test]
    fn product_query_has_no_shop_info() {
        let context = retrieve(&snapshot(), "đầm maxi", 5);
        assert!(!context.contains("123 Đường ABC"));
    }
}
