//! Persona prompt and fixed user-facing strings.

use vintage_catalog::SHOP_INFO;

/// Reply when the generation service fails or no provider is
/// configured. User-visible failures are always a friendly string.
pub const FALLBACK_REPLY: &str = "Xin lỗi, hệ thống đang bận. Bạn thử lại sau nhé!";

/// Reply when a chat request carries neither message nor image.
pub const EMPTY_REQUEST_REPLY: &str = "Bạn chưa nhập gì cả!";

/// Reply when the inbound image payload cannot be decoded.
pub const BAD_IMAGE_REPLY: &str = "Ảnh bạn gửi không hợp lệ, bạn thử gửi lại nhé!";

/// System instruction: shop persona, shop data, and the retrieval
/// context for this request.
pub fn build_system_prompt(catalog_context: &str) -> String {
    format!(
        "Bạn là nhân viên tư vấn của Vintage Store. Hãy trả lời câu hỏi của khách \
         dựa trên thông tin shop và danh sách sản phẩm dưới đây.\n\n\
         Thông tin shop:\n{SHOP_INFO}\n\n\
         Sản phẩm tham khảo:\n{catalog_context}\n\
         Trả lời ngắn gọn, thân thiện, có icon."
    )
}
