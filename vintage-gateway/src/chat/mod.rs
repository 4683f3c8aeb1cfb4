//! Chat request flow: retrieval context, generation, history, mention
//! resolution.

pub mod history;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{info, warn};

use vintage_catalog::{ProductRecord, resolve_mention, retrieve};

use crate::prompt::{FALLBACK_REPLY, build_system_prompt};
use crate::state::AppState;
use history::{ChatMessage, ContentPart};

/// A decoded inbound image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingImage {
    pub media_type: String,
    pub data: Vec<u8>,
}

/// Errors decoding an inbound image payload. Surfaced to the caller as
/// a validation message; the request never reaches the provider.
#[derive(Debug, thiserror::Error)]
pub enum ImagePayloadError {
    #[error("not a base64 data URI")]
    NotDataUri,
    #[error("missing or malformed media type declaration")]
    BadHeader,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Decode a `data:<media-type>;base64,<payload>` URI into raw bytes
/// plus the declared media type.
pub fn decode_data_uri(input: &str) -> Result<IncomingImage, ImagePayloadError> {
    let rest = input
        .strip_prefix("data:")
        .ok_or(ImagePayloadError::NotDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(ImagePayloadError::NotDataUri)?;
    let media_type = header
        .strip_suffix(";base64")
        .ok_or(ImagePayloadError::BadHeader)?;
    if media_type.is_empty() {
        return Err(ImagePayloadError::BadHeader);
    }

    let data = BASE64.decode(payload.trim())?;
    Ok(IncomingImage {
        media_type: media_type.to_string(),
        data,
    })
}

/// Result of one chat turn.
#[derive(Debug)]
pub struct ChatOutcome {
    pub reply: String,
    /// First catalog record mentioned by name in the reply, if any.
    pub product: Option<ProductRecord>,
}

/// Run one chat turn for a validated request.
///
/// The session lock is held from history read through append, so
/// concurrent requests for the same session serialize while other
/// sessions proceed. Provider failures degrade to the fixed fallback
/// reply; the turn is still recorded so transcript and history agree.
pub async fn respond(
    state: &AppState,
    session_id: &str,
    message: Option<String>,
    image: Option<IncomingImage>,
) -> ChatOutcome {
    let snapshot = state.catalog.snapshot().await;

    let query = message.as_deref().unwrap_or_default();
    let context = retrieve(&snapshot, query, state.chat.top_k);
    let system = build_system_prompt(&context);

    let mut parts = Vec::new();
    if let Some(text) = message {
        parts.push(ContentPart::Text { text });
    }
    if let Some(img) = image {
        parts.push(ContentPart::Image {
            media_type: img.media_type,
            data: img.data,
        });
    }

    let handle = state.sessions.get_or_create(session_id).await;
    let mut session = handle.lock().await;
    let history = session.history().to_vec();

    let reply = match &state.provider {
        Some(provider) => match provider.generate(Some(&system), &history, &parts).await {
            Ok(text) => {
                info!(session_id, provider = provider.name(), "generated reply");
                text
            }
            Err(e) => {
                warn!(session_id, error = %e, "generation failed - using fallback reply");
                FALLBACK_REPLY.to_string()
            }
        },
        None => {
            warn!(session_id, "no provider configured - using fallback reply");
            FALLBACK_REPLY.to_string()
        }
    };

    let cap = state.sessions.max_history_turns();
    session.append(ChatMessage::user(parts), cap);
    session.append(ChatMessage::assistant_text(&reply), cap);
    drop(session);

    let product = resolve_mention(&snapshot.records, &reply).cloned();
    ChatOutcome { reply, product }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_valid_data_uri() {
        let image = decode_data_uri("data:image/png;base64,AQID").unwrap();
        assert_eq!(image.media_type, "image/png");
        assert_eq!(image.data, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_plain_base64_without_wrapper() {
        assert!(matches!(
            decode_data_uri("AQID"),
            Err(ImagePayloadError::NotDataUri)
        ));
    }

    #[test]
    fn rejects_missing_base64_marker() {
        assert!(matches!(
            decode_data_uri("data:image/png,AQID"),
            Err(ImagePayloadError::BadHeader)
        ));
    }

    #[test]
    fn rejects_bad_padding() {
        assert!(matches!(
            decode_data_uri("data:image/png;base64,A"),
            Err(ImagePayloadError::Base64(_))
        ));
    }
}
