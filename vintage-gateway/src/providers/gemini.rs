//! Google Gemini API client.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::chat::history::{ChatMessage, ChatRole, ContentPart};
use crate::providers::provider::{Provider, ProviderError};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

/// Request body for the Gemini generateContent API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
}

/// System instruction for Gemini
#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

/// Gemini API content structure
#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

/// Gemini API content part
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// Inline binary content (base64 on the wire)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Response from the generateContent API
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Provider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        system: Option<&str>,
        history: &[ChatMessage],
        parts: &[ContentPart],
    ) -> Result<String, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GenerateContentRequest {
            contents: to_gemini_contents(history, parts),
            system_instruction: system.map(|text| SystemInstruction {
                parts: vec![TextPart {
                    text: text.to_string(),
                }],
            }),
        };

        let response = self.http_client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, message });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_text(&parsed).ok_or(ProviderError::NoContent)
    }
}

/// Convert neutral history plus the new user parts to Gemini format.
fn to_gemini_contents(history: &[ChatMessage], parts: &[ContentPart]) -> Vec<GeminiContent> {
    let mut contents: Vec<GeminiContent> = history.iter().map(to_gemini_content).collect();

    if !parts.is_empty() {
        contents.push(GeminiContent {
            role: "user".to_string(),
            parts: parts.iter().map(to_gemini_part).collect(),
        });
    }

    contents
}

fn to_gemini_content(message: &ChatMessage) -> GeminiContent {
    GeminiContent {
        role: match message.role {
            ChatRole::User => "user".to_string(),
            ChatRole::Assistant => "model".to_string(),
        },
        parts: message.content.iter().map(to_gemini_part).collect(),
    }
}

fn to_gemini_part(part: &ContentPart) -> GeminiPart {
    match part {
        ContentPart::Text { text } => GeminiPart::Text { text: text.clone() },
        ContentPart::Image { media_type, data } => GeminiPart::InlineData {
            inline_data: InlineData {
                mime_type: media_type.clone(),
                data: BASE64.encode(data),
            },
        },
    }
}

fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .first()?
        .content
        .parts
        .iter()
        .find_map(|part| part.text.clone())
}
