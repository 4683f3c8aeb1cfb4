//! Chat flow against stub generation providers: retrieval context,
//! fallback replies, session history, and mention resolution.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use vintage_catalog::{CatalogStore, ProductRecord};
use vintage_core::config::{ChatSettings, CrawlerSettings};
use vintage_gateway::chat::history::{ChatMessage, ChatRole, ContentPart};
use vintage_gateway::chat::{self, IncomingImage};
use vintage_gateway::prompt::FALLBACK_REPLY;
use vintage_gateway::providers::{Provider, ProviderError};
use vintage_gateway::session::SessionStore;
use vintage_gateway::state::AppState;

struct StubProvider {
    reply: String,
}

#[async_trait]
impl Provider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }
    fn model(&self) -> &str {
        "stub-1"
    }
    async fn generate(
        &self,
        _system: Option<&str>,
        _history: &[ChatMessage],
        _parts: &[ContentPart],
    ) -> Result<String, ProviderError> {
        Ok(self.reply.clone())
    }
}

struct FailingProvider;

#[async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }
    fn model(&self) -> &str {
        "failing-1"
    }
    async fn generate(
        &self,
        _system: Option<&str>,
        _history: &[ChatMessage],
        _parts: &[ContentPart],
    ) -> Result<String, ProviderError> {
        Err(ProviderError::NoContent)
    }
}

/// Records the history length of each call it receives.
struct RecordingProvider {
    history_lens: Mutex<Vec<usize>>,
    systems: Mutex<Vec<String>>,
}

#[async_trait]
impl Provider for RecordingProvider {
    fn name(&self) -> &str {
        "recording"
    }
    fn model(&self) -> &str {
        "recording-1"
    }
    async fn generate(
        &self,
        system: Option<&str>,
        history: &[ChatMessage],
        _parts: &[ContentPart],
    ) -> Result<String, ProviderError> {
        self.history_lens.lock().unwrap().push(history.len());
        self.systems
            .lock()
            .unwrap()
            .push(system.unwrap_or_default().to_string());
        Ok("Dạ vâng ạ!".to_string())
    }
}

fn record(name: &str, category: &str) -> ProductRecord {
    ProductRecord {
        id: format!("test-{name}"),
        name: name.to_string(),
        price: "1.250.000₫".to_string(),
        category: category.to_string(),
        url: format!("https://shop.example/p/{name}"),
        image_url: "https://cdn.example.com/x.jpg".to_string(),
    }
}

async fn make_state(
    provider: Option<Arc<dyn Provider>>,
    records: Vec<ProductRecord>,
    dir: &tempfile::TempDir,
) -> Arc<AppState> {
    let catalog = Arc::new(CatalogStore::new(dir.path().join("catalog.json")));
    if !records.is_empty() {
        catalog.reload(records).await.unwrap();
    }
    Arc::new(AppState::new(
        catalog,
        SessionStore::new(40),
        provider,
        CrawlerSettings::default(),
        ChatSettings::default(),
    ))
}

#[tokio::test]
async fn chat_returns_reply_and_mentioned_product() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(StubProvider {
        reply: "Đầm Hoa là lựa chọn tuyệt vời 😍".to_string(),
    });
    let state = make_state(
        Some(provider),
        vec![record("Áo Dài Lụa", "Áo"), record("Đầm Hoa", "Đầm")],
        &dir,
    )
    .await;

    let outcome = chat::respond(&state, "s1", Some("có đầm không".to_string()), None).await;

    assert_eq!(outcome.reply, "Đầm Hoa là lựa chọn tuyệt vời 😍");
    assert_eq!(outcome.product.unwrap().name, "Đầm Hoa");
}

#[tokio::test]
async fn provider_failure_degrades_to_fallback_reply() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(
        Some(Arc::new(FailingProvider)),
        vec![record("Đầm Hoa", "Đầm")],
        &dir,
    )
    .await;

    let outcome = chat::respond(&state, "s1", Some("có đầm không".to_string()), None).await;

    assert_eq!(outcome.reply, FALLBACK_REPLY);
    assert!(outcome.product.is_none());

    // The turn is still recorded, fallback included.
    let handle = state.sessions.get_or_create("s1").await;
    let session = handle.lock().await;
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history()[1], ChatMessage::assistant_text(FALLBACK_REPLY));
}

#[tokio::test]
async fn missing_provider_degrades_to_fallback_reply() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(None, vec![record("Đầm Hoa", "Đầm")], &dir).await;

    let outcome = chat::respond(&state, "s1", Some("xin chào".to_string()), None).await;
    assert_eq!(outcome.reply, FALLBACK_REPLY);
}

#[tokio::test]
async fn history_accumulates_across_turns_and_reaches_provider() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(RecordingProvider {
        history_lens: Mutex::new(Vec::new()),
        systems: Mutex::new(Vec::new()),
    });
    let state = make_state(
        Some(provider.clone()),
        vec![record("Đầm Hoa", "Đầm")],
        &dir,
    )
    .await;

    chat::respond(&state, "s1", Some("có đầm không".to_string()), None).await;
    chat::respond(&state, "s1", Some("giá bao nhiêu".to_string()), None).await;

    // First call sees no prior turns, second sees the first exchange.
    assert_eq!(*provider.history_lens.lock().unwrap(), vec![0, 2]);

    // The retrieval context rides in the system instruction.
    let systems = provider.systems.lock().unwrap();
    assert!(systems[0].contains("Đầm Hoa"));
    assert!(systems[0].contains("Vintage Store"));
}

#[tokio::test]
async fn sessions_are_isolated_per_id() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(StubProvider {
        reply: "Dạ!".to_string(),
    });
    let state = make_state(Some(provider), vec![record("Đầm Hoa", "Đầm")], &dir).await;

    chat::respond(&state, "A", Some("tin nhắn của A".to_string()), None).await;

    let a = state.sessions.get_or_create("A").await;
    assert_eq!(a.lock().await.history().len(), 2);

    let b = state.sessions.get_or_create("B").await;
    assert!(b.lock().await.history().is_empty());

    // Clearing A leaves B untouched.
    assert!(state.sessions.clear("A").await);
    assert!(state.sessions.contains("B").await);
    assert!(!state.sessions.contains("A").await);
}

#[tokio::test]
async fn image_turn_is_stored_as_decoded_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(StubProvider {
        reply: "Ảnh đẹp quá!".to_string(),
    });
    let state = make_state(Some(provider), vec![record("Đầm Hoa", "Đầm")], &dir).await;

    let image = IncomingImage {
        media_type: "image/jpeg".to_string(),
        data: vec![0xFF, 0xD8, 0xFF],
    };
    chat::respond(&state, "s1", None, Some(image)).await;

    let handle = state.sessions.get_or_create("s1").await;
    let session = handle.lock().await;
    assert_eq!(session.history()[0].role, ChatRole::User);
    assert_eq!(
        session.history()[0].content[0],
        ContentPart::Image {
            media_type: "image/jpeg".to_string(),
            data: vec![0xFF, 0xD8, 0xFF],
        }
    );
}
