//! HTTP route layer.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use vintage_catalog::{Crawler, HttpFetcher, ProductRecord};

use crate::chat::{self, decode_data_uri};
use crate::prompt::{BAD_IMAGE_REPLY, EMPTY_REQUEST_REPLY};
use crate::state::AppState;

/// Chat request from the HTTP API. At least one of `message`/`image`
/// is required; `image` is a base64 data URI.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub image: Option<String>,
    pub session_id: String,
}

/// Chat response for the HTTP API
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub product_info: Option<ProductRecord>,
}

/// Crawl trigger response
#[derive(Debug, Serialize)]
pub struct CrawlResponse {
    pub status: String,
    pub message: String,
    pub total_products: usize,
}

#[derive(Debug, Deserialize)]
pub struct ClearHistoryRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub total_products: usize,
}

/// Run the HTTP server
pub async fn run(state: Arc<AppState>, bind_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the router with all routes
fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .route("/crawl", post(crawl_handler))
        .route("/clear_history", post(clear_history_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        total_products: state.catalog.len().await,
    })
}

/// Chat handler - POST /chat
async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from);
    let raw_image = request
        .image
        .as_deref()
        .map(str::trim)
        .filter(|i| !i.is_empty());

    if message.is_none() && raw_image.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ChatResponse {
                reply: EMPTY_REQUEST_REPLY.to_string(),
                product_info: None,
            }),
        );
    }

    let image = match raw_image {
        Some(raw) => match decode_data_uri(raw) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(session_id = %request.session_id, error = %e, "rejecting image payload");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ChatResponse {
                        reply: BAD_IMAGE_REPLY.to_string(),
                        product_info: None,
                    }),
                );
            }
        },
        None => None,
    };

    let outcome = chat::respond(&state, &request.session_id, message, image).await;
    (
        StatusCode::OK,
        Json(ChatResponse {
            reply: outcome.reply,
            product_info: outcome.product,
        }),
    )
}

/// Administrative crawl trigger - POST /crawl
///
/// Runs the crawler synchronously under the crawl lock. An empty run
/// keeps the previous snapshot and reports a friendly error status.
async fn crawl_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let _guard = state.crawl_guard().await;
    info!("crawl triggered");

    let fetcher = match HttpFetcher::new() {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(error = %e, "could not build HTTP fetcher");
            return Json(CrawlResponse {
                status: "error".to_string(),
                message: "Không khởi tạo được trình thu thập, giữ nguyên danh mục cũ.".to_string(),
                total_products: state.catalog.len().await,
            });
        }
    };

    let crawler = Crawler::new(fetcher, state.crawler.clone());
    match crawler.run().await {
        Ok(records) => match state.catalog.reload(records).await {
            Ok(count) => Json(CrawlResponse {
                status: "success".to_string(),
                message: format!("Đã cập nhật {count} sản phẩm."),
                total_products: count,
            }),
            Err(e) => {
                error!(error = %e, "failed to persist crawl results");
                Json(CrawlResponse {
                    status: "error".to_string(),
                    message: "Không lưu được dữ liệu mới, giữ nguyên danh mục cũ.".to_string(),
                    total_products: state.catalog.len().await,
                })
            }
        },
        Err(e) => {
            warn!(error = %e, "crawl run produced no records");
            Json(CrawlResponse {
                status: "error".to_string(),
                message: "Không thu thập được sản phẩm nào, giữ nguyên danh mục cũ.".to_string(),
                total_products: state.catalog.len().await,
            })
        }
    }
}

/// Clear-history handler - POST /clear_history
async fn clear_history_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClearHistoryRequest>,
) -> impl IntoResponse {
    if state.sessions.clear(&request.session_id).await {
        info!(session_id = %request.session_id, "session cleared");
        Json(StatusResponse {
            status: "success".to_string(),
            message: "Đã xoá lịch sử trò chuyện.".to_string(),
        })
    } else {
        Json(StatusResponse {
            status: "error".to_string(),
            message: "Không tìm thấy phiên trò chuyện.".to_string(),
        })
    }
}
