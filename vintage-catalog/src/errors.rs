#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("crawl produced no records")]
    EmptyCrawl,
}

pub type CatalogResult<T> = Result<T, CatalogError>;
