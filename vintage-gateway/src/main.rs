use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vintage_catalog::{CatalogStore, Crawler, HttpFetcher};
use vintage_core::config::{Config, Secrets, Settings};
use vintage_gateway::providers::{GeminiClient, Provider};
use vintage_gateway::server;
use vintage_gateway::session::SessionStore;
use vintage_gateway::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    vintage_core::load_dotenv();

    // Settings come first so the configured level can seed the filter.
    let settings = Settings::load()?;
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config {
        secrets: Secrets::from_env(),
        settings,
    };
    info!(
        categories = config.settings.crawler.categories.len(),
        base_url = %config.settings.crawler.base_url,
        "Configuration loaded"
    );

    // Load whatever the previous run persisted, then try a fresh crawl.
    let catalog = Arc::new(CatalogStore::new(&config.settings.crawler.catalog_file));
    let loaded = catalog.load().await;
    info!(loaded, "catalog loaded from disk");

    match HttpFetcher::new() {
        Ok(fetcher) => {
            let crawler = Crawler::new(fetcher, config.settings.crawler.clone());
            match crawler.run().await {
                Ok(records) => match catalog.reload(records).await {
                    Ok(count) => info!(count, "startup crawl complete"),
                    Err(e) => warn!(error = %e, "failed to persist startup crawl"),
                },
                Err(e) => {
                    warn!(error = %e, "startup crawl failed - keeping persisted catalog")
                }
            }
        }
        Err(e) => warn!(error = %e, "could not build HTTP fetcher"),
    }

    let provider: Option<Arc<dyn Provider>> = config.gemini_api_key().map(|key| {
        let client = GeminiClient::new(key, &config.settings.chat.model);
        info!(model = %config.settings.chat.model, "Gemini client created");
        Arc::new(client) as Arc<dyn Provider>
    });

    let sessions = SessionStore::new(config.settings.chat.max_history_turns);
    let state = Arc::new(AppState::new(
        catalog,
        sessions,
        provider,
        config.settings.crawler.clone(),
        config.settings.chat.clone(),
    ));

    server::run(state, &config.bind_addr()).await
}
