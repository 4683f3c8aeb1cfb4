//! Configuration management for vintage-assist.
//!
//! Separates secrets (environment variables only) from settings
//! (a TOML file in the XDG config directory).
//!
//! # Configuration Sources
//!
//! ## Secrets (Environment Variables)
//! - `GEMINI_API_KEY` - Google Gemini API key
//!
//! ## Settings (TOML File)
//! Located at `~/.config/vintage-assist/config.toml`:
//! ```toml
//! [gateway]
//! host = "127.0.0.1"
//! port = 5000
//!
//! [crawler]
//! base_url = "https://vintagestore.com.vn"
//! max_pages = 10
//!
//! [[crawler.categories]]
//! label = "Đầm"
//! path = "/collections/dam"
//!
//! [chat]
//! model = "gemini-2.5-flash"
//! top_k = 5
//! ```

mod secrets;
mod settings;

pub use secrets::Secrets;
pub use settings::{
    CategorySettings, ChatSettings, CrawlerSettings, GatewaySettings, LoggingSettings, Settings,
    SettingsError,
};

/// Combined configuration containing both secrets and settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secrets loaded from environment variables
    pub secrets: Secrets,
    /// Settings loaded from the TOML configuration file
    pub settings: Settings,
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// A missing `GEMINI_API_KEY` is not an error: the gateway still
    /// serves the catalog and answers with its fallback reply, so the
    /// crawl pipeline stays usable without a provider.
    pub fn load() -> Result<Self, ConfigError> {
        let secrets = Secrets::from_env();
        let settings = Settings::load()?;
        Ok(Self { secrets, settings })
    }

    /// Gemini API key, if one is configured.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.secrets.gemini_api_key.as_deref()
    }

    /// Address the gateway should bind to.
    pub fn bind_addr(&self) -> String {
        format!(
            "{}:{}",
            self.settings.gateway.host, self.settings.gateway.port
        )
    }
}

/// Load a `.env` file if present (development convenience).
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}
