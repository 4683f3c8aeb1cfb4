//! Settings loaded from TOML files.
//!
//! Non-sensitive configuration stored in TOML format in the XDG config
//! directory (`~/.config/vintage-assist/config.toml`). A default file
//! is written on first load so operators have something to edit.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application settings from the TOML configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub gateway: GatewaySettings,
    pub crawler: CrawlerSettings,
    pub chat: ChatSettings,
    pub logging: LoggingSettings,
}

/// HTTP gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub host: String,
    pub port: u16,
}

/// Catalog crawler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerSettings {
    /// Site origin the listing paths are resolved against.
    pub base_url: String,
    /// Upper bound on listing pages per category. Pagination usually
    /// stops earlier, on the first page without product blocks.
    pub max_pages: u32,
    /// Listing categories to crawl, in order.
    pub categories: Vec<CategorySettings>,
    /// Durable catalog snapshot file (pretty-printed JSON array).
    pub catalog_file: PathBuf,
}

/// One listing category: display label plus listing path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySettings {
    pub label: String,
    pub path: String,
}

/// Chat / retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Gemini model id.
    pub model: String,
    /// Catalog entries included in the retrieval context.
    pub top_k: usize,
    /// Turns kept per session; oldest turns are dropped beyond this.
    pub max_history_turns: usize,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gateway: GatewaySettings::default(),
            crawler: CrawlerSettings::default(),
            chat: ChatSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            base_url: "https://vintagestore.com.vn".to_string(),
            max_pages: 10,
            categories: vec![
                CategorySettings {
                    label: "Áo".to_string(),
                    path: "/collections/ao".to_string(),
                },
                CategorySettings {
                    label: "Đầm".to_string(),
                    path: "/collections/dam".to_string(),
                },
                CategorySettings {
                    label: "Phụ kiện".to_string(),
                    path: "/collections/phu-kien".to_string(),
                },
            ],
            catalog_file: default_catalog_file(),
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            top_k: 5,
            max_history_turns: 40,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn default_catalog_file() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("vintage-assist").join("catalog.json"))
        .unwrap_or_else(|| PathBuf::from("catalog.json"))
}

impl Settings {
    /// Path to the settings file.
    pub fn config_path() -> Result<PathBuf, SettingsError> {
        let config_dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(config_dir.join("vintage-assist").join("config.toml"))
    }

    /// Load settings from the default location, writing a default file
    /// when none exists yet.
    pub fn load() -> Result<Self, SettingsError> {
        let path = Self::config_path()?;

        if !path.exists() {
            let settings = Self::default();
            settings.save_to(&path)?;
            return Ok(settings);
        }

        Self::load_from(&path)
    }

    /// Load settings from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        let settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Write settings as TOML to an explicit path, creating parent
    /// directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
