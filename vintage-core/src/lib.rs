pub mod config;

pub use config::{
    CategorySettings, ChatSettings, Config, ConfigError, CrawlerSettings, GatewaySettings,
    LoggingSettings, Secrets, Settings, SettingsError, load_dotenv,
};
