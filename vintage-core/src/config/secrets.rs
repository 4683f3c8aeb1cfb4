//! Secrets loaded from environment variables only.
//!
//! Sensitive values like API keys are never written to disk; they are
//! read from the environment (with `.env` support for development).

use std::env;

use tracing::warn;

/// Secrets loaded exclusively from environment variables.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    /// Google Gemini API key (env: GEMINI_API_KEY)
    pub gemini_api_key: Option<String>,
}

impl Secrets {
    /// Load secrets from environment variables.
    ///
    /// Also loads a `.env` file if present. A missing key only warns:
    /// chat requests then get the fixed fallback reply instead of a
    /// generated one.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_env_inner()
    }

    pub(crate) fn from_env_inner() -> Self {
        let gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());

        if gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY is not set - chat replies will use the fallback message");
        }

        Self { gemini_api_key }
    }

    /// Whether a generation provider can be constructed.
    pub fn has_provider(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}
