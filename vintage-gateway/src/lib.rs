pub mod chat;
pub mod prompt;
pub mod providers;
pub mod server;
pub mod session;
pub mod state;

pub use providers::{GeminiClient, Provider, ProviderError};
pub use session::SessionStore;
pub use state::AppState;
