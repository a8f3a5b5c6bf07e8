//! Everything that talks to the external language model: the HTTP client,
//! answer classification and keyword extraction (with local fallbacks),
//! idea scoring and summarization.

pub mod classifier;
pub mod client;
pub mod error;
pub mod scoring;
pub mod summarize;

use std::sync::Arc;

pub use client::{ChatClient, ChatMessage, ChatRequest, OpenAiClient};
pub use error::LlmError;

use crate::config::OpenAiConfig;

/// Shared handle to the configured model client, if any.
#[derive(Clone, Default)]
pub struct AiService {
    client: Option<Arc<dyn ChatClient>>,
}

impl AiService {
    /// Build from config; without an API key every call site uses its fallback.
    pub fn from_config(cfg: &OpenAiConfig) -> Self {
        if !cfg.is_configured() {
            log::warn!("OPENAI_API_KEY not set - classification uses keyword fallback, scoring disabled");
            return Self::disabled();
        }
        match OpenAiClient::new(cfg) {
            Ok(client) => {
                log::info!("AI delegation enabled (model {})", client.model());
                Self::with_client(Arc::new(client))
            }
            Err(e) => {
                log::error!("Failed to build AI client: {e}");
                Self::disabled()
            }
        }
    }

    pub fn with_client(client: Arc<dyn ChatClient>) -> Self {
        AiService { client: Some(client) }
    }

    pub fn disabled() -> Self {
        AiService { client: None }
    }

    pub fn client(&self) -> Option<&dyn ChatClient> {
        self.client.as_deref()
    }
}
