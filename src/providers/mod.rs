mod factory;
mod google;
mod open_ai;
mod prompt;

pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::{summarize_prompt, tutor_prompt, SUMMARIZE_PREFIX};

use async_trait::async_trait;

use crate::error::ServiceError;

/// Unified trait for all text generation providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// Send `prompt` as a single user message.
    ///
    /// Returns `Ok(None)` when the service answered but the first candidate
    /// carries no text segment.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, ServiceError>;
}
