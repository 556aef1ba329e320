use log::{debug, warn};

use crate::config::Settings;
use crate::error::{CaptureError, ServiceError};
use crate::model::Subject;
use crate::providers::{summarize_prompt, tutor_prompt, LlmProvider, ProviderFactory};

/// Answer used when the service replied without any text
pub const NO_RESPONSE: &str = "No response from AI.";

/// Answer used in place of a failed service call when errors are masked
pub const SERVICE_UNAVAILABLE: &str =
    "I couldn't generate a response at the moment. Please try again later.";

/// Client for the generation service with the soft-failure policy applied
pub struct Summarizer {
    provider: Box<dyn LlmProvider>,
    mask_service_errors: bool,
}

impl Summarizer {
    pub fn new(provider: Box<dyn LlmProvider>, mask_service_errors: bool) -> Self {
        Summarizer {
            provider,
            mask_service_errors,
        }
    }

    /// Build the configured provider and wrap it
    pub fn from_settings(settings: &Settings) -> Result<Self, ServiceError> {
        let provider = ProviderFactory::create(&settings.generation, settings.request_timeout())?;
        Ok(Summarizer::new(provider, settings.mask_service_errors))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Summarize extracted text into a short note.
    ///
    /// Blank input never reaches the service and yields [`NO_RESPONSE`].
    ///
    /// # Arguments
    /// * `text` - Extracted text, sent as `"Summarize: " + text`
    ///
    /// # Returns
    /// The first text segment of the answer, or a placeholder
    ///
    /// # Errors
    /// Returns the service error when masking is turned off
    pub async fn summarize(&self, text: &str) -> Result<String, ServiceError> {
        if text.trim().is_empty() {
            debug!("Skipping summarization of blank text");
            return Ok(NO_RESPONSE.to_string());
        }

        self.complete(&summarize_prompt(text)).await
    }

    /// Ask the tutor a question about `subject`
    pub async fn tutor(&self, subject: Subject, question: &str) -> Result<String, CaptureError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(CaptureError::Validation(
                "Please enter a question first.".to_string(),
            ));
        }

        Ok(self.complete(&tutor_prompt(subject, question)).await?)
    }

    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        match self.provider.generate(prompt).await {
            Ok(Some(text)) if !text.is_empty() => Ok(text),
            Ok(_) => {
                debug!("{} returned no text segment", self.provider.provider_name());
                Ok(NO_RESPONSE.to_string())
            }
            Err(e) if self.mask_service_errors => {
                warn!(
                    "Generation with {} failed, answering with placeholder: {}",
                    self.provider.provider_name(),
                    e
                );
                Ok(SERVICE_UNAVAILABLE.to_string())
            }
            Err(e) => Err(e),
        }
    }
}
