use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::OcrConfig;
use crate::error::ExtractionError;

const VISION_BASE_URL: &str = "https://vision.googleapis.com";

/// Recognizes text in raster images
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Get the engine name (e.g., "google_vision")
    fn engine_name(&self) -> &str;

    /// Run one OCR pass over `image` and return the recognized text verbatim
    async fn recognize(&self, image: &[u8], language: &str) -> Result<String, ExtractionError>;
}

/// OCR backed by the Google Cloud Vision `images:annotate` endpoint
pub struct GoogleVisionOcr {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleVisionOcr {
    /// Create a Vision client from configuration
    pub fn new(config: &OcrConfig, timeout: Duration) -> Result<Self, ExtractionError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                ExtractionError::Ocr("GOOGLE_API_KEY not found in config or environment".into())
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| VISION_BASE_URL.to_string());

        Ok(GoogleVisionOcr {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        GoogleVisionOcr {
            client: Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl OcrEngine for GoogleVisionOcr {
    fn engine_name(&self) -> &str {
        "google_vision"
    }

    async fn recognize(&self, image: &[u8], language: &str) -> Result<String, ExtractionError> {
        let url = format!(
            "{}/v1/images:annotate?key={}",
            self.base_url, self.api_key
        );

        let request_body = json!({
            "requests": [{
                "image": {
                    "content": STANDARD.encode(image)
                },
                "features": [{
                    "type": "TEXT_DETECTION"
                }],
                "imageContext": {
                    "languageHints": [language]
                }
            }]
        });

        debug!("Sending OCR request to Google Vision API");

        let response = self
            .client
            .post(&url)
            .header("Accept-Encoding", "identity")
            .json(&request_body)
            .send()
            .await?;

        // Check for HTTP errors
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(ExtractionError::Ocr(format!(
                "Google Vision API error ({}): {}",
                status, error_text
            )));
        }

        let response_body: Value = response.json().await?;
        debug!("Google Vision API response: {:?}", response_body);

        let annotation = &response_body["responses"][0];
        if let Some(message) = annotation["error"]["message"].as_str() {
            return Err(ExtractionError::Ocr(message.to_string()));
        }

        // Vision omits fullTextAnnotation entirely when the image has no text
        let text = annotation["fullTextAnnotation"]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        debug!("Extracted text from image: {} characters", text.len());

        Ok(text)
    }
}
