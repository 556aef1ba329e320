use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level settings for the note capture pipeline
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Generation service used for summaries and tutoring
    #[serde(default)]
    pub generation: ProviderConfig,
    /// OCR engine used for images
    #[serde(default)]
    pub ocr: OcrConfig,
    /// Where the note history lives
    #[serde(default)]
    pub storage: StorageConfig,
    /// Replace generation failures with a placeholder answer instead of an error
    #[serde(default = "default_mask_service_errors")]
    pub mask_service_errors: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Configuration for the generation provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Provider name ("google" or "openai")
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier (e.g., "gemini-2.0-flash")
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

/// Configuration for the OCR engine
#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    /// API key for Google Cloud Vision (falls back to GOOGLE_API_KEY)
    pub api_key: Option<String>,
    /// Base URL for the Vision endpoint
    pub base_url: Option<String>,
    /// Language hint passed to the engine
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Directory holding the persisted slots; defaults to the user data dir
    pub dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            generation: ProviderConfig::default(),
            ocr: OcrConfig::default(),
            storage: StorageConfig::default(),
            mask_service_errors: default_mask_service_errors(),
            timeout: default_timeout(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            language: default_language(),
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "google".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_language() -> String {
    "en".to_string()
}

fn default_mask_service_errors() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

impl StorageConfig {
    /// Resolve the storage directory, falling back to `<data dir>/study-notes`
    pub fn resolve_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("study-notes")
        })
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with STUDY_NOTES__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: STUDY_NOTES__GENERATION__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("STUDY_NOTES")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Parse settings from a TOML document, ignoring files and environment
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.generation.provider, "google");
        assert_eq!(settings.generation.model, "gemini-2.0-flash");
        assert_eq!(settings.generation.temperature, 0.7);
        assert_eq!(settings.generation.max_tokens, 2000);
        assert_eq!(settings.ocr.language, "en");
        assert!(settings.mask_service_errors);
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings.generation.provider, "google");
        assert!(settings.generation.api_key.is_none());
        assert!(settings.storage.dir.is_none());
    }

    #[test]
    fn test_parse_full_document() {
        let settings = Settings::from_toml_str(
            r#"
            mask_service_errors = false
            timeout = 5

            [generation]
            provider = "openai"
            model = "gpt-4o-mini"
            api_key = "test-key"
            base_url = "http://localhost:8080"

            [ocr]
            api_key = "vision-key"
            language = "de"

            [storage]
            dir = "/tmp/notes"
            "#,
        )
        .unwrap();

        assert!(!settings.mask_service_errors);
        assert_eq!(settings.timeout, 5);
        assert_eq!(settings.generation.provider, "openai");
        assert_eq!(settings.generation.api_key.as_deref(), Some("test-key"));
        assert_eq!(settings.generation.temperature, 0.7);
        assert_eq!(settings.ocr.api_key.as_deref(), Some("vision-key"));
        assert_eq!(settings.ocr.language, "de");
        assert_eq!(settings.storage.resolve_dir(), PathBuf::from("/tmp/notes"));
    }

    #[test]
    fn test_storage_dir_fallback() {
        let dir = StorageConfig::default().resolve_dir();
        assert!(dir.ends_with("study-notes"));
    }
}
