use crate::config::Settings;
use crate::error::CaptureError;
use crate::extract::{Extractor, FileExtractor, OcrEngine};
use crate::history::{FileStorage, NoteHistoryStore, StorageBackend};
use crate::orchestrator::Orchestrator;
use crate::providers::{LlmProvider, ProviderFactory};
use crate::summarize::Summarizer;

/// Builder for assembling a note capture [`Orchestrator`]
///
/// Any part left unset is created from the settings: Google Vision for OCR,
/// the configured generation provider, and file storage in the configured
/// directory.
#[derive(Default)]
pub struct NoteCaptureBuilder {
    settings: Option<Settings>,
    extractor: Option<Box<dyn Extractor>>,
    ocr: Option<Box<dyn OcrEngine>>,
    provider: Option<Box<dyn LlmProvider>>,
    storage: Option<Box<dyn StorageBackend>>,
    mask_service_errors: Option<bool>,
}

impl NoteCaptureBuilder {
    /// Use these settings instead of the defaults
    ///
    /// # Example
    /// ```
    /// use study_notes::{NoteCapture, Settings};
    ///
    /// let builder = NoteCapture::builder().settings(Settings::default());
    /// ```
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Replace the whole extraction adapter
    pub fn extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Keep the default PDF reader but use this OCR engine for images
    pub fn ocr(mut self, ocr: Box<dyn OcrEngine>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    /// Use this generation provider
    pub fn provider(mut self, provider: Box<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Persist the history to this backend
    pub fn storage(mut self, storage: Box<dyn StorageBackend>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Override `mask_service_errors` from the settings
    ///
    /// # Example
    /// ```
    /// use study_notes::NoteCapture;
    ///
    /// // Surface generation failures as errors
    /// let builder = NoteCapture::builder().mask_service_errors(false);
    /// ```
    pub fn mask_service_errors(mut self, mask: bool) -> Self {
        self.mask_service_errors = Some(mask);
        self
    }

    /// Assemble the orchestrator and load the persisted history
    ///
    /// # Errors
    /// Returns `CaptureError` if:
    /// - No API key is available for a part that has to be created
    /// - The configured provider is unknown
    pub fn build(self) -> Result<Orchestrator, CaptureError> {
        let settings = self.settings.unwrap_or_default();

        let extractor: Box<dyn Extractor> = match (self.extractor, self.ocr) {
            (Some(extractor), _) => extractor,
            (None, Some(ocr)) => Box::new(FileExtractor::new(ocr, settings.ocr.language.clone())),
            (None, None) => Box::new(FileExtractor::from_settings(&settings)?),
        };

        let provider = match self.provider {
            Some(provider) => provider,
            None => ProviderFactory::create(&settings.generation, settings.request_timeout())?,
        };
        let mask = self
            .mask_service_errors
            .unwrap_or(settings.mask_service_errors);

        let storage: Box<dyn StorageBackend> = match self.storage {
            Some(storage) => storage,
            None => Box::new(FileStorage::new(settings.storage.resolve_dir())),
        };

        Ok(Orchestrator::new(
            extractor,
            Summarizer::new(provider, mask),
            NoteHistoryStore::load(storage),
        ))
    }
}

/// Main entry point for the builder API
pub struct NoteCapture;

impl NoteCapture {
    /// Creates a new builder for a note capture pipeline
    ///
    /// # Example
    /// ```
    /// use study_notes::NoteCapture;
    ///
    /// let builder = NoteCapture::builder();
    /// ```
    pub fn builder() -> NoteCaptureBuilder {
        NoteCaptureBuilder::default()
    }
}
