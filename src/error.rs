use thiserror::Error;

/// Errors raised while turning an uploaded file into plain text
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The file is neither an image nor a PDF
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The OCR engine rejected the image or answered with an error
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// The OCR request never got an answer
    #[error("OCR request failed: {0}")]
    OcrRequest(#[from] reqwest::Error),

    /// The PDF could not be parsed
    #[error("Failed to parse document: {0}")]
    Document(#[from] lopdf::Error),

    /// The blocking PDF task panicked or was cancelled
    #[error("PDF worker failed: {0}")]
    Worker(String),

    /// A page index past the end of the document was requested
    #[error("Page {0} is out of range")]
    PageOutOfRange(usize),

    /// Extraction succeeded but produced nothing worth summarizing
    #[error("No text could be extracted from {0}")]
    NoText(String),

    /// Failed to read the uploaded file
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the remote generation service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No API key in configuration or environment
    #[error("{0} not found in config or environment")]
    MissingApiKey(&'static str),

    /// Network or decoding failure
    #[error("Request to generation service failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Generation service error ({status}): {body}")]
    Status { status: u16, body: String },

    /// Provider name not known to the factory
    #[error(
        "Unknown provider: {0} (available: {})",
        crate::providers::ProviderFactory::available_providers().join(", ")
    )]
    UnknownProvider(String),
}

/// Errors raised while reading or writing the note history slot
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors surfaced to the caller of a capture cycle
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Nothing to process, e.g. no file selected or a blank question
    #[error("{0}")]
    Validation(String),

    /// A capture cycle is already running
    #[error("A capture is already in progress")]
    Busy,

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
