pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod history;
pub mod model;
pub mod orchestrator;
pub mod providers;
pub mod summarize;

use std::path::Path;

pub use crate::builder::{NoteCapture, NoteCaptureBuilder};
pub use crate::config::Settings;
pub use crate::error::{CaptureError, ExtractionError, PersistenceError, ServiceError};
pub use crate::model::{Note, Subject, UploadFile};
pub use crate::orchestrator::{Orchestrator, UploadSession, UploadStatus};
pub use crate::summarize::{Summarizer, NO_RESPONSE, SERVICE_UNAVAILABLE};

/// Capture a note from a file on disk using settings from `config.toml` and
/// the environment.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let note = study_notes::capture_note(std::path::Path::new("lecture.pdf")).await?;
/// println!("{}", note.text);
/// # Ok(())
/// # }
/// ```
pub async fn capture_note(path: &Path) -> Result<Note, CaptureError> {
    let settings = Settings::load()?;
    let orchestrator = NoteCapture::builder().settings(settings).build()?;

    orchestrator.select_file(UploadFile::from_path(path).await?);
    orchestrator.upload().await
}

/// Ask the tutor a question using settings from `config.toml` and the
/// environment.
pub async fn ask_tutor(subject: Subject, question: &str) -> Result<String, CaptureError> {
    let settings = Settings::load()?;
    let summarizer = Summarizer::from_settings(&settings)?;
    summarizer.tutor(subject, question).await
}
