use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

use crate::error::{CaptureError, ExtractionError};
use crate::extract::Extractor;
use crate::history::NoteHistoryStore;
use crate::model::{Note, UploadFile};
use crate::summarize::Summarizer;

/// Where the current capture cycle stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Extracting,
    Summarizing,
    Done,
    Failed,
}

/// Snapshot of the transient upload state
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub selected_file: Option<UploadFile>,
    pub status: UploadStatus,
}

/// Runs capture cycles: extract, summarize, then prepend to the history.
///
/// Only one cycle runs at a time. Starting another while one is in flight
/// fails with [`CaptureError::Busy`].
pub struct Orchestrator {
    extractor: Box<dyn Extractor>,
    summarizer: Summarizer,
    history: Mutex<NoteHistoryStore>,
    selected: Mutex<Option<UploadFile>>,
    status: watch::Sender<UploadStatus>,
    busy: AtomicBool,
}

/// Clears the busy flag when the cycle ends, even if its future is dropped
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl Orchestrator {
    pub fn new(
        extractor: Box<dyn Extractor>,
        summarizer: Summarizer,
        history: NoteHistoryStore,
    ) -> Self {
        let (status, _) = watch::channel(UploadStatus::Idle);
        Orchestrator {
            extractor,
            summarizer,
            history: Mutex::new(history),
            selected: Mutex::new(None),
            status,
            busy: AtomicBool::new(false),
        }
    }

    /// Select the file for the next cycle
    pub fn select_file(&self, file: UploadFile) {
        info!("Selected {} ({})", file.name, file.media_type);
        *lock(&self.selected) = Some(file);
        if !self.is_busy() {
            self.status.send_replace(UploadStatus::Idle);
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn status(&self) -> UploadStatus {
        *self.status.borrow()
    }

    /// Watch status transitions
    pub fn subscribe(&self) -> watch::Receiver<UploadStatus> {
        self.status.subscribe()
    }

    pub fn session(&self) -> UploadSession {
        UploadSession {
            selected_file: lock(&self.selected).clone(),
            status: self.status(),
        }
    }

    /// Copy of the current history, newest first
    pub fn notes(&self) -> Vec<Note> {
        lock(&self.history).notes().to_vec()
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    /// Run one capture cycle on the selected file.
    ///
    /// The selected file is consumed. On success the new note is already
    /// persisted and returned.
    ///
    /// # Returns
    /// The note that was prepended to the history
    ///
    /// # Errors
    /// * [`CaptureError::Busy`] if another cycle is running
    /// * [`CaptureError::Validation`] if no file is selected
    /// * [`CaptureError::Extraction`] if the file yields no text
    /// * [`CaptureError::Service`] if the service fails and errors are not masked
    pub async fn upload(&self) -> Result<Note, CaptureError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CaptureError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        let file = lock(&self.selected).take();
        let Some(file) = file else {
            return Err(CaptureError::Validation(
                "Please select a file first.".to_string(),
            ));
        };

        match self.run_cycle(&file).await {
            Ok(note) => {
                info!("Captured note {} from {}", note.id, file.name);
                self.status.send_replace(UploadStatus::Done);
                Ok(note)
            }
            Err(e) => {
                error!("Capture of {} failed: {}", file.name, e);
                self.status.send_replace(UploadStatus::Failed);
                Err(e)
            }
        }
    }

    async fn run_cycle(&self, file: &UploadFile) -> Result<Note, CaptureError> {
        self.status.send_replace(UploadStatus::Extracting);
        let text = self.extractor.extract(file).await?;
        if text.trim().is_empty() {
            return Err(ExtractionError::NoText(file.name.clone()).into());
        }

        self.status.send_replace(UploadStatus::Summarizing);
        let summary = self.summarizer.summarize(&text).await?;

        let mut history = lock(&self.history);
        let notes = history.prepend(summary);
        Ok(notes[0].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::history::{MemoryStorage, STORAGE_KEY};
    use crate::providers::LlmProvider;
    use async_trait::async_trait;

    struct FixedExtractor(Result<&'static str, &'static str>);

    #[async_trait]
    impl Extractor for FixedExtractor {
        async fn extract(&self, _: &UploadFile) -> Result<String, ExtractionError> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(cause) => Err(ExtractionError::Ocr(cause.to_string())),
            }
        }
    }

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        fn provider_name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<Option<String>, ServiceError> {
            Ok(Some(format!("summary of [{}]", prompt)))
        }
    }

    fn build(
        extracted: Result<&'static str, &'static str>,
        storage: &MemoryStorage,
    ) -> Orchestrator {
        Orchestrator::new(
            Box::new(FixedExtractor(extracted)),
            Summarizer::new(Box::new(EchoProvider), true),
            NoteHistoryStore::load(Box::new(storage.clone())),
        )
    }

    fn png() -> UploadFile {
        UploadFile::new("board.png", "image/png", vec![1])
    }

    #[tokio::test]
    async fn test_upload_without_file_is_validation_error() {
        let storage = MemoryStorage::new();
        let orchestrator = build(Ok("text"), &storage);

        let err = orchestrator.upload().await.unwrap_err();

        assert!(matches!(err, CaptureError::Validation(_)));
        assert_eq!(orchestrator.status(), UploadStatus::Idle);
        assert!(!orchestrator.is_busy());
    }

    #[tokio::test]
    async fn test_successful_cycle() {
        let storage = MemoryStorage::new();
        let orchestrator = build(Ok("Ohm's law"), &storage);
        let mut statuses = orchestrator.subscribe();

        orchestrator.select_file(png());
        let note = orchestrator.upload().await.unwrap();

        assert_eq!(note.text, "summary of [Summarize: Ohm's law]");
        assert_eq!(orchestrator.status(), UploadStatus::Done);
        assert!(!orchestrator.is_busy());
        assert!(statuses.has_changed().unwrap());
        assert_eq!(*statuses.borrow_and_update(), UploadStatus::Done);
        assert_eq!(orchestrator.notes(), vec![note]);
        assert!(storage.get(STORAGE_KEY).unwrap().contains("Ohm's law"));
    }

    #[tokio::test]
    async fn test_selected_file_is_consumed() {
        let storage = MemoryStorage::new();
        let orchestrator = build(Ok("text"), &storage);

        orchestrator.select_file(png());
        orchestrator.upload().await.unwrap();

        assert!(orchestrator.session().selected_file.is_none());
        assert!(matches!(
            orchestrator.upload().await,
            Err(CaptureError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_extraction_failure_creates_no_note() {
        let storage = MemoryStorage::new();
        let orchestrator = build(Err("engine crashed"), &storage);

        orchestrator.select_file(png());
        let err = orchestrator.upload().await.unwrap_err();

        assert!(matches!(err, CaptureError::Extraction(ExtractionError::Ocr(_))));
        assert_eq!(orchestrator.status(), UploadStatus::Failed);
        assert!(!orchestrator.is_busy());
        assert!(orchestrator.notes().is_empty());
        assert!(storage.get(STORAGE_KEY).is_none());
    }

    #[tokio::test]
    async fn test_blank_extraction_is_not_summarized() {
        let storage = MemoryStorage::new();
        let orchestrator = build(Ok("  \n "), &storage);

        orchestrator.select_file(png());
        let err = orchestrator.upload().await.unwrap_err();

        assert!(matches!(
            err,
            CaptureError::Extraction(ExtractionError::NoText(ref name)) if name == "board.png"
        ));
        assert!(orchestrator.notes().is_empty());
    }

    #[tokio::test]
    async fn test_new_selection_resets_to_idle() {
        let storage = MemoryStorage::new();
        let orchestrator = build(Err("boom"), &storage);

        orchestrator.select_file(png());
        let _ = orchestrator.upload().await;
        assert_eq!(orchestrator.status(), UploadStatus::Failed);

        orchestrator.select_file(png());
        let session = orchestrator.session();
        assert_eq!(session.status, UploadStatus::Idle);
        assert_eq!(session.selected_file.unwrap().name, "board.png");
    }
}
