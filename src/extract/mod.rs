mod ocr;
mod pdf;

pub use ocr::{GoogleVisionOcr, OcrEngine};
pub use pdf::{document_text, extract_pdf_text, PagedDocument, PdfDocument};

use async_trait::async_trait;
use log::debug;

use crate::config::Settings;
use crate::error::ExtractionError;
use crate::model::{FileKind, UploadFile};

/// Turns an uploaded file into plain text
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, file: &UploadFile) -> Result<String, ExtractionError>;
}

/// Dispatches images to an OCR engine and PDFs to the page reader
pub struct FileExtractor {
    ocr: Box<dyn OcrEngine>,
    language: String,
}

impl FileExtractor {
    pub fn new(ocr: Box<dyn OcrEngine>, language: impl Into<String>) -> Self {
        FileExtractor {
            ocr,
            language: language.into(),
        }
    }

    /// Build an extractor using Google Vision for images
    pub fn from_settings(settings: &Settings) -> Result<Self, ExtractionError> {
        let ocr = GoogleVisionOcr::new(&settings.ocr, settings.request_timeout())?;
        Ok(FileExtractor::new(Box::new(ocr), settings.ocr.language.clone()))
    }
}

#[async_trait]
impl Extractor for FileExtractor {
    async fn extract(&self, file: &UploadFile) -> Result<String, ExtractionError> {
        match file.kind() {
            Some(FileKind::Image) => {
                debug!("Running {} OCR on {}", self.ocr.engine_name(), file.name);
                self.ocr.recognize(&file.bytes, &self.language).await
            }
            Some(FileKind::Pdf) => {
                debug!("Reading PDF text from {}", file.name);
                // lopdf parsing is CPU-bound
                let bytes = file.bytes.clone();
                tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
                    .await
                    .map_err(|e| ExtractionError::Worker(format!("Task join error: {}", e)))?
            }
            None => Err(ExtractionError::UnsupportedMediaType(
                file.media_type.clone(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingOcr {
        calls: Arc<Mutex<Vec<(usize, String)>>>,
    }

    #[async_trait]
    impl OcrEngine for RecordingOcr {
        fn engine_name(&self) -> &str {
            "recording"
        }

        async fn recognize(&self, image: &[u8], language: &str) -> Result<String, ExtractionError> {
            self.calls
                .lock()
                .unwrap()
                .push((image.len(), language.to_string()));
            Ok("E = mc^2".to_string())
        }
    }

    struct FailingOcr;

    #[async_trait]
    impl OcrEngine for FailingOcr {
        fn engine_name(&self) -> &str {
            "failing"
        }

        async fn recognize(&self, _: &[u8], _: &str) -> Result<String, ExtractionError> {
            Err(ExtractionError::Ocr("engine crashed".to_string()))
        }
    }

    #[tokio::test]
    async fn test_image_goes_through_ocr_with_language() {
        let ocr = RecordingOcr::default();
        let calls = ocr.calls.clone();
        let extractor = FileExtractor::new(Box::new(ocr), "en");

        let file = UploadFile::new("board.jpg", "image/jpeg", vec![1, 2, 3]);
        let text = extractor.extract(&file).await.unwrap();

        assert_eq!(text, "E = mc^2");
        assert_eq!(*calls.lock().unwrap(), vec![(3, "en".to_string())]);
    }

    #[tokio::test]
    async fn test_pdf_does_not_touch_ocr() {
        let ocr = RecordingOcr::default();
        let calls = ocr.calls.clone();
        let extractor = FileExtractor::new(Box::new(ocr), "en");

        let bytes = pdf::tests::build_pdf(&[&["Hello"], &["World"]]);
        let file = UploadFile::new("notes.pdf", "application/pdf", bytes);

        assert_eq!(extractor.extract(&file).await.unwrap(), "Hello World ");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_pdf_parse_errors_cross_the_blocking_pool() {
        let extractor = FileExtractor::new(Box::new(FailingOcr), "en");
        let broken = UploadFile::new("broken.pdf", "application/pdf", b"not a pdf".to_vec());
        let good = UploadFile::new(
            "good.pdf",
            "application/pdf",
            pdf::tests::build_pdf(&[&["Kinetic", "energy"]]),
        );

        let (broken, good) = tokio::join!(extractor.extract(&broken), extractor.extract(&good));

        assert!(matches!(broken, Err(ExtractionError::Document(_))));
        assert_eq!(good.unwrap(), "Kinetic energy ");
    }

    #[tokio::test]
    async fn test_ocr_failure_is_extraction_error() {
        let extractor = FileExtractor::new(Box::new(FailingOcr), "en");
        let file = UploadFile::new("scan.png", "image/png", vec![0]);

        let err = extractor.extract(&file).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Ocr(ref cause) if cause == "engine crashed"));
    }

    #[tokio::test]
    async fn test_unsupported_media_type() {
        let extractor = FileExtractor::new(Box::new(FailingOcr), "en");
        let file = UploadFile::new("notes.docx", "application/msword", vec![0]);

        let err = extractor.extract(&file).await.unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedMediaType(ref t) if t == "application/msword"));
    }
}
