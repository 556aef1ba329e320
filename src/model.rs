use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ExtractionError;

/// A generated short note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub text: String,
}

/// What the extraction adapter does with a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
}

/// An uploaded file with its declared media type
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadFile {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, inferring the media type from its extension
    pub async fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(UploadFile::new(name, media_type_for(path), bytes))
    }

    pub fn kind(&self) -> Option<FileKind> {
        let media_type = self.media_type.to_ascii_lowercase();
        if media_type.starts_with("image/") {
            Some(FileKind::Image)
        } else if media_type == "application/pdf" {
            Some(FileKind::Pdf)
        } else {
            None
        }
    }
}

/// Guess a media type from a file extension
pub fn media_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Subjects offered by the tutor, the test catalogue and the leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Mathematics,
    Physics,
    Chemistry,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Mathematics, Subject::Physics, Subject::Chemistry];

    /// Lowercase identifier, as used in prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Mathematics => "mathematics",
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Subject::Mathematics => "Mathematics",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
        };
        f.write_str(name)
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown subject: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_media_type() {
        let image = UploadFile::new("scan.png", "image/png", vec![]);
        let pdf = UploadFile::new("notes.pdf", "application/pdf", vec![]);
        let text = UploadFile::new("notes.txt", "text/plain", vec![]);

        assert_eq!(image.kind(), Some(FileKind::Image));
        assert_eq!(pdf.kind(), Some(FileKind::Pdf));
        assert_eq!(text.kind(), None);
    }

    #[test]
    fn test_media_type_is_case_insensitive() {
        assert_eq!(media_type_for(Path::new("SCAN.JPG")), "image/jpeg");
        assert_eq!(media_type_for(Path::new("notes.Pdf")), "application/pdf");
        assert_eq!(media_type_for(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn test_note_serializes_as_id_and_text() {
        let note = Note {
            id: 1700000000000,
            text: "Photosynthesis".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&note).unwrap(),
            r#"{"id":1700000000000,"text":"Photosynthesis"}"#
        );
    }

    #[test]
    fn test_subject_parsing() {
        assert_eq!("Physics".parse::<Subject>(), Ok(Subject::Physics));
        assert_eq!(" chemistry ".parse::<Subject>(), Ok(Subject::Chemistry));
        assert!("biology".parse::<Subject>().is_err());
        assert_eq!(Subject::Mathematics.to_string(), "Mathematics");
    }

    #[tokio::test]
    async fn test_from_path_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "page.png");
        assert_eq!(file.media_type, "image/png");
        assert_eq!(file.bytes, b"\x89PNG");
    }
}
