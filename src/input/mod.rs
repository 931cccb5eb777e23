//! Input handling: file type detection, text extraction and file loading

pub mod file_detector;
pub mod text_extractor;

use crate::error::{MatcherError, Result};
use file_detector::FileType;
use log::info;
use std::path::Path;
use tokio::fs;

pub use text_extractor::{extractor_for, TextExtractor};

/// A document read from disk, not yet decoded.
#[derive(Debug)]
pub struct LoadedDocument {
    pub bytes: Vec<u8>,
    pub file_type: FileType,
}

/// Read a resume file, keeping its raw bytes for the extraction step.
pub async fn read_document(path: &Path) -> Result<LoadedDocument> {
    let file_type = FileType::from_path(path);
    if file_type == FileType::Unknown {
        return Err(MatcherError::InvalidInput(format!(
            "Unsupported file type for: {}",
            path.display()
        )));
    }

    let bytes = fs::read(path).await.map_err(|e| {
        MatcherError::InvalidInput(format!("Cannot read {}: {}", path.display(), e))
    })?;
    info!("Read {} ({} bytes, {:?})", path.display(), bytes.len(), file_type);

    Ok(LoadedDocument { bytes, file_type })
}

/// Read a job description file and return its plain text.
pub async fn read_job_description(path: &Path) -> Result<String> {
    let document = read_document(path).await?;
    if document.bytes.is_empty() {
        return Err(MatcherError::InvalidInput(format!(
            "Job description file is empty: {}",
            path.display()
        )));
    }
    extractor_for(document.file_type)?.extract(&document.bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(suffix: &str, content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[tokio::test]
    async fn reads_document_bytes_and_type() {
        let file = temp_file(".pdf", b"%PDF-1.4 stub");
        let document = read_document(file.path()).await.unwrap();

        assert_eq!(document.file_type, FileType::Pdf);
        assert_eq!(document.bytes, b"%PDF-1.4 stub");
    }

    #[tokio::test]
    async fn rejects_unknown_extension() {
        let file = temp_file(".xyz", b"data");
        let err = read_document(file.path()).await.unwrap_err();
        assert!(matches!(err, MatcherError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn missing_file_is_invalid_input() {
        let err = read_document(Path::new("does/not/exist.pdf")).await.unwrap_err();
        assert!(matches!(err, MatcherError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn job_description_markdown_is_flattened() {
        let file = temp_file(".md", b"## Requirements\n\n- **Python**\n- AWS");
        let text = read_job_description(file.path()).await.unwrap();
        assert_eq!(text, "Requirements\nPython\nAWS");
    }

    #[tokio::test]
    async fn empty_job_description_rejected() {
        let file = temp_file(".txt", b"");
        let err = read_job_description(file.path()).await.unwrap_err();
        assert!(matches!(err, MatcherError::InvalidInput(_)));
    }
}
