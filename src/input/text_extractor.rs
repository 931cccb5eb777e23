//! Text extraction from in-memory documents

use crate::error::{MatcherError, Result};
use crate::input::file_detector::FileType;
use pulldown_cmark::{Event, Parser, Tag};
use std::panic::{self, AssertUnwindSafe};

const PDF_MAGIC: &[u8] = b"%PDF-";
/// Readers accept a PDF header anywhere in the first KiB.
const PDF_HEADER_WINDOW: usize = 1024;

/// Turns raw document bytes into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(MatcherError::Extraction("document is empty".to_string()));
        }

        let header = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
        if !header.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC) {
            return Err(MatcherError::Extraction(
                "document is not a PDF (missing %PDF- header)".to_string(),
            ));
        }

        // The decoder panics on some malformed files
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)));

        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(MatcherError::Extraction(format!(
                "Failed to extract text from PDF: {}",
                e
            ))),
            Err(_) => Err(MatcherError::Extraction(
                "PDF decoder aborted on a malformed document".to_string(),
            )),
        }
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        decode_utf8(bytes).map(str::to_string)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown = decode_utf8(bytes)?;
        Ok(markdown_to_text(markdown))
    }
}

pub fn extractor_for(file_type: FileType) -> Result<Box<dyn TextExtractor>> {
    match file_type {
        FileType::Pdf => Ok(Box::new(PdfExtractor)),
        FileType::Text => Ok(Box::new(PlainTextExtractor)),
        FileType::Markdown => Ok(Box::new(MarkdownExtractor)),
        FileType::Unknown => Err(MatcherError::InvalidInput(
            "Unsupported file type (expected .pdf, .txt or .md)".to_string(),
        )),
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<&str> {
    if bytes.is_empty() {
        return Err(MatcherError::Extraction("document is empty".to_string()));
    }
    let text = std::str::from_utf8(bytes)
        .map_err(|e| MatcherError::Extraction(format!("document is not valid UTF-8: {}", e)))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(..))
            | Event::End(Tag::Item)
            | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One-page PDF showing `text` in Helvetica, with a valid xref table.
    fn single_page_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_at = pdf.len();
        let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            tail.push_str(&format!("{:010} 00000 n \n", offset));
        }
        tail.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        ));
        pdf.extend_from_slice(tail.as_bytes());
        pdf
    }

    #[test]
    fn test_pdf_text_extracted() {
        let text = PdfExtractor
            .extract(&single_page_pdf("Python AWS Docker engineer"))
            .unwrap();
        assert!(text.contains("Python AWS Docker engineer"));
    }

    #[test]
    fn test_pdf_rejects_empty_and_non_pdf() {
        assert!(matches!(PdfExtractor.extract(b""), Err(MatcherError::Extraction(_))));

        let err = PdfExtractor.extract(b"Jane Doe\nSoftware Engineer").unwrap_err();
        assert!(err.to_string().contains("not a PDF"));
    }

    #[test]
    fn test_pdf_corrupt_body_is_extraction_error() {
        let err = PdfExtractor.extract(b"%PDF-1.7\n%garbage with no objects\n%%EOF").unwrap_err();
        assert!(matches!(err, MatcherError::Extraction(_)));
    }

    #[test]
    fn test_plain_text() {
        let text = PlainTextExtractor.extract("\u{feff}Jane Doé, Rust".as_bytes()).unwrap();
        assert_eq!(text, "Jane Doé, Rust");

        assert!(matches!(
            PlainTextExtractor.extract(&[0xff, 0xfe, 0x00]),
            Err(MatcherError::Extraction(_))
        ));
    }

    #[test]
    fn test_markdown_formatting_removed() {
        let md = "# John Doe\n\n## Experience\n\n**Software Engineer** at *Acme*\n\n- React\n- Node.js\n\nUses `kubectl` daily.";
        let text = MarkdownExtractor.extract(md.as_bytes()).unwrap();

        assert!(text.contains("John Doe"));
        assert!(text.contains("Software Engineer at Acme"));
        assert!(text.contains("React"));
        assert!(text.contains("Node.js"));
        assert!(text.contains("kubectl"));
        assert!(!text.contains("**"));
        assert!(!text.contains("##"));
    }

    #[test]
    fn test_extractor_for_unknown_type() {
        assert!(extractor_for(FileType::Pdf).is_ok());
        assert!(matches!(
            extractor_for(FileType::Unknown),
            Err(MatcherError::InvalidInput(_))
        ));
    }
}
