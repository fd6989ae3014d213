//! Multi-format file parser

use std::panic::{self, AssertUnwindSafe};

use crate::error::{Error, Result};
use crate::types::FileType;

/// Parsed document with extracted text
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// File type
    pub file_type: FileType,
    /// Extracted text content
    pub content: String,
    /// Total pages (if applicable)
    pub total_pages: Option<u32>,
}

/// Multi-format file parser
pub struct FileParser;

impl FileParser {
    /// Parse a file based on its extension
    pub fn parse(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let file_type = FileType::from_filename(filename);

        match file_type {
            FileType::Pdf => Self::parse_pdf(filename, data),
            FileType::Docx => Self::parse_docx(filename, data),
            FileType::Txt | FileType::Markdown => Ok(Self::parse_text(data, file_type)),
            FileType::Html => Self::parse_html(data),
            FileType::Csv => Ok(Self::parse_csv(data)),
            FileType::Unknown => Err(Error::UnsupportedFileType(filename.to_string())),
        }
    }

    /// Parse PDF document
    ///
    /// pdf-extract is tried first; when it fails or panics the text layer is
    /// read page by page with lopdf instead.
    fn parse_pdf(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let extracted = guard_extraction(filename, || {
            pdf_extract::extract_text_from_mem(data)
                .map_err(|e| Error::file_parse(filename, e.to_string()))
        });

        let content = match extracted {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("pdf-extract failed on {}, trying lopdf: {}", filename, e);
                guard_extraction(filename, || Self::extract_pdf_text_fallback(filename, data))?
            }
        };

        // Page count is informational; a lopdf failure doesn't fail the parse
        let total_pages = match lopdf::Document::load_mem(data) {
            Ok(doc) => Some(doc.get_pages().len() as u32),
            Err(_) => Some(1),
        };

        Ok(ParsedDocument {
            file_type: FileType::Pdf,
            content,
            total_pages,
        })
    }

    /// Text layer of every page via lopdf
    fn extract_pdf_text_fallback(filename: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        let text = doc
            .extract_text(&pages)
            .map_err(|e| Error::file_parse(filename, format!("Failed to extract text: {}", e)))?;

        if text.trim().is_empty() {
            return Err(Error::file_parse(
                filename,
                "PDF has no extractable text layer",
            ));
        }
        Ok(text)
    }

    /// Parse DOCX document
    fn parse_docx(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut content = String::new();

        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                content.push_str(&t.text);
                            }
                        }
                    }
                }
                content.push('\n');
            }
        }

        Ok(ParsedDocument {
            file_type: FileType::Docx,
            content,
            total_pages: Some(1),
        })
    }

    /// Parse plain text or markdown
    fn parse_text(data: &[u8], file_type: FileType) -> ParsedDocument {
        ParsedDocument {
            file_type,
            content: String::from_utf8_lossy(data).to_string(),
            total_pages: None,
        }
    }

    /// Parse HTML document
    fn parse_html(data: &[u8]) -> Result<ParsedDocument> {
        let html = String::from_utf8_lossy(data);
        let document = scraper::Html::parse_document(&html);

        let body_selector = scraper::Selector::parse("body")
            .map_err(|e| Error::internal(format!("Invalid selector: {}", e)))?;
        let mut content = String::new();

        if let Some(body) = document.select(&body_selector).next() {
            for text in body.text() {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    if !content.is_empty() {
                        content.push(' ');
                    }
                    content.push_str(trimmed);
                }
            }
        }

        Ok(ParsedDocument {
            file_type: FileType::Html,
            content,
            total_pages: None,
        })
    }

    /// Parse CSV file, one line per row
    fn parse_csv(data: &[u8]) -> ParsedDocument {
        let mut reader = csv::Reader::from_reader(data);
        let mut content = String::new();

        if let Ok(headers) = reader.headers() {
            content.push_str(&headers.iter().collect::<Vec<_>>().join(" | "));
            content.push('\n');
        }

        for record in reader.records().flatten() {
            content.push_str(&record.iter().collect::<Vec<_>>().join(" | "));
            content.push('\n');
        }

        ParsedDocument {
            file_type: FileType::Csv,
            content,
            total_pages: None,
        }
    }
}

/// Run an extractor, turning a panic into a parse error for `filename`
///
/// Third-party extractors can panic on malformed input; the panic must not
/// take down a rebuild.
pub fn guard_extraction<T, F>(filename: &str, extract: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(extract)) {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!("Extractor panicked on {}: {}", filename, reason);
            Err(Error::file_parse(filename, format!("extractor panicked: {}", reason)))
        }
    }
}
