//! Intake of the source document handed to the model
//!
//! PDFs travel as inline base64 data. Word documents are converted to
//! plain text first and always travel as `text/plain`, whatever their
//! original MIME type. Legacy binary `.doc` files are rejected before any
//! model call is made.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_LEGACY_DOC: &str = "application/msword";
pub const MIME_TEXT: &str = "text/plain";

/// Part of the zip container holding the main document body
const DOCX_BODY_PART: &str = "word/document.xml";

/// Errors that can occur while preparing a source document
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error for {path}: {source}", path = .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file type is not accepted by the pipeline
    #[error("unsupported format for {name} ({mime}): {hint}")]
    UnsupportedFormat {
        name: String,
        mime: String,
        hint: &'static str,
    },

    /// A Word document could not be converted to text
    #[error("could not extract text from {name}: {message}")]
    ExtractionError { name: String, message: String },
}

/// Document data as sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePayload {
    /// Extracted plain text
    Text(String),
    /// Binary document, base64 encoded
    Inline { mime_type: String, data: String },
}

impl SourcePayload {
    /// MIME type the model is told about
    pub fn mime_type(&self) -> &str {
        match self {
            Self::Text(_) => MIME_TEXT,
            Self::Inline { mime_type, .. } => mime_type,
        }
    }

    /// Size of the payload in bytes
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Inline { data, .. } => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A source document ready to be analyzed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// File name as supplied by the user
    pub name: String,
    /// MIME type detected for the original file
    pub original_mime: String,
    pub payload: SourcePayload,
}

/// Converts a word-processor document to plain text
pub trait TextExtractor {
    fn extract_text(&self, name: &str, bytes: &[u8]) -> Result<String, SourceError>;
}

/// Reads the text runs of a `.docx` body part
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxTextExtractor;

impl TextExtractor for DocxTextExtractor {
    fn extract_text(&self, name: &str, bytes: &[u8]) -> Result<String, SourceError> {
        let extraction_error = |message: String| SourceError::ExtractionError {
            name: name.to_string(),
            message,
        };

        let mut archive =
            zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| extraction_error(e.to_string()))?;
        let mut body = String::new();
        archive
            .by_name(DOCX_BODY_PART)
            .map_err(|e| extraction_error(e.to_string()))?
            .read_to_string(&mut body)
            .map_err(|e| extraction_error(e.to_string()))?;

        wordprocessing_text(&body).map_err(|e| extraction_error(e.to_string()))
    }
}

/// Collect the text runs of a WordprocessingML body
///
/// Each paragraph ends with a newline, empty ones included. Tabs and
/// explicit breaks become `\t` and `\n`.
fn wordprocessing_text(body: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(body);
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(ref e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(ref e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Text(ref e) if in_run_text => text.push_str(&e.unescape()?),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(text.trim_end().to_string())
}

/// Guess the MIME type of a file from its name
pub fn detect_mime(name: &str) -> Option<&'static str> {
    mime_guess::from_path(name).first_raw()
}

/// Prepare a source document from raw file bytes
///
/// # Parameters
/// * `name` - File name, used for type detection
/// * `bytes` - File contents
/// * `extractor` - Converter used for Word documents
///
/// # Returns
/// * `Ok(SourceDocument)` - Document with its model payload
/// * `Err(SourceError)` - Unsupported type or unreadable Word document
pub fn prepare_source(
    name: &str,
    bytes: &[u8],
    extractor: &dyn TextExtractor,
) -> Result<SourceDocument, SourceError> {
    let mime = detect_mime(name).unwrap_or("application/octet-stream");
    let lower_name = name.to_lowercase();

    if mime == MIME_LEGACY_DOC {
        return Err(SourceError::UnsupportedFormat {
            name: name.to_string(),
            mime: mime.to_string(),
            hint: "legacy .doc files are not supported, convert to .docx or PDF",
        });
    }

    if mime == MIME_PDF {
        log::info!("Prepared {} as inline PDF ({} bytes)", name, bytes.len());
        return Ok(SourceDocument {
            name: name.to_string(),
            original_mime: mime.to_string(),
            payload: SourcePayload::Inline {
                mime_type: MIME_PDF.to_string(),
                data: STANDARD.encode(bytes),
            },
        });
    }

    if mime == MIME_DOCX || lower_name.ends_with(".docx") {
        let text = extractor.extract_text(name, bytes)?;
        log::info!("Extracted {} characters of text from {}", text.chars().count(), name);
        return Ok(SourceDocument {
            name: name.to_string(),
            original_mime: MIME_DOCX.to_string(),
            payload: SourcePayload::Text(text),
        });
    }

    Err(SourceError::UnsupportedFormat {
        name: name.to_string(),
        mime: mime.to_string(),
        hint: "use a PDF or Word (.docx) document",
    })
}

/// Read a file from disk and prepare it
pub fn load_source(path: &Path, extractor: &dyn TextExtractor) -> Result<SourceDocument, SourceError> {
    let bytes = std::fs::read(path).map_err(|source| SourceError::IoError {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    prepare_source(&name, &bytes, extractor)
}
