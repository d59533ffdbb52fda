//! Export dispatch
//!
//! Every renderer is a pure function of the metadata and the selected
//! chunks. Nothing here performs I/O and nothing fails: missing optional
//! fields render as empty strings.

use crate::law_model::{LawChunk, LawMetadata};
use crate::{html_exporter, json_exporter, latex_exporter, markdown_exporter, xml_exporter};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Target export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Latex,
    Xml,
    Html,
    Json,
}

impl ExportFormat {
    /// All formats in display order
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Markdown,
        ExportFormat::Latex,
        ExportFormat::Xml,
        ExportFormat::Html,
        ExportFormat::Json,
    ];

    /// Conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Latex => "tex",
            Self::Xml => "xml",
            Self::Html => "html",
            Self::Json => "json",
        }
    }

    /// Detect a format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "tex" | "latex" => Some(Self::Latex),
            "xml" => Some(Self::Xml),
            "html" | "htm" => Some(Self::Html),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Markdown => "Markdown",
            Self::Latex => "LaTeX",
            Self::Xml => "XML",
            Self::Html => "HTML",
            Self::Json => "JSON",
        };
        write!(f, "{}", name)
    }
}

/// Header fields shared by every format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportHeader<'a> {
    pub title: &'a str,
    pub key: &'a str,
    pub date: &'a str,
    pub preamble: &'a str,
}

impl<'a> ExportHeader<'a> {
    /// Build the header from document metadata
    pub fn from_metadata(metadata: &'a LawMetadata) -> Self {
        Self {
            title: &metadata.law_title,
            key: metadata.key(),
            date: &metadata.last_reform_date,
            preamble: &metadata.presentation_text,
        }
    }
}

/// Render the selected chunks in the requested format
///
/// # Parameters
/// * `format` - Target format
/// * `metadata` - Document metadata providing the header
/// * `chunks` - Selected chunks, rendered in order
///
/// # Returns
/// * `String` - The complete document text
pub fn render(format: ExportFormat, metadata: &LawMetadata, chunks: &[&LawChunk]) -> String {
    let header = ExportHeader::from_metadata(metadata);
    log::debug!("Rendering {} chunks as {}", chunks.len(), format);

    match format {
        ExportFormat::Markdown => markdown_exporter::render(&header, chunks),
        ExportFormat::Latex => latex_exporter::render(&header, chunks),
        ExportFormat::Xml => xml_exporter::render(&header, chunks),
        ExportFormat::Html => html_exporter::render(&header, chunks),
        ExportFormat::Json => json_exporter::render(&header, chunks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> LawMetadata {
        LawMetadata {
            law_title: "Ley General".to_string(),
            last_reform_date: "2021-05-01".to_string(),
            presentation_text: "Exposición".to_string(),
            structure: Vec::new(),
            doc_key: Some("LG-01".to_string()),
        }
    }

    #[test]
    fn test_format_extension_roundtrip() {
        for format in ExportFormat::ALL {
            assert_eq!(ExportFormat::from_extension(format.extension()), Some(format));
        }
        assert_eq!(ExportFormat::from_extension("HTM"), Some(ExportFormat::Html));
        assert_eq!(ExportFormat::from_extension("docx"), None);
    }

    #[test]
    fn test_every_format_renders_empty_selection() {
        let metadata = metadata();
        for format in ExportFormat::ALL {
            let output = render(format, &metadata, &[]);
            assert!(output.contains("Ley General"), "{format} lacks title");
            assert!(output.contains("LG-01"), "{format} lacks key");
            assert!(output.contains("2021-05-01"), "{format} lacks date");
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let metadata = metadata();
        let chunk = LawChunk::new("Art. 1", "Texto");
        for format in ExportFormat::ALL {
            assert_eq!(
                render(format, &metadata, &[&chunk]),
                render(format, &metadata, &[&chunk])
            );
        }
    }
}
