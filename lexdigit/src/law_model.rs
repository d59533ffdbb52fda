//! Document model for a digitized law
//!
//! These structures mirror the JSON shapes exchanged with the language
//! model (camelCase on the wire). The index tree is immutable once built
//! from an analysis response; transient view state lives in
//! [`crate::index_tree::IndexTreeState`].

use serde::{Deserialize, Serialize};

/// Key used in exports when the user did not supply one
pub const UNSPECIFIED_DOC_KEY: &str = "S/N";

/// Kind of an entry in the document outline
///
/// The wire format uses the Spanish tags; the English names are accepted
/// as aliases. Unknown tags are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IndexNodeKind {
    Law,
    Preamble,
    Title,
    Chapter,
    Article,
    Subitem,
    Other(String),
}

impl IndexNodeKind {
    /// Wire tag for this kind
    pub fn as_str(&self) -> &str {
        match self {
            Self::Law => "LEY",
            Self::Preamble => "PRESENTACION",
            Self::Title => "TITULO",
            Self::Chapter => "CAPITULO",
            Self::Article => "ARTICULO",
            Self::Subitem => "INCISO",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for IndexNodeKind {
    fn from(tag: String) -> Self {
        match tag.to_uppercase().as_str() {
            "LEY" | "LAW" => Self::Law,
            "PRESENTACION" | "PRESENTACIÓN" | "PREAMBLE" => Self::Preamble,
            "TITULO" | "TÍTULO" | "TITLE" => Self::Title,
            "CAPITULO" | "CAPÍTULO" | "CHAPTER" => Self::Chapter,
            "ARTICULO" | "ARTÍCULO" | "ARTICLE" => Self::Article,
            "INCISO" | "SUBITEM" => Self::Subitem,
            _ => Self::Other(tag),
        }
    }
}

impl From<IndexNodeKind> for String {
    fn from(kind: IndexNodeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for IndexNodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of the hierarchical outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexNode {
    /// Node kind, sent as `type`
    #[serde(rename = "type")]
    pub kind: IndexNodeKind,

    /// Label such as "Capítulo I"; unique only among siblings
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Advisory page hint, e.g. "10-12"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_range: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<IndexNode>,
}

impl IndexNode {
    /// Whether this node has any children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Label shown in outlines: id followed by the description when present
    pub fn label(&self) -> String {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => {
                format!("{} - {}", self.id, description)
            }
            _ => self.id.clone(),
        }
    }
}

/// Result of a structure analysis, exactly as the model returns it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructureAnalysis {
    pub law_title: String,
    pub last_reform_date: String,
    pub presentation_text: String,
    pub structure: Vec<IndexNode>,
}

/// Metadata of the law being digitized
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LawMetadata {
    pub law_title: String,
    pub last_reform_date: String,

    /// Preamble text; empty when none was detected
    pub presentation_text: String,

    /// Top-level outline nodes
    pub structure: Vec<IndexNode>,

    /// User-supplied document key, never taken from the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_key: Option<String>,
}

impl LawMetadata {
    /// Combine an analysis response with the key the user entered
    pub fn from_analysis(analysis: StructureAnalysis, doc_key: Option<String>) -> Self {
        Self {
            law_title: analysis.law_title,
            last_reform_date: analysis.last_reform_date,
            presentation_text: analysis.presentation_text,
            structure: analysis.structure,
            doc_key,
        }
    }

    /// Document key for exports, [`UNSPECIFIED_DOC_KEY`] when absent or empty
    pub fn key(&self) -> &str {
        match self.doc_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => UNSPECIFIED_DOC_KEY,
        }
    }
}

/// A paragraph of a chunk with its own reform annotation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reform_date: Option<String>,
}

/// One extracted unit of legal content, typically an article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LawChunk {
    /// Citation key such as "Art. 1"
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Physical page, advisory only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Verbatim text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_citation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<Vec<Paragraph>>,
}

impl LawChunk {
    /// Create a chunk with flat content only
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Title or the empty string
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Flat content or the empty string
    pub fn content_text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Paragraphs when present and non-empty
    pub fn detailed_paragraphs(&self) -> Option<&[Paragraph]> {
        self.paragraphs
            .as_deref()
            .filter(|paragraphs| !paragraphs.is_empty())
    }

    /// Body text: paragraph texts separated by blank lines, else the content
    pub fn body_text(&self) -> String {
        match self.detailed_paragraphs() {
            Some(paragraphs) => paragraphs
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
            None => self.content_text().to_string(),
        }
    }
}

/// Outputs of one node conversion
///
/// The text fields are rendered once from the whole batch at ingestion
/// time. Live exports are re-derived from `chunks` per selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingResult {
    pub markdown: String,
    pub latex: String,
    pub xml: String,
    pub json: String,
    pub chunks: Vec<LawChunk>,
}

impl ProcessingResult {
    /// Find a chunk by its id
    pub fn chunk(&self, id: &str) -> Option<&LawChunk> {
        self.chunks.iter().find(|c| c.id == id)
    }
}
