//! The language-model capability the pipeline depends on
//!
//! The crate never talks to a model service itself. Callers plug in an
//! [`LlmBackend`]; [`ReplayBackend`] serves previously recorded responses,
//! which is what the command-line tool uses.

use crate::source::SourcePayload;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Which workflow step a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    AnalyzeStructure,
    ConvertNode,
    PolicyRoadmap,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AnalyzeStructure => write!(f, "structure analysis"),
            Self::ConvertNode => write!(f, "node conversion"),
            Self::PolicyRoadmap => write!(f, "policy roadmap"),
        }
    }
}

/// One part of a multi-part request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart<'a> {
    Text(String),
    InlineData { mime_type: &'a str, data: &'a str },
}

/// A generation request
#[derive(Debug, Clone)]
pub struct LlmRequest<'a> {
    pub kind: RequestKind,
    pub prompt: String,
    /// Source document, absent for prompt-only requests
    pub document: Option<&'a SourcePayload>,
}

impl<'a> LlmRequest<'a> {
    /// Request parts in sending order: document first, then the prompt
    ///
    /// Plain text documents are wrapped in start and end markers; binary
    /// documents are attached as inline data.
    pub fn parts(&self) -> Vec<ContentPart<'a>> {
        let mut parts = Vec::with_capacity(2);

        match self.document {
            Some(SourcePayload::Text(text)) => parts.push(ContentPart::Text(format!(
                "DOCUMENT CONTENT START:\n{}\nDOCUMENT CONTENT END\n",
                text
            ))),
            Some(SourcePayload::Inline { mime_type, data }) => {
                parts.push(ContentPart::InlineData {
                    mime_type: mime_type.as_str(),
                    data: data.as_str(),
                })
            }
            None => {}
        }

        parts.push(ContentPart::Text(self.prompt.clone()));
        parts
    }
}

/// Errors reported by a backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The service answered with no text
    #[error("the model returned an empty response")]
    EmptyResponse,

    /// Transport or service failure
    #[error("model service failure: {0}")]
    Service(String),

    /// No response is available for this kind of request
    #[error("no response available for {0}")]
    Unavailable(RequestKind),
}

/// The opaque `generate(prompt, document) -> raw text` capability
pub trait LlmBackend {
    fn generate(&self, request: &LlmRequest<'_>) -> Result<String, BackendError>;
}

/// Serves one recorded response per request kind
#[derive(Debug, Clone, Default)]
pub struct ReplayBackend {
    responses: HashMap<RequestKind, String>,
}

impl ReplayBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the response returned for a request kind
    pub fn with_response(mut self, kind: RequestKind, raw: impl Into<String>) -> Self {
        self.responses.insert(kind, raw.into());
        self
    }

    /// Register a response read from a file
    pub fn with_response_file(self, kind: RequestKind, path: &Path) -> std::io::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(self.with_response(kind, raw))
    }
}

impl LlmBackend for ReplayBackend {
    fn generate(&self, request: &LlmRequest<'_>) -> Result<String, BackendError> {
        log::debug!("Replaying recorded {} response", request.kind);
        match self.responses.get(&request.kind) {
            Some(raw) if raw.trim().is_empty() => Err(BackendError::EmptyResponse),
            Some(raw) => Ok(raw.clone()),
            None => Err(BackendError::Unavailable(request.kind)),
        }
    }
}
