//! Two-step digitization pipeline
//!
//! 1. **Analysis**: ask the model for metadata and the outline
//! 2. **Conversion**: ask the model for the chunks of one outline node,
//!    retried under a [`RetryPolicy`], then render the batch snapshot
//!
//! Each step repairs and validates the raw response before anything is
//! returned; a failed step yields no partial result.

use crate::law_model::{IndexNode, ProcessingResult, StructureAnalysis};
use crate::llm::{BackendError, LlmBackend, LlmRequest, RequestKind};
use crate::prompts::{conversion_prompt, structure_prompt};
use crate::response::{parse_chunks, parse_structure, ResponseError};
use crate::retry::RetryPolicy;
use crate::snapshot_exporter::build_result;
use crate::source::SourcePayload;
use thiserror::Error;

/// Errors from a pipeline step
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("invalid response: {0}")]
    Response(#[from] ResponseError),
}

/// Step 1: analyze the document structure
///
/// # Parameters
/// * `backend` - Model capability
/// * `document` - Source payload
///
/// # Returns
/// * `Ok(StructureAnalysis)` - Metadata and outline as returned by the model
/// * `Err(PipelineError)` - Backend failure or unusable response
pub fn analyze_structure(
    backend: &dyn LlmBackend,
    document: &SourcePayload,
) -> Result<StructureAnalysis, PipelineError> {
    let request = LlmRequest {
        kind: RequestKind::AnalyzeStructure,
        prompt: structure_prompt(),
        document: Some(document),
    };

    log::info!("Requesting structure analysis ({})", document.mime_type());
    let raw = backend.generate(&request)?;
    let analysis = parse_structure(&raw)?;

    log::info!(
        "Structure analysis found {} top-level nodes for '{}'",
        analysis.structure.len(),
        analysis.law_title
    );
    Ok(analysis)
}

/// Step 2: convert one outline node into chunks
///
/// Each attempt re-issues the backend call; repair and schema failures
/// count as failed attempts just like backend errors.
///
/// # Parameters
/// * `backend` - Model capability
/// * `document` - Source payload
/// * `focus` - Node to extract, or `None` for the whole document
/// * `policy` - Retry policy for the call
///
/// # Returns
/// * `Ok(ProcessingResult)` - Chunks plus the whole-batch snapshot renders
/// * `Err(PipelineError)` - The last failure once attempts run out
pub fn convert_node(
    backend: &dyn LlmBackend,
    document: &SourcePayload,
    focus: Option<&IndexNode>,
    policy: &RetryPolicy,
) -> Result<ProcessingResult, PipelineError> {
    let request = LlmRequest {
        kind: RequestKind::ConvertNode,
        prompt: conversion_prompt(focus),
        document: Some(document),
    };
    let target = focus.map_or("whole document", |node| node.id.as_str());

    let chunks = policy.run(|attempt| {
        log::info!("Converting {} (attempt {})", target, attempt);
        let raw = backend.generate(&request)?;
        let chunks = parse_chunks(&raw)?;
        Ok::<_, PipelineError>(chunks)
    })?;

    log::info!("Converted {} into {} chunks", target, chunks.len());
    Ok(build_result(chunks, focus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::law_model::IndexNodeKind;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Returns queued responses in order and records the prompts it saw
    struct ScriptedBackend {
        responses: RefCell<VecDeque<Result<String, BackendError>>>,
        prompts: RefCell<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<Result<String, BackendError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl LlmBackend for ScriptedBackend {
        fn generate(&self, request: &LlmRequest<'_>) -> Result<String, BackendError> {
            self.prompts.borrow_mut().push(request.prompt.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(BackendError::Service("script exhausted".to_string())))
        }
    }

    fn instant() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            backoff_ms: 0,
        }
    }

    fn document() -> SourcePayload {
        SourcePayload::Text("Ley de prueba".to_string())
    }

    #[test]
    fn test_analyze_structure() {
        let backend = ScriptedBackend::new(vec![Ok(
            r#"{"lawTitle":"Ley X","lastReformDate":"2020","presentationText":"","structure":[{"type":"TITULO","id":"Título I"}]}"#
                .to_string(),
        )]);
        let analysis = analyze_structure(&backend, &document()).unwrap();
        assert_eq!(analysis.law_title, "Ley X");
        assert_eq!(analysis.structure[0].kind, IndexNodeKind::Title);
    }

    #[test]
    fn test_analyze_structure_is_not_retried() {
        let backend = ScriptedBackend::new(vec![
            Err(BackendError::EmptyResponse),
            Ok("{}".to_string()),
        ]);
        assert!(matches!(
            analyze_structure(&backend, &document()),
            Err(PipelineError::Backend(BackendError::EmptyResponse))
        ));
        assert_eq!(backend.prompts.borrow().len(), 1);
    }

    #[test]
    fn test_convert_node_retries_until_success() {
        let backend = ScriptedBackend::new(vec![
            Err(BackendError::EmptyResponse),
            Ok("not json at all".to_string()),
            Ok(r#"{"chunks":[{"id":"Art. 1","content":"Texto"}"#.to_string()),
        ]);
        let node = IndexNode {
            kind: IndexNodeKind::Chapter,
            id: "Capítulo I".to_string(),
            description: None,
            page_range: None,
            children: Vec::new(),
        };

        let result = convert_node(&backend, &document(), Some(&node), &instant()).unwrap();
        assert_eq!(result.chunks.len(), 1);
        assert_eq!(result.chunks[0].content_text(), "Texto");
        assert!(result.xml.contains("<act name=\"Capítulo I\">"));

        let prompts = backend.prompts.borrow();
        assert_eq!(prompts.len(), 3);
        assert!(prompts.iter().all(|p| p.contains("Capítulo I")));
    }

    #[test]
    fn test_convert_node_surfaces_last_error() {
        let backend = ScriptedBackend::new(vec![
            Err(BackendError::Service("timeout".to_string())),
            Err(BackendError::Service("timeout".to_string())),
            Ok(r#"{"chunks":[{"content":"sin id"}]}"#.to_string()),
        ]);
        let err = convert_node(&backend, &document(), None, &instant()).unwrap_err();
        assert!(matches!(err, PipelineError::Response(ResponseError::Schema { .. })));
    }
}
