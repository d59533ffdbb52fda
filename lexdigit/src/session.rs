//! The digitization workflow of one source document
//!
//! A [`Session`] owns everything derived from the loaded source: the
//! metadata and outline, the current processing result, the outline
//! navigation state and the chunk selection. Stages advance as
//!
//! ```text
//! idle -> analyzing -> selecting -> processing -> completed
//!            |                         |  ^           |
//!            v                         v  |           v
//!          idle                     selecting <--- (reset / next node)
//! ```
//!
//! Each model-backed step is split into `begin_*` and `complete_*` so a
//! caller with its own request loop can drive it; [`Session::analyze`] and
//! [`Session::process_node`] run both halves against an [`LlmBackend`].

use crate::export::ExportFormat;
use crate::index_tree::{IndexTreeState, NodePath};
use crate::law_model::{IndexNode, LawChunk, LawMetadata, ProcessingResult, StructureAnalysis};
use crate::llm::LlmBackend;
use crate::pipeline::{self, PipelineError};
use crate::retry::RetryPolicy;
use crate::selection::{export_content, ExportMode};
use crate::source::{SourceDocument, SourceError};
use thiserror::Error;

/// Stored after a failed structure analysis
pub const ANALYSIS_FAILED_MESSAGE: &str = "Error al analizar. Intente con otro documento.";

/// Workflow stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    /// No analysis yet
    #[default]
    Idle,
    /// Structure analysis in flight
    Analyzing,
    /// Outline available, waiting for a node selection
    Selecting,
    /// Node conversion in flight
    Processing,
    /// A processing result is available
    Completed,
}

impl Stage {
    /// Whether a model request is outstanding
    pub fn is_busy(self) -> bool {
        matches!(self, Stage::Analyzing | Stage::Processing)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Analyzing => "analyzing",
            Stage::Selecting => "selecting",
            Stage::Processing => "processing",
            Stage::Completed => "completed",
        };
        write!(f, "{}", name)
    }
}

/// Errors from session operations
#[derive(Error, Debug)]
pub enum SessionError {
    /// A request is in flight; the session was left untouched
    #[error("a request is already in progress ({0})")]
    Busy(Stage),

    #[error("no source document loaded")]
    NoSource,

    #[error("cannot {action} while {stage}")]
    InvalidStage { action: &'static str, stage: Stage },

    #[error("no outline node at path {0}")]
    UnknownNode(NodePath),

    #[error("no chunk at index {0}")]
    UnknownChunk(usize),

    #[error(transparent)]
    Source(#[from] SourceError),

    /// Structure analysis failed; carries the user-facing message
    #[error("{0}")]
    AnalysisFailed(String),

    /// Node conversion failed; carries the user-facing message
    #[error("{0}")]
    ProcessingFailed(String),
}

/// User-facing message for a failed node conversion
pub fn processing_failed_message(node_id: &str) -> String {
    format!("Error al procesar {}. Intente de nuevo.", node_id)
}

/// One document's workflow state
#[derive(Debug, Clone, Default)]
pub struct Session {
    source: Option<SourceDocument>,
    doc_key: String,
    stage: Stage,
    metadata: Option<LawMetadata>,
    result: Option<ProcessingResult>,
    tree: IndexTreeState,
    processing_node: Option<NodePath>,
    selected_chunk: Option<LawChunk>,
    export_mode: ExportMode,
    error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn source(&self) -> Option<&SourceDocument> {
        self.source.as_ref()
    }

    pub fn doc_key(&self) -> &str {
        &self.doc_key
    }

    pub fn metadata(&self) -> Option<&LawMetadata> {
        self.metadata.as_ref()
    }

    pub fn result(&self) -> Option<&ProcessingResult> {
        self.result.as_ref()
    }

    pub fn tree(&self) -> &IndexTreeState {
        &self.tree
    }

    /// Outline navigation state, for expand and collapse
    pub fn tree_mut(&mut self) -> &mut IndexTreeState {
        &mut self.tree
    }

    /// Node whose conversion is in flight
    pub fn processing_node(&self) -> Option<&NodePath> {
        self.processing_node.as_ref()
    }

    pub fn selected_chunk(&self) -> Option<&LawChunk> {
        self.selected_chunk.as_ref()
    }

    pub fn export_mode(&self) -> ExportMode {
        self.export_mode
    }

    /// Last user-facing error message
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn ensure_not_busy(&self) -> Result<(), SessionError> {
        if self.stage.is_busy() {
            return Err(SessionError::Busy(self.stage));
        }
        Ok(())
    }

    /// Replace the source document
    ///
    /// Everything derived from the previous source is discarded, including
    /// the document key.
    pub fn load_source(&mut self, source: SourceDocument) -> Result<(), SessionError> {
        self.ensure_not_busy()?;

        log::info!("Loaded source {} ({})", source.name, source.original_mime);
        *self = Self {
            source: Some(source),
            export_mode: self.export_mode,
            ..Self::default()
        };
        Ok(())
    }

    /// Record a rejected source file
    ///
    /// The current session state is kept; only the error message changes.
    pub fn reject_source(&mut self, error: SourceError) -> SessionError {
        log::error!("Rejected source: {}", error);
        self.error = Some(source_error_message(&error).to_string());
        SessionError::Source(error)
    }

    /// Set the user-supplied document key
    ///
    /// The key is stamped on the metadata when the analysis completes, or
    /// right away when metadata already exists.
    pub fn set_doc_key(&mut self, key: impl Into<String>) {
        self.doc_key = key.into();
        if let Some(metadata) = self.metadata.as_mut() {
            metadata.doc_key = Some(self.doc_key.clone());
        }
    }

    /// Enter the analyzing stage
    pub fn begin_analysis(&mut self) -> Result<&SourceDocument, SessionError> {
        self.ensure_not_busy()?;
        let source = self.source.as_ref().ok_or(SessionError::NoSource)?;

        self.stage = Stage::Analyzing;
        self.error = None;
        Ok(source)
    }

    /// Leave the analyzing stage with the outcome of the request
    ///
    /// On success the outline becomes selectable. On failure the session
    /// returns to idle with [`ANALYSIS_FAILED_MESSAGE`].
    pub fn complete_analysis(
        &mut self,
        outcome: Result<StructureAnalysis, PipelineError>,
    ) -> Result<&LawMetadata, SessionError> {
        if self.stage != Stage::Analyzing {
            return Err(SessionError::InvalidStage {
                action: "complete an analysis",
                stage: self.stage,
            });
        }

        match outcome {
            Ok(analysis) => {
                let doc_key = Some(self.doc_key.clone()).filter(|key| !key.is_empty());
                self.tree = IndexTreeState::new();
                self.result = None;
                self.selected_chunk = None;
                self.stage = Stage::Selecting;
                Ok(self
                    .metadata
                    .insert(LawMetadata::from_analysis(analysis, doc_key)))
            }
            Err(e) => {
                log::error!("Structure analysis failed: {}", e);
                log::debug!("Structure analysis failure details: {:?}", e);
                self.stage = Stage::Idle;
                self.error = Some(ANALYSIS_FAILED_MESSAGE.to_string());
                Err(SessionError::AnalysisFailed(ANALYSIS_FAILED_MESSAGE.to_string()))
            }
        }
    }

    /// Run the structure analysis against a backend
    pub fn analyze(&mut self, backend: &dyn LlmBackend) -> Result<&LawMetadata, SessionError> {
        let source = self.begin_analysis()?;
        let outcome = pipeline::analyze_structure(backend, &source.payload);
        self.complete_analysis(outcome)
    }

    /// Select an outline node and enter the processing stage
    ///
    /// Rejected with [`SessionError::Busy`] while a request is in flight.
    pub fn begin_processing(&mut self, path: &NodePath) -> Result<&IndexNode, SessionError> {
        self.ensure_not_busy()?;
        if !matches!(self.stage, Stage::Selecting | Stage::Completed) {
            return Err(SessionError::InvalidStage {
                action: "select a node",
                stage: self.stage,
            });
        }

        let metadata = self.metadata.as_ref().ok_or(SessionError::InvalidStage {
            action: "select a node",
            stage: self.stage,
        })?;
        let node = path
            .resolve(&metadata.structure)
            .ok_or_else(|| SessionError::UnknownNode(path.clone()))?;

        log::info!("Processing node {} ({})", path, node.label());
        self.tree.select(path.clone());
        self.processing_node = Some(path.clone());
        self.stage = Stage::Processing;
        self.error = None;
        Ok(node)
    }

    /// Leave the processing stage with the outcome of the conversion
    ///
    /// On success the result replaces the previous one and its first chunk
    /// is selected. On failure the session goes back to selecting; the
    /// previous result, if any, is kept.
    pub fn complete_processing(
        &mut self,
        outcome: Result<ProcessingResult, PipelineError>,
    ) -> Result<&ProcessingResult, SessionError> {
        if self.stage != Stage::Processing {
            return Err(SessionError::InvalidStage {
                action: "complete a conversion",
                stage: self.stage,
            });
        }

        let path = self.processing_node.take();
        match outcome {
            Ok(result) => {
                self.selected_chunk = result.chunks.first().cloned();
                self.stage = Stage::Completed;
                Ok(self.result.insert(result))
            }
            Err(e) => {
                let node_id = path
                    .as_ref()
                    .and_then(|p| self.metadata.as_ref().and_then(|m| p.resolve(&m.structure)))
                    .map(|node| node.id.clone())
                    .unwrap_or_default();
                log::error!("Conversion of {} failed: {}", node_id, e);
                log::debug!("Conversion failure details: {:?}", e);

                let message = processing_failed_message(&node_id);
                self.stage = Stage::Selecting;
                self.error = Some(message.clone());
                Err(SessionError::ProcessingFailed(message))
            }
        }
    }

    /// Convert an outline node against a backend
    pub fn process_node(
        &mut self,
        path: &NodePath,
        backend: &dyn LlmBackend,
        policy: &RetryPolicy,
    ) -> Result<&ProcessingResult, SessionError> {
        if self.source.is_none() {
            return Err(SessionError::NoSource);
        }

        let node = self.begin_processing(path)?.clone();
        let source = self.source.as_ref().ok_or(SessionError::NoSource)?;
        let outcome = pipeline::convert_node(backend, &source.payload, Some(&node), policy);
        self.complete_processing(outcome)
    }

    /// Discard the current result and go back to node selection
    pub fn reset_process(&mut self) -> Result<(), SessionError> {
        self.ensure_not_busy()?;
        if !matches!(self.stage, Stage::Completed | Stage::Selecting) {
            return Err(SessionError::InvalidStage {
                action: "reset the result",
                stage: self.stage,
            });
        }

        self.result = None;
        self.selected_chunk = None;
        self.stage = Stage::Selecting;
        Ok(())
    }

    /// Select a chunk of the current result by position
    pub fn select_chunk(&mut self, index: usize) -> Result<&LawChunk, SessionError> {
        let chunk = self
            .result
            .as_ref()
            .and_then(|result| result.chunks.get(index))
            .cloned()
            .ok_or(SessionError::UnknownChunk(index))?;
        Ok(self.selected_chunk.insert(chunk))
    }

    /// Select a chunk by its id
    pub fn select_chunk_by_id(&mut self, id: &str) -> Option<&LawChunk> {
        let chunk = self.result.as_ref()?.chunk(id)?.clone();
        Some(self.selected_chunk.insert(chunk))
    }

    /// Select an arbitrary chunk, which need not belong to the result
    pub fn set_selected_chunk(&mut self, chunk: Option<LawChunk>) {
        self.selected_chunk = chunk;
    }

    pub fn set_export_mode(&mut self, mode: ExportMode) {
        self.export_mode = mode;
    }

    /// Render the current selection
    pub fn export(&self, format: ExportFormat) -> String {
        export_content(
            format,
            self.metadata.as_ref(),
            self.result.as_ref(),
            self.export_mode,
            self.selected_chunk.as_ref(),
        )
    }
}

/// User-facing message for a rejected source file
pub fn source_error_message(error: &SourceError) -> &'static str {
    match error {
        SourceError::UnsupportedFormat { mime, .. } if mime == crate::source::MIME_LEGACY_DOC => {
            "El formato .doc antiguo no es soportado. Por favor conviértalo a .docx o PDF."
        }
        SourceError::UnsupportedFormat { .. } => "Formato no soportado. Use PDF o Word (.docx)",
        SourceError::ExtractionError { .. } => {
            "Error al leer el archivo Word. Asegúrese que sea un .docx válido."
        }
        SourceError::IoError { .. } => "Error al leer el archivo.",
    }
}
