//! Selection of the chunks an export covers

use crate::export::{render, ExportFormat};
use crate::law_model::{LawChunk, LawMetadata, ProcessingResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Returned by [`export_content`] when there is nothing to export
pub const NO_CONTENT_SELECTED: &str = "No hay contenido seleccionado.";

/// Whether an export covers the whole batch or the selected chunk only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Every chunk of the current result
    #[default]
    Batch,
    /// Only the selected chunk
    Single,
}

/// Resolve the chunks to render
///
/// In batch mode this is every chunk of `result` in order. In single mode
/// it is the selected chunk alone, or nothing when no chunk is selected.
/// The selected chunk is not required to belong to `result`.
pub fn resolve_selection<'a>(
    result: &'a ProcessingResult,
    mode: ExportMode,
    selected_chunk: Option<&'a LawChunk>,
) -> Vec<&'a LawChunk> {
    match mode {
        ExportMode::Batch => result.chunks.iter().collect(),
        ExportMode::Single => selected_chunk.into_iter().collect(),
    }
}

/// Top-level export entry point
///
/// Returns [`NO_CONTENT_SELECTED`] without rendering when the metadata or
/// the processing result is missing. An empty selection with both present
/// still renders a complete document.
pub fn export_content(
    format: ExportFormat,
    metadata: Option<&LawMetadata>,
    result: Option<&ProcessingResult>,
    mode: ExportMode,
    selected_chunk: Option<&LawChunk>,
) -> String {
    let (Some(metadata), Some(result)) = (metadata, result) else {
        return NO_CONTENT_SELECTED.to_string();
    };

    let chunks = resolve_selection(result, mode, selected_chunk);
    render(format, metadata, &chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> ProcessingResult {
        ProcessingResult {
            chunks: vec![
                LawChunk::new("Art. 1", "Uno"),
                LawChunk::new("Art. 2", "Dos"),
                LawChunk::new("Art. 3", "Tres"),
            ],
            ..ProcessingResult::default()
        }
    }

    #[test]
    fn test_batch_returns_all_in_order() {
        let result = result();
        let ids: Vec<&str> = resolve_selection(&result, ExportMode::Batch, None)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["Art. 1", "Art. 2", "Art. 3"]);
    }

    #[test]
    fn test_batch_ignores_selected_chunk() {
        let result = result();
        let selected = &result.chunks[1];
        assert_eq!(
            resolve_selection(&result, ExportMode::Batch, Some(selected)).len(),
            3
        );
    }

    #[test]
    fn test_single_without_selection_is_empty() {
        let result = result();
        assert!(resolve_selection(&result, ExportMode::Single, None).is_empty());
    }

    #[test]
    fn test_single_accepts_foreign_chunk() {
        let result = result();
        let foreign = LawChunk::new("Art. 99", "Ajeno");
        let selection = resolve_selection(&result, ExportMode::Single, Some(&foreign));
        assert_eq!(selection, vec![&foreign]);
    }

    #[test]
    fn test_export_without_metadata_returns_sentinel() {
        let result = result();
        let output = export_content(
            ExportFormat::Markdown,
            None,
            Some(&result),
            ExportMode::Batch,
            None,
        );
        assert_eq!(output, NO_CONTENT_SELECTED);
    }

    #[test]
    fn test_export_without_result_returns_sentinel() {
        let metadata = LawMetadata::default();
        let output = export_content(ExportFormat::Html, Some(&metadata), None, ExportMode::Batch, None);
        assert_eq!(output, NO_CONTENT_SELECTED);
    }

    #[test]
    fn test_export_empty_selection_still_renders() {
        let metadata = LawMetadata {
            law_title: "Ley X".to_string(),
            ..LawMetadata::default()
        };
        let result = result();
        let output = export_content(
            ExportFormat::Markdown,
            Some(&metadata),
            Some(&result),
            ExportMode::Single,
            None,
        );
        assert!(output.starts_with("# Ley X\n"));
        assert!(!output.contains("###"));
    }
}
