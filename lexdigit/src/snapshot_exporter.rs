//! Whole-batch renders taken at conversion time
//!
//! These are computed once from every chunk a conversion returned and
//! stored in [`ProcessingResult`]. They carry no document metadata; the
//! focus node (when any) names the document instead.

use crate::latex_exporter::{chunk_to_latex, escape_latex, LAWARTICLE_ENV};
use crate::law_model::{IndexNode, LawChunk, ProcessingResult};
use crate::xml_exporter::{escape_xml, write_article};
use itertools::Itertools;

/// Build a processing result from a converted batch
///
/// # Parameters
/// * `chunks` - Every chunk returned by the conversion
/// * `focus` - The outline node the conversion targeted, if any
///
/// # Returns
/// * `ProcessingResult` - Cached renders plus the chunks themselves
pub fn build_result(chunks: Vec<LawChunk>, focus: Option<&IndexNode>) -> ProcessingResult {
    let markdown = to_markdown(&chunks);
    let latex = to_latex(&chunks, focus);
    let xml = to_xml(&chunks, focus);
    let json = match serde_json::to_string_pretty(&chunks) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to serialize chunk batch: {}", e);
            String::new()
        }
    };

    ProcessingResult {
        markdown,
        latex,
        xml,
        json,
        chunks,
    }
}

fn to_markdown(chunks: &[LawChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| {
            let mut text = format!("### {}", chunk.id);
            if let Some(title) = chunk.title.as_deref().filter(|t| !t.is_empty()) {
                text.push_str(&format!(" - {}", title));
            }
            if let Some(date) = chunk.last_modified.as_deref().filter(|d| !d.is_empty()) {
                text.push_str(&format!("\n> *📅 Última actualización: {}*", date));
            }
            text.push_str("\n\n");
            text.push_str(&chunk.body_text());
            text
        })
        .join("\n\n---\n\n")
}

fn to_latex(chunks: &[LawChunk], focus: Option<&IndexNode>) -> String {
    let title = focus.map_or("Documento Legal", |node| node.id.as_str());
    let mut output = String::new();

    output.push_str("\\documentclass{article}\n");
    output.push_str("\\usepackage[utf8]{inputenc}\n");
    output.push_str(LAWARTICLE_ENV);
    output.push('\n');
    output.push_str(&format!("\\title{{{}}}\n", escape_latex(title)));
    output.push_str("\\begin{document}\n");

    for chunk in chunks {
        output.push_str(&format!("% {}\n", chunk.id.replace('\n', " ")));
        if let Some(date) = chunk.last_modified.as_deref().filter(|d| !d.is_empty()) {
            output.push_str(&format!(
                "\\marginpar{{\\tiny Reformado: {}}}\n",
                escape_latex(date)
            ));
        }
        output.push_str(&chunk_to_latex(chunk));
    }

    output.push_str("\\end{document}\n");
    output
}

fn to_xml(chunks: &[LawChunk], focus: Option<&IndexNode>) -> String {
    let name = focus.map_or("Ley", |node| node.id.as_str());
    let mut output = String::new();

    output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    output.push_str("<akomaNtoso>\n");
    output.push_str(&format!("  <act name=\"{}\">\n", escape_xml(name)));
    output.push_str("    <body>\n");
    for chunk in chunks {
        write_article(&mut output, chunk, "      ");
    }
    output.push_str("    </body>\n");
    output.push_str("  </act>\n");
    output.push_str("</akomaNtoso>\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::law_model::IndexNodeKind;

    fn chapter() -> IndexNode {
        IndexNode {
            kind: IndexNodeKind::Chapter,
            id: "Capítulo I".to_string(),
            description: None,
            page_range: None,
            children: Vec::new(),
        }
    }

    fn batch() -> Vec<LawChunk> {
        let mut first = LawChunk::new("Art. 1", "Uno");
        first.title = Some("Objeto".to_string());
        first.last_modified = Some("DOF 2020".to_string());
        vec![first, LawChunk::new("Art. 2", "Dos")]
    }

    #[test]
    fn test_snapshot_markdown() {
        let result = build_result(batch(), None);
        assert_eq!(
            result.markdown,
            "### Art. 1 - Objeto\n> *📅 Última actualización: DOF 2020*\n\nUno\n\n---\n\n### Art. 2\n\nDos"
        );
    }

    #[test]
    fn test_snapshot_latex_uses_focus_title() {
        let node = chapter();
        let result = build_result(batch(), Some(&node));
        assert!(result.latex.contains("\\title{Capítulo I}"));
        assert!(result.latex.contains("% Art. 1\n\\marginpar{\\tiny Reformado: DOF 2020}"));

        let untitled = build_result(batch(), None);
        assert!(untitled.latex.contains("\\title{Documento Legal}"));
    }

    #[test]
    fn test_empty_last_modified_is_omitted() {
        let mut chunk = LawChunk::new("Art. 1", "Uno");
        chunk.last_modified = Some(String::new());
        let result = build_result(vec![chunk], None);

        assert_eq!(result.markdown, "### Art. 1\n\nUno");
        assert!(!result.latex.contains("\\marginpar"));
    }

    #[test]
    fn test_snapshot_xml_act_name() {
        let node = chapter();
        assert!(build_result(batch(), Some(&node))
            .xml
            .contains("<act name=\"Capítulo I\">"));
        assert!(build_result(batch(), None).xml.contains("<act name=\"Ley\">"));
    }

    #[test]
    fn test_snapshot_json_is_chunk_array() {
        let result = build_result(batch(), None);
        let parsed: Vec<LawChunk> = serde_json::from_str(&result.json).unwrap();
        assert_eq!(parsed, result.chunks);
    }

    #[test]
    fn test_snapshot_of_empty_batch() {
        let result = build_result(Vec::new(), None);
        assert_eq!(result.markdown, "");
        assert_eq!(result.json, "[]");
        assert!(result.chunks.is_empty());
    }
}
