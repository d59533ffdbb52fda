//! Markdown exporter
//!
//! Layout:
//! - level-1 heading with the law title
//! - block-quoted key and reform date
//! - level-2 preamble section followed by a rule
//! - one level-3 heading per chunk, chunks separated by rules

use crate::export::ExportHeader;
use crate::law_model::LawChunk;
use itertools::Itertools;

/// Separator placed between chunks
const CHUNK_SEPARATOR: &str = "\n\n---\n\n";

/// Render a Markdown document
pub fn render(header: &ExportHeader<'_>, chunks: &[&LawChunk]) -> String {
    let mut output = String::new();

    write_header(&mut output, header);

    let body = chunks.iter().map(|chunk| chunk_to_markdown(chunk)).join(CHUNK_SEPARATOR);
    output.push_str(&body);

    output
}

/// Write title, metadata summary and preamble
fn write_header(output: &mut String, header: &ExportHeader<'_>) {
    output.push_str(&format!("# {}\n", header.title));
    output.push_str(&format!("> **Clave Documento:** {}\n", header.key));
    output.push_str(&format!("> **Última Reforma:** {}\n\n", header.date));
    output.push_str("## Presentación / Preámbulo\n");
    output.push_str(header.preamble);
    output.push_str("\n\n---\n\n");
}

/// Heading text for a chunk: id, then the title when present
fn chunk_heading(chunk: &LawChunk) -> String {
    match chunk.title.as_deref() {
        Some(title) if !title.is_empty() => format!("{} {}", chunk.id, title),
        _ => chunk.id.clone(),
    }
}

fn chunk_to_markdown(chunk: &LawChunk) -> String {
    format!("### {}\n{}", chunk_heading(chunk), chunk.body_text())
}
