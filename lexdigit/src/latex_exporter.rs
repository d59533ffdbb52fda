//! LaTeX exporter
//!
//! Produces a minimal `article` document. Each chunk is wrapped in a
//! `lawarticle` environment taking the chunk id and title; the environment
//! is defined in the preamble so the output compiles on its own.

use crate::export::ExportHeader;
use crate::law_model::LawChunk;
use itertools::Itertools;

/// Definition of the `lawarticle` environment
pub(crate) const LAWARTICLE_ENV: &str = "\\newenvironment{lawarticle}[2]{\\subsection*{#1 #2}}{}";

/// Render a LaTeX document
pub fn render(header: &ExportHeader<'_>, chunks: &[&LawChunk]) -> String {
    let mut output = String::new();

    output.push_str("\\documentclass{article}\n");
    output.push_str("\\usepackage[utf8]{inputenc}\n");
    output.push_str("\\usepackage{geometry}\n");
    output.push_str("\\geometry{a4paper, margin=1in}\n");
    output.push_str(LAWARTICLE_ENV);
    output.push_str("\n\n");

    output.push_str(&format!("\\title{{{}}}\n", escape_latex(header.title)));
    output.push_str(&format!("\\author{{Clave: {}}}\n", escape_latex(header.key)));
    output.push_str(&format!(
        "\\date{{Última Reforma: {}}}\n\n",
        escape_latex(header.date)
    ));

    output.push_str("\\begin{document}\n\n");
    output.push_str("\\maketitle\n\n");
    output.push_str("\\begin{abstract}\n");
    output.push_str(&escape_latex(header.preamble));
    output.push_str("\n\\end{abstract}\n\n");
    output.push_str("\\section*{Contenido}\n");

    let body = chunks.iter().map(|chunk| chunk_to_latex(chunk)).join("\n");
    output.push_str(&body);

    output.push_str("\n\\end{document}\n");
    output
}

/// Wrap one chunk in a `lawarticle` environment
pub(crate) fn chunk_to_latex(chunk: &LawChunk) -> String {
    format!(
        "\n\\begin{{lawarticle}}{{{}}}{{{}}}\n{}\n\\end{{lawarticle}}\n",
        escape_latex(&chunk.id),
        escape_latex(chunk.title_text()),
        escape_latex(&chunk.body_text())
    )
}

/// Escape LaTeX special characters in running text
pub(crate) fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\textbackslash{}"),
            '~' => escaped.push_str("\\textasciitilde{}"),
            '^' => escaped.push_str("\\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
