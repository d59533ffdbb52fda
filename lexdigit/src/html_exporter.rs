//! HTML exporter
//!
//! This module renders a standalone HTML page with:
//! - Embedded CSS, no external resources
//! - A header block with title, document key and reform date
//! - The preamble in its own block
//! - One `<article>` per chunk, with reform badges on paragraphs

use crate::export::ExportHeader;
use crate::law_model::LawChunk;

/// Render a standalone HTML document
pub fn render(header: &ExportHeader<'_>, chunks: &[&LawChunk]) -> String {
    let mut output = String::new();

    write_html_header(&mut output, header.title);

    output.push_str("<body>\n");
    write_document_header(&mut output, header);
    write_preamble(&mut output, header.preamble);

    output.push_str("<main>\n");
    for chunk in chunks {
        write_article(&mut output, chunk);
    }
    output.push_str("</main>\n");

    output.push_str("</body>\n");
    output.push_str("</html>\n");

    output
}

/// Write doctype, head and CSS
fn write_html_header(output: &mut String, title: &str) {
    output.push_str("<!DOCTYPE html>\n");
    output.push_str("<html lang=\"es\">\n");
    output.push_str("<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    output.push_str("<style>\n");
    output.push_str(CSS_STYLES);
    output.push_str("</style>\n");
    output.push_str("</head>\n");
}

fn write_document_header(output: &mut String, header: &ExportHeader<'_>) {
    output.push_str("<header>\n");
    output.push_str(&format!("<h1>{}</h1>\n", escape_html(header.title)));
    output.push_str(&format!(
        "<div class=\"meta\">DOC KEY: {}</div>\n",
        escape_html(header.key)
    ));
    output.push_str(&format!(
        "<div class=\"meta\">REFORMA: {}</div>\n",
        escape_html(header.date)
    ));
    output.push_str("</header>\n");
}

fn write_preamble(output: &mut String, preamble: &str) {
    output.push_str("<div class=\"preamble\">\n");
    output.push_str("<strong>Presentación:</strong><br/>\n");
    output.push_str(&escape_html(preamble));
    output.push_str("\n</div>\n");
}

/// Write one chunk, paragraph by paragraph when available
fn write_article(output: &mut String, chunk: &LawChunk) {
    output.push_str("<article>\n");

    let heading = match chunk.title.as_deref() {
        Some(title) if !title.is_empty() => format!("{} {}", chunk.id, title),
        _ => chunk.id.clone(),
    };
    output.push_str(&format!("<h3>{}</h3>\n", escape_html(&heading)));

    match chunk.detailed_paragraphs() {
        Some(paragraphs) => {
            for paragraph in paragraphs {
                output.push_str("<p>");
                output.push_str(&escape_html(&paragraph.text));
                if let Some(date) = paragraph.reform_date.as_deref().filter(|d| !d.is_empty()) {
                    output.push_str(&format!(
                        " <span class=\"badge\">Ref: {}</span>",
                        escape_html(date)
                    ));
                }
                output.push_str("</p>\n");
            }
        }
        None => {
            output.push_str(&format!("<p>{}</p>\n", escape_html(chunk.content_text())));
        }
    }

    output.push_str("</article>\n");
}

/// Escape special HTML characters
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Page styles
const CSS_STYLES: &str = r#"
body {
    font-family: system-ui, -apple-system, sans-serif;
    line-height: 1.6;
    color: #1a202c;
    max-width: 800px;
    margin: 0 auto;
    padding: 40px;
}

header {
    text-align: center;
    margin-bottom: 40px;
    border-bottom: 1px solid #e2e8f0;
    padding-bottom: 20px;
}

h1 {
    margin-bottom: 10px;
    color: #0f172a;
}

.meta {
    color: #64748b;
    font-size: 0.9em;
    font-family: monospace;
}

.preamble {
    background: #f8fafc;
    padding: 20px;
    border-radius: 8px;
    font-style: italic;
    margin-bottom: 40px;
    border-left: 4px solid #3b82f6;
}

article {
    margin-bottom: 30px;
}

h3 {
    color: #1e293b;
    border-bottom: 2px solid #e2e8f0;
    padding-bottom: 5px;
    margin-top: 30px;
}

p {
    margin-bottom: 15px;
    text-align: justify;
}

.badge {
    background: #fee2e2;
    color: #991b1b;
    padding: 2px 6px;
    border-radius: 4px;
    font-size: 0.75em;
    vertical-align: middle;
}
"#;
