//! Akoma Ntoso flavoured XML exporter
//!
//! Only the element names are borrowed from Akoma Ntoso; the output is not
//! validated against its schema.

use crate::export::ExportHeader;
use crate::law_model::LawChunk;
use itertools::Itertools;

/// Replacement for characters outside `[A-Za-z0-9]` in element ids
pub const ID_PLACEHOLDER: char = '_';

/// Render an XML document
pub fn render(header: &ExportHeader<'_>, chunks: &[&LawChunk]) -> String {
    let key = escape_xml(header.key);
    let mut output = String::new();

    output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    output.push_str("<akomaNtoso>\n");
    output.push_str("  <act>\n");
    output.push_str("    <meta>\n");
    output.push_str("      <identification>\n");
    output.push_str("        <FRBRWork>\n");
    output.push_str(&format!("          <FRBRthis value=\"/{}/main\"/>\n", key));
    output.push_str(&format!("          <FRBRuri value=\"/{}\"/>\n", key));
    output.push_str(&format!(
        "          <FRBRdate date=\"{}\" name=\"reform\"/>\n",
        escape_xml(header.date)
    ));
    output.push_str(&format!(
        "          <FRBRtitle value=\"{}\"/>\n",
        escape_xml(header.title)
    ));
    output.push_str("        </FRBRWork>\n");
    output.push_str("      </identification>\n");
    output.push_str(&format!(
        "      <preamble>{}</preamble>\n",
        escape_xml(header.preamble)
    ));
    output.push_str("    </meta>\n");
    output.push_str("    <body>\n");

    for chunk in chunks {
        write_article(&mut output, chunk, "      ");
    }

    output.push_str("    </body>\n");
    output.push_str("  </act>\n");
    output.push_str("</akomaNtoso>\n");
    output
}

/// Write one `<article>` element at the given indentation
pub(crate) fn write_article(output: &mut String, chunk: &LawChunk, indent: &str) {
    output.push_str(&format!("{}<article id=\"{}\">\n", indent, xml_id(&chunk.id)));
    output.push_str(&format!("{}  <num>{}</num>\n", indent, escape_xml(&chunk.id)));

    if let Some(title) = chunk.title.as_deref().filter(|t| !t.is_empty()) {
        output.push_str(&format!(
            "{}  <heading>{}</heading>\n",
            indent,
            escape_xml(title)
        ));
    }

    output.push_str(&format!("{}  <content>\n", indent));
    let paragraphs = match chunk.detailed_paragraphs() {
        Some(paragraphs) => paragraphs.iter().map(|p| p.text.as_str()).collect_vec(),
        None => vec![chunk.content_text()],
    };
    for text in paragraphs {
        output.push_str(&format!("{}    <p>{}</p>\n", indent, escape_xml(text)));
    }
    output.push_str(&format!("{}  </content>\n", indent));
    output.push_str(&format!("{}</article>\n", indent));
}

/// Turn a chunk id into an element id
///
/// Every character outside `[A-Za-z0-9]` becomes [`ID_PLACEHOLDER`].
/// Distinct ids may collide after rewriting. An empty id yields a single
/// placeholder so the attribute is never empty.
pub fn xml_id(id: &str) -> String {
    if id.is_empty() {
        return ID_PLACEHOLDER.to_string();
    }

    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ID_PLACEHOLDER })
        .collect()
}

/// Escape text for XML content and attribute values
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::law_model::Paragraph;

    fn header() -> ExportHeader<'static> {
        ExportHeader {
            title: "Ley \"Especial\"",
            key: "K&1",
            date: "2020-01-01",
            preamble: "Intro",
        }
    }

    #[test]
    fn test_xml_id() {
        assert_eq!(xml_id("Art. 1"), "Art__1");
        assert_eq!(xml_id("Artículo 2º"), "Art_culo_2_");
        assert_eq!(xml_id("I."), "I_");
        assert_eq!(xml_id(""), "_");
    }

    #[test]
    fn test_xml_id_collisions_are_allowed() {
        assert_eq!(xml_id("Art. 1"), xml_id("Art-_1"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_xml("'x'"), "&apos;x&apos;");
    }

    #[test]
    fn test_frbr_identification() {
        let output = render(&header(), &[]);
        assert!(output.contains("<FRBRthis value=\"/K&amp;1/main\"/>"));
        assert!(output.contains("<FRBRuri value=\"/K&amp;1\"/>"));
        assert!(output.contains("<FRBRdate date=\"2020-01-01\" name=\"reform\"/>"));
        assert!(output.contains("<FRBRtitle value=\"Ley &quot;Especial&quot;\"/>"));
        assert!(output.contains("<body>\n    </body>"));
    }

    #[test]
    fn test_article_without_title_omits_heading() {
        let chunk = LawChunk::new("Art. 1", "Texto <vigente>");
        let mut output = String::new();
        write_article(&mut output, &chunk, "");
        assert_eq!(
            output,
            "<article id=\"Art__1\">\n  <num>Art. 1</num>\n  <content>\n    <p>Texto &lt;vigente&gt;</p>\n  </content>\n</article>\n"
        );
    }

    #[test]
    fn test_article_paragraphs_become_separate_p() {
        let mut chunk = LawChunk::new("Art. 2", "ignored");
        chunk.title = Some("Alcance".to_string());
        chunk.paragraphs = Some(vec![
            Paragraph {
                text: "Uno".to_string(),
                reform_date: None,
            },
            Paragraph {
                text: "Dos".to_string(),
                reform_date: Some("DOF 2019".to_string()),
            },
        ]);
        let output = render(&header(), &[&chunk]);
        assert!(output.contains("<heading>Alcance</heading>"));
        assert!(output.contains("<p>Uno</p>\n          <p>Dos</p>"));
        assert!(!output.contains("ignored"));
    }
}
