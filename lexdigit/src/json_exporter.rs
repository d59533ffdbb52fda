//! JSON exporter

use crate::export::ExportHeader;
use crate::law_model::LawChunk;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonMetadata<'a> {
    title: &'a str,
    key: &'a str,
    reform_date: &'a str,
    preamble: &'a str,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    metadata: JsonMetadata<'a>,
    content: &'a [&'a LawChunk],
}

/// Render `{ metadata, content }`, pretty-printed
pub fn render(header: &ExportHeader<'_>, chunks: &[&LawChunk]) -> String {
    let export = JsonExport {
        metadata: JsonMetadata {
            title: header.title,
            key: header.key,
            reform_date: header.date,
            preamble: header.preamble,
        },
        content: chunks,
    };

    match serde_json::to_string_pretty(&export) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to serialize JSON export: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_json_shape() {
        let header = ExportHeader {
            title: "Ley X",
            key: "S/N",
            date: "2020",
            preamble: "Intro",
        };
        let mut chunk = LawChunk::new("Art. 1", "Texto");
        chunk.page = Some(3);

        let value: Value = serde_json::from_str(&render(&header, &[&chunk])).unwrap();
        assert_eq!(
            value,
            json!({
                "metadata": {"title": "Ley X", "key": "S/N", "reformDate": "2020", "preamble": "Intro"},
                "content": [{"id": "Art. 1", "page": 3, "content": "Texto"}]
            })
        );
    }

    #[test]
    fn test_json_is_pretty_printed() {
        let header = ExportHeader {
            title: "",
            key: "S/N",
            date: "",
            preamble: "",
        };
        let output = render(&header, &[]);
        assert!(output.starts_with("{\n  \"metadata\": {\n"));
        assert!(output.ends_with("\"content\": []\n}"));
    }
}
