use lexdigit::repair::{repair, RepairError};
use serde_json::Value;

/// A response shaped like a structure analysis, ASCII only, with no
/// brackets or escaped quotes inside its string values
const STRUCTURE: &str = r#"{"lawTitle":"Ley General de Salud","lastReformDate":"2024-01-01","presentationText":"Primera linea\nSegunda linea","structure":[{"type":"TITULO","id":"Titulo Primero","children":[{"type":"CAPITULO","id":"Capitulo I","pageRange":"1-4"}]},{"type":"TITULO","id":"Titulo Segundo","children":[]}]}"#;

/// A response shaped like a node conversion
const CHUNKS: &str = r#"{"chunks":[{"id":"Art. 1","title":"Objeto","content":"Texto del articulo","paragraphs":[{"text":"Parrafo uno","reformDate":"DOF 2020"},{"text":"Parrafo dos"}]},{"id":"Art. 2","content":"Otro texto","tags":["salud","federal"]}]}"#;

/// Byte offsets that fall strictly inside a string literal that is an
/// object value or an array element
fn offsets_inside_value_strings(doc: &str) -> Vec<usize> {
    let bytes = doc.as_bytes();
    let mut offsets = Vec::new();
    let mut in_string = false;
    let mut is_value = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
                continue;
            }
            if is_value {
                offsets.push(i);
            }
        } else if b == b'"' {
            in_string = true;
            let previous = doc[..i].trim_end().chars().last();
            is_value = matches!(previous, Some(':') | Some('[') | Some(','))
                && !(previous == Some(',') && inside_object_at(doc, i));
            if is_value {
                offsets.push(i + 1);
            }
        }
    }

    offsets.sort_unstable();
    offsets.dedup();
    offsets
}

/// Whether the innermost open container before `end` is an object
fn inside_object_at(doc: &str, end: usize) -> bool {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for c in doc[..end].chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => stack.push(c),
            '}' | ']' => {
                stack.pop();
            }
            _ => {}
        }
    }
    stack.last() == Some(&'{')
}

#[test]
fn test_identity_on_well_formed_input() {
    let inputs = [
        STRUCTURE,
        CHUNKS,
        "[]",
        "{}",
        "42",
        "\"plain string\"",
        r#"{"text":"brackets ] } inside [ { strings","quote":"say \"hola\""}"#,
        r#"[null, true, false, -1.5e3, {"nested": [[[]]]}]"#,
    ];

    for input in inputs {
        let expected: Value = serde_json::from_str(input).unwrap();
        assert_eq!(repair(input).unwrap(), expected, "input: {}", input);
    }
}

#[test]
fn test_truncation_inside_value_strings_is_recovered() {
    for doc in [STRUCTURE, CHUNKS] {
        let original: Value = serde_json::from_str(doc).unwrap();
        let offsets = offsets_inside_value_strings(doc);
        assert!(!offsets.is_empty());

        for offset in offsets {
            let truncated = &doc[..offset];
            let value = repair(truncated)
                .unwrap_or_else(|e| panic!("offset {} ({:?}) failed: {}", offset, truncated, e));
            assert_eq!(
                value.is_object(),
                original.is_object(),
                "offset {} changed the top-level shape",
                offset
            );
        }
    }
}

#[test]
fn test_truncation_after_punctuation_closes_in_lifo_order() {
    for doc in [STRUCTURE, CHUNKS] {
        for (offset, c) in doc.char_indices() {
            if !matches!(c, '{' | '[' | '}' | ']') {
                continue;
            }
            let truncated = &doc[..=offset];
            let value = repair(truncated)
                .unwrap_or_else(|e| panic!("offset {} ({:?}) failed: {}", offset, truncated, e));
            assert!(value.is_object(), "offset {} lost the top-level object", offset);
        }
    }
}

#[test]
fn test_truncation_keeps_completed_members() {
    let cut = CHUNKS.find("Otro").unwrap() + 2;
    let value = repair(&CHUNKS[..cut]).unwrap();

    let chunks = value["chunks"].as_array().unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0]["paragraphs"][1]["text"], "Parrafo dos");
    assert_eq!(chunks[1]["id"], "Art. 2");
    assert_eq!(chunks[1]["content"], "Ot");
}

#[test]
fn test_mismatched_brackets_fail_cleanly() {
    for input in [r#"{"a": [1, 2}"#, r#"[{"a": 1]"#, r#"{"a": {"b": [}}"#, "]["] {
        match repair(input) {
            Ok(_) => {}
            Err(RepairError::Malformed { raw, .. }) => assert_eq!(raw, input),
        }
    }
}

#[test]
fn test_non_json_text_fails_with_raw_text() {
    let raw = "Lo siento, no puedo procesar este documento.";
    let err = repair(raw).unwrap_err();
    assert_eq!(err.raw(), raw);
}
