//! JSON repair for model responses
//!
//! Language-model output is usually JSON, but it frequently arrives wrapped
//! in a code fence or cut off at the token limit. This module strips the
//! fence and, when a direct parse fails, applies a fixed sequence of cheap
//! textual repairs aimed at the common truncation shapes:
//! - an unterminated escape sequence at the very end
//! - an unterminated string literal
//! - unclosed objects and arrays
//!
//! The repair is a heuristic. It does not track whether a bracket sits
//! inside a string, and it never corrects a closer of the wrong type.

use serde_json::Value;
use thiserror::Error;

/// Leading fence markers, tried in order
const LEADING_FENCES: [&str; 2] = ["```json", "```"];

/// Trailing fence marker
const TRAILING_FENCE: &str = "```";

/// Errors produced by the repair engine
#[derive(Error, Debug)]
pub enum RepairError {
    /// The text is not JSON even after surgical repair
    #[error("malformed response ({len} bytes): {source}", len = .raw.len())]
    Malformed {
        /// The text exactly as received, kept for diagnostics
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RepairError {
    /// The raw response that could not be repaired
    pub fn raw(&self) -> &str {
        match self {
            Self::Malformed { raw, .. } => raw,
        }
    }
}

/// Parse a raw model response, repairing it if needed
///
/// # Parameters
/// * `raw` - The response text, optionally fenced and possibly truncated
///
/// # Returns
/// * `Ok(Value)` - The parsed JSON value
/// * `Err(RepairError)` - Repair heuristics exhausted
pub fn repair(raw: &str) -> Result<Value, RepairError> {
    let clean = strip_fences(raw);

    if let Ok(value) = serde_json::from_str(clean) {
        return Ok(value);
    }

    log::warn!("Response is incomplete or malformed, attempting surgical repair");
    let repaired = repair_text(clean);
    log::debug!(
        "Repaired response grew from {} to {} bytes",
        clean.len(),
        repaired.len()
    );

    serde_json::from_str(&repaired).map_err(|source| {
        log::error!("Repair failed for a {} byte response: {}", raw.len(), source);
        RepairError::Malformed {
            raw: raw.to_string(),
            source,
        }
    })
}

/// Remove a leading and a trailing code fence, then trim
///
/// Only the exact literal markers are recognised, after any leading
/// whitespace.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim_start();

    for fence in LEADING_FENCES {
        if let Some(rest) = text.strip_prefix(fence) {
            text = rest.trim_start();
            break;
        }
    }

    if let Some(rest) = text.trim_end().strip_suffix(TRAILING_FENCE) {
        text = rest.trim_end();
    }

    text.trim()
}

/// Apply the surgical repairs to already de-fenced text
///
/// The steps run in a fixed order:
/// 1. drop a dangling trailing backslash
/// 2. close an odd number of double quotes
/// 3. close every still-open `{` and `[`, innermost first
///
/// A closer only pops the stack when it matches the innermost opener.
/// Mismatched closers stay where they are.
pub fn repair_text(text: &str) -> String {
    let mut repaired = text.strip_suffix('\\').unwrap_or(text).to_string();

    let quote_count = repaired.chars().filter(|&c| c == '"').count();
    if quote_count % 2 != 0 {
        repaired.push('"');
    }

    let mut closers: Vec<char> = Vec::new();
    for c in repaired.chars() {
        match c {
            '{' => closers.push('}'),
            '[' => closers.push(']'),
            '}' | ']' => {
                if closers.last() == Some(&c) {
                    closers.pop();
                }
            }
            _ => {}
        }
    }

    while let Some(closer) = closers.pop() {
        repaired.push(closer);
    }

    repaired
}
