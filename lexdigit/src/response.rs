//! Validation of repaired model responses against the document model

use crate::law_model::{LawChunk, StructureAnalysis};
use crate::repair::{repair, RepairError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors turning a raw response into model types
#[derive(Error, Debug)]
pub enum ResponseError {
    /// The text could not be repaired into JSON
    #[error(transparent)]
    Malformed(#[from] RepairError),

    /// The JSON does not match the expected shape
    #[error("schema validation failed for {what}: {message}")]
    Schema {
        /// What was being decoded (e.g. "structure analysis")
        what: &'static str,
        message: String,
    },
}

/// Shape of a node conversion response
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChunkBatch {
    chunks: Vec<LawChunk>,
}

/// Repair a raw response and decode it into `T`
///
/// # Parameters
/// * `raw` - The raw model response
/// * `what` - Short description used in schema error messages
///
/// # Returns
/// * `Ok(T)` - Decoded value
/// * `Err(ResponseError)` - Repair failed or the JSON has the wrong shape
pub fn decode<T: DeserializeOwned>(raw: &str, what: &'static str) -> Result<T, ResponseError> {
    let value = repair(raw)?;
    decode_value(value, what)
}

/// Decode an already repaired JSON value into `T`
pub fn decode_value<T: DeserializeOwned>(
    value: Value,
    what: &'static str,
) -> Result<T, ResponseError> {
    serde_json::from_value(value).map_err(|e| ResponseError::Schema {
        what,
        message: e.to_string(),
    })
}

/// Parse a structure analysis response
pub fn parse_structure(raw: &str) -> Result<StructureAnalysis, ResponseError> {
    decode(raw, "structure analysis")
}

/// Parse a node conversion response into its chunks
///
/// A response without a `chunks` field yields no chunks. Every chunk must
/// carry a non-blank `id`.
pub fn parse_chunks(raw: &str) -> Result<Vec<LawChunk>, ResponseError> {
    let batch: ChunkBatch = decode(raw, "chunk batch")?;

    if let Some(position) = batch.chunks.iter().position(|c| c.id.trim().is_empty()) {
        return Err(ResponseError::Schema {
            what: "chunk batch",
            message: format!("chunk at index {} has a blank id", position),
        });
    }

    Ok(batch.chunks)
}
