//! Public-policy roadmap for a digitization program

use crate::llm::{LlmBackend, LlmRequest, RequestKind};
use crate::pipeline::PipelineError;
use crate::prompts::roadmap_prompt;
use crate::response::{decode, ResponseError};
use serde::{Deserialize, Serialize};

/// One phase of a roadmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyStep {
    pub phase: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub action_items: Vec<String>,
}

/// Parse a roadmap response
///
/// The model is asked for a bare array; an object wrapping the array under
/// `steps` is accepted too.
pub fn parse_roadmap(raw: &str) -> Result<Vec<PolicyStep>, ResponseError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Roadmap {
        Steps(Vec<PolicyStep>),
        Wrapped { steps: Vec<PolicyStep> },
    }

    Ok(match decode::<Roadmap>(raw, "policy roadmap")? {
        Roadmap::Steps(steps) | Roadmap::Wrapped { steps } => steps,
    })
}

/// Ask the model for a roadmap
///
/// # Parameters
/// * `backend` - Model capability
/// * `context` - Free-text description of the current situation
/// * `country` - Country the roadmap targets
pub fn generate_roadmap(
    backend: &dyn LlmBackend,
    context: &str,
    country: &str,
) -> Result<Vec<PolicyStep>, PipelineError> {
    let request = LlmRequest {
        kind: RequestKind::PolicyRoadmap,
        prompt: roadmap_prompt(context, country),
        document: None,
    };

    let raw = backend.generate(&request)?;
    let steps = parse_roadmap(&raw)?;
    log::info!("Roadmap for {} has {} phases", country, steps.len());
    Ok(steps)
}
