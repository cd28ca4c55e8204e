//! Wire types for the generateContent endpoint and the analysis JSON the
//! model is asked to produce.

use serde::{Deserialize, Serialize};

use super::response::Severity;

#[derive(Debug, Serialize)]
pub struct GatewayRequest {
    pub contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationParams,
}

impl GatewayRequest {
    pub fn new(prompt: &str, params: GenerationParams) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: params,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
pub struct RequestPart {
    pub text: String,
}

/// Sampling configuration, distinct per call-site: analysis runs cold for
/// determinism, generation runs warmer for variety.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_k: i32,
    pub top_p: f32,
    pub max_output_tokens: i32,
}

impl GenerationParams {
    pub fn analysis() -> Self {
        Self {
            temperature: 0.1,
            top_k: 1,
            top_p: 1.0,
            max_output_tokens: 2048,
        }
    }

    pub fn generation() -> Self {
        Self {
            temperature: 0.3,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 4096,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GatewayResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: CandidateContent,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: String,
}

/// Structured error body some non-success responses carry.
#[derive(Debug, Deserialize)]
pub struct GatewayErrorBody {
    pub error: GatewayErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct GatewayErrorDetail {
    pub message: String,
}

/// The analysis object as the model writes it. Key spelling follows the
/// prompt contract (`hasErrors`, `errors`, `type`), not our domain names.
/// Everything except `line` is tolerated when absent.
#[derive(Debug, Deserialize)]
pub struct AnalysisSchema {
    #[serde(rename = "hasErrors", default)]
    pub has_errors: bool,
    #[serde(default)]
    pub errors: Vec<IssueSchema>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct IssueSchema {
    pub line: u32,
    #[serde(default)]
    pub column: Option<u32>,
    #[serde(rename = "type", default)]
    pub severity: Severity,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub suggestion: String,
    #[serde(default)]
    pub impact: String,
}
