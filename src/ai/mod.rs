use rand::Rng;
use reqwest::StatusCode;
use std::time::Duration;

mod error;
mod prompt;
mod response;
mod schema;

pub use error::AiError;
pub use prompt::{build_analysis_prompt, build_generation_prompt};
pub use response::{
    extract_json, parse_analysis, strip_code_fence, AnalysisReport, Issue, Severity,
};
pub use schema::GenerationParams;

use crate::config::Config;
use crate::language::Language;
use schema::{GatewayErrorBody, GatewayRequest, GatewayResponse};

pub const DEFAULT_GATEWAY_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent";

pub const OVERLOADED_MESSAGE: &str =
    "The AI service is currently overloaded. Please try again in a few moments.";
pub const INVALID_KEY_MESSAGE: &str = "Invalid API key. Please check your API key.";
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please wait before trying again.";

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_RETRY_DELAY_MS: u64 = 400;
const MAX_RETRY_DELAY_MS: u64 = 4000;

#[derive(Debug)]
struct RetryPolicy {
    max_attempts: u32,
    initial_delay_ms: u64,
    max_delay_ms: u64,
}

impl RetryPolicy {
    fn new() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            initial_delay_ms: INITIAL_RETRY_DELAY_MS,
            max_delay_ms: MAX_RETRY_DELAY_MS,
        }
    }

    /// Full-jitter exponential backoff: uniform in [0, min(initial * 2^n, cap)].
    fn delay(&self, attempt: u32) -> Duration {
        let cap = self
            .initial_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt))
            .min(self.max_delay_ms);
        Duration::from_millis(rand::thread_rng().gen_range(0..=cap))
    }
}

/// Retries only the classes `AiError::is_retryable` admits (overloaded and
/// rate-limited). Invalid credentials, parse failures, and plain network
/// errors surface immediately.
async fn with_retries<T, F, Fut>(policy: &RetryPolicy, f: F) -> Result<T, AiError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, AiError>>,
{
    let mut attempt = 0;
    let mut last_error = None;

    while attempt < policy.max_attempts {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() => {
                // No point sleeping after the last attempt; the error is
                // about to surface as-is.
                if attempt + 1 < policy.max_attempts {
                    let delay = policy.delay(attempt);
                    tracing::warn!("request failed: {}. Retrying in {:?}", e, delay);
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error
        .unwrap_or_else(|| AiError::NetworkError("max retries exceeded".to_string())))
}

fn classify_status(status: StatusCode, body: &str) -> AiError {
    match status {
        StatusCode::SERVICE_UNAVAILABLE => AiError::Overloaded(OVERLOADED_MESSAGE.to_string()),
        StatusCode::UNAUTHORIZED => AiError::Authentication(INVALID_KEY_MESSAGE.to_string()),
        StatusCode::TOO_MANY_REQUESTS => AiError::RateLimit(RATE_LIMIT_MESSAGE.to_string()),
        status => match serde_json::from_str::<GatewayErrorBody>(body) {
            Ok(parsed) => AiError::ApiError(parsed.error.message),
            Err(_) => AiError::ApiError(format!("API error ({})", status.as_u16())),
        },
    }
}

/// Client for a generateContent-style endpoint. The credential travels as a
/// query parameter; the prompt and sampling config as a JSON body. One full
/// round trip per call, no streaming, no client-side timeout.
#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, AiError> {
        let api_key = config.ai.api_key.clone().ok_or(AiError::MissingCredential)?;
        let base_url = config
            .ai
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string());

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        })
    }

    /// Ask the model to review `code` and return a structured report.
    pub async fn analyze(&self, code: &str, language: Language) -> Result<AnalysisReport, AiError> {
        if code.trim().is_empty() {
            return Err(AiError::Validation(
                "Please enter some code to analyze.".to_string(),
            ));
        }

        let prompt = build_analysis_prompt(code, language);
        let policy = RetryPolicy::new();
        let raw = with_retries(&policy, || {
            self.send_prompt(&prompt, GenerationParams::analysis())
        })
        .await?;

        parse_analysis(&raw)
    }

    /// Ask the model to write code from a natural-language description.
    pub async fn generate(
        &self,
        description: &str,
        language: Language,
    ) -> Result<String, AiError> {
        if description.trim().is_empty() {
            return Err(AiError::Validation(
                "Please describe the code you want generated.".to_string(),
            ));
        }

        let prompt = build_generation_prompt(description, language);
        let policy = RetryPolicy::new();
        let raw = with_retries(&policy, || {
            self.send_prompt(&prompt, GenerationParams::generation())
        })
        .await?;

        Ok(strip_code_fence(&raw).to_string())
    }

    async fn send_prompt(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, AiError> {
        let url = format!("{}?key={}", self.base_url, self.api_key);

        let response = self
            .http
            .post(&url)
            .json(&GatewayRequest::new(prompt, params))
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let envelope: GatewayResponse = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(format!("malformed response from gateway: {}", e)))?;

        envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| {
                AiError::ParseError("malformed response from gateway: no candidate text".to_string())
            })
    }
}
