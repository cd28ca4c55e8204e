use serde_json::Error as JsonError;
use std::fmt;

#[derive(Debug)]
pub enum AiError {
    /// Empty code or description, rejected before any network call.
    Validation(String),
    /// No API key configured.
    MissingCredential,
    NetworkError(String),
    /// HTTP 401.
    Authentication(String),
    /// HTTP 429.
    RateLimit(String),
    /// HTTP 503.
    Overloaded(String),
    /// Any other non-success status.
    ApiError(String),
    /// Missing envelope, no JSON in the reply, or JSON that does not parse.
    ParseError(String),
}

impl AiError {
    /// Only the overloaded and rate-limited classes are worth retrying;
    /// everything else is terminal for the call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AiError::Overloaded(_) | AiError::RateLimit(_))
    }
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "{}", msg),
            Self::MissingCredential => write!(
                f,
                "No API key configured. Run `codesage key <your-api-key>` first."
            ),
            Self::NetworkError(msg) => write!(f, "Network error: {}", msg),
            Self::Authentication(msg) => write!(f, "{}", msg),
            Self::RateLimit(msg) => write!(f, "{}", msg),
            Self::Overloaded(msg) => write!(f, "{}", msg),
            Self::ApiError(msg) => write!(f, "{}", msg),
            Self::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for AiError {}

impl From<JsonError> for AiError {
    fn from(error: JsonError) -> Self {
        AiError::ParseError(format!("malformed JSON in model response: {}", error))
    }
}
