//! Recovery of structured data from free-form model text, and the domain
//! types the rest of the program displays.
//!
//! The model is instructed to reply with bare JSON (analysis) or bare code
//! (generation), but replies routinely arrive wrapped in prose or markdown
//! fences. The tolerance here is the contract, not a workaround: locate the
//! first balanced JSON object, strip enclosing fences, and never assume the
//! model stayed inside its declared enums.

use serde::{Deserialize, Serialize};

use super::error::AiError;
use super::schema::{AnalysisSchema, IssueSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    /// Catch-all: the model sometimes invents severities outside the
    /// requested set, and those are treated as informational.
    #[serde(other)]
    Info,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Info
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// 1-based, as the prompt instructs.
    pub line: u32,
    pub column: Option<u32>,
    pub severity: Severity,
    pub message: String,
    pub suggestion: String,
    pub impact: String,
}

impl Issue {
    fn from_schema(schema: IssueSchema) -> Self {
        Self {
            line: schema.line,
            column: schema.column,
            severity: schema.severity,
            message: schema.message,
            suggestion: schema.suggestion,
            impact: schema.impact,
        }
    }
}

/// One completed analysis, issues in the order the model returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub issues: Vec<Issue>,
    pub summary: String,
    pub general_suggestions: Vec<String>,
}

impl AnalysisReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn from_schema(schema: AnalysisSchema) -> Self {
        // The flag and the list are supplied independently by the model.
        // The list is authoritative; a disagreement is logged, never fatal.
        if schema.has_errors != !schema.errors.is_empty() {
            tracing::warn!(
                has_errors = schema.has_errors,
                issue_count = schema.errors.len(),
                "model response disagrees with its own issue list"
            );
        }

        Self {
            issues: schema.errors.into_iter().map(Issue::from_schema).collect(),
            summary: schema.summary,
            general_suggestions: schema.suggestions,
        }
    }
}

/// Find the first top-level balanced `{...}` substring, tracking string
/// literals and escapes so braces inside JSON strings do not miscount.
pub fn extract_json(text: &str) -> Result<&str, AiError> {
    let start = text
        .find('{')
        .ok_or_else(|| AiError::ParseError("no JSON found in model response".to_string()))?;

    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..=start + i]);
                }
            }
            _ => {}
        }
    }

    Err(AiError::ParseError(
        "no JSON found in model response".to_string(),
    ))
}

/// Parse a raw analysis reply: locate the JSON object, deserialize it, and
/// lift it into the domain type.
pub fn parse_analysis(raw: &str) -> Result<AnalysisReport, AiError> {
    let json = extract_json(raw)?;
    let schema: AnalysisSchema = serde_json::from_str(json)?;
    Ok(AnalysisReport::from_schema(schema))
}

/// Drop a leading ``` fence (with or without a language tag) and a trailing
/// closing fence, then trim. Interior fences are left alone.
pub fn strip_code_fence(text: &str) -> &str {
    let mut s = text.trim();

    if let Some(rest) = s.strip_prefix("```") {
        let rest =
            rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '+' || c == '#');
        s = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);
    }

    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }

    s.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WELL_FORMED: &str = r#"{
        "hasErrors": true,
        "errors": [{
            "line": 1,
            "type": "error",
            "message": "Syntax error: unexpected ':'",
            "suggestion": "Close the parenthesis",
            "impact": "Code will not run"
        }],
        "summary": "One syntax error.",
        "suggestions": []
    }"#;

    #[test]
    fn recovers_json_embedded_in_prose() {
        let raw = format!("Sure! Here is the analysis you asked for:\n{}\nHope that helps.", WELL_FORMED);
        let report = parse_analysis(&raw).unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].line, 1);
        assert_eq!(report.issues[0].severity, Severity::Error);
        assert_eq!(report.issues[0].message, "Syntax error: unexpected ':'");
        assert!(report.has_issues());
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_the_scanner() {
        let raw = r#"note: {"hasErrors": false, "errors": [], "summary": "use {braces} and \"quotes\" carefully", "suggestions": []} trailing"#;
        let report = parse_analysis(raw).unwrap();
        assert_eq!(report.summary, "use {braces} and \"quotes\" carefully");
        assert!(!report.has_issues());
    }

    #[test]
    fn missing_optional_fields_are_tolerated() {
        let raw = r#"{"hasErrors": true, "errors": [{"line": 3}]}"#;
        let report = parse_analysis(raw).unwrap();
        assert_eq!(report.issues[0].line, 3);
        assert_eq!(report.issues[0].column, None);
        assert_eq!(report.issues[0].severity, Severity::Info);
        assert_eq!(report.issues[0].message, "");
        assert_eq!(report.summary, "");
    }

    #[test]
    fn unknown_severity_falls_back_to_info() {
        let raw = r#"{"hasErrors": true, "errors": [{"line": 2, "type": "catastrophic"}], "summary": "", "suggestions": []}"#;
        let report = parse_analysis(raw).unwrap();
        assert_eq!(report.issues[0].severity, Severity::Info);
    }

    #[test]
    fn flag_and_list_disagreement_is_not_fatal() {
        let raw = r#"{"hasErrors": true, "errors": [], "summary": "clean", "suggestions": []}"#;
        let report = parse_analysis(raw).unwrap();
        assert!(!report.has_issues());
    }

    #[test]
    fn no_braces_is_classified_as_no_json() {
        let err = parse_analysis("The code looks fine to me!").unwrap_err();
        assert!(matches!(err, AiError::ParseError(_)));
        assert!(err.to_string().contains("no JSON found"));
    }

    #[test]
    fn unbalanced_braces_are_classified_as_no_json() {
        let err = extract_json("opening only: { \"hasErrors\": true").unwrap_err();
        assert!(err.to_string().contains("no JSON found"));
    }

    #[test]
    fn invalid_json_is_classified_as_malformed() {
        let err = parse_analysis("{ not valid json }").unwrap_err();
        assert!(matches!(err, AiError::ParseError(_)));
        assert!(err.to_string().contains("malformed JSON"));
    }

    #[test]
    fn extraction_is_idempotent() {
        let raw = format!("prose {} more prose", WELL_FORMED);
        let first = extract_json(&raw).unwrap().to_string();
        let second = extract_json(&raw).unwrap().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn fence_with_language_tag_is_stripped() {
        let raw = "```python\ndef factorial(n):\n    return 1 if n<=1 else n*factorial(n-1)\n```";
        assert_eq!(
            strip_code_fence(raw),
            "def factorial(n):\n    return 1 if n<=1 else n*factorial(n-1)"
        );
    }

    #[test]
    fn fence_without_language_tag_is_stripped() {
        let raw = "```\nint main() { return 0; }\n```\n";
        assert_eq!(strip_code_fence(raw), "int main() { return 0; }");
    }

    #[test]
    fn unfenced_reply_is_only_trimmed() {
        let raw = "  print('hello')\n\n";
        assert_eq!(strip_code_fence(raw), "print('hello')");
    }

    #[test]
    fn fence_stripping_is_idempotent() {
        let raw = "```js\nconsole.log(1);\n```";
        let once = strip_code_fence(raw);
        assert_eq!(strip_code_fence(once), once);
    }
}
