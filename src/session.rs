//! Session state: the code buffer, selected language, last results, and the
//! credential-backed client. Each operation kind carries a monotonically
//! increasing request epoch; a completion is applied only when its epoch is
//! still the latest for that kind, so a stale response can never overwrite
//! fresher state.

use crate::ai::{AiError, AnalysisReport, GeminiClient};
use crate::config::{self, Config};
use crate::language::Language;

pub struct Session {
    config: Config,
    client: Option<GeminiClient>,
    code: String,
    language: Language,
    last_analysis: Option<AnalysisReport>,
    last_generation: Option<String>,
    analysis_epoch: u64,
    generation_epoch: u64,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let client = GeminiClient::new(&config).ok();
        let language = config
            .display
            .default_language
            .unwrap_or(Language::Python);

        Self {
            config,
            client,
            code: String::new(),
            language,
            last_analysis: None,
            last_generation: None,
            analysis_epoch: 0,
            generation_epoch: 0,
        }
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn has_credential(&self) -> bool {
        self.client.is_some()
    }

    pub fn last_analysis(&self) -> Option<&AnalysisReport> {
        self.last_analysis.as_ref()
    }

    pub fn last_generation(&self) -> Option<&str> {
        self.last_generation.as_deref()
    }

    /// Store a new API key in memory and rebuild the client. Call
    /// [`Session::persist`] to write it to the config file.
    pub fn set_credential(&mut self, api_key: String) {
        self.config.ai.api_key = Some(api_key);
        self.client = GeminiClient::new(&self.config).ok();
    }

    /// Write the current config, credential included, to the config file.
    pub fn persist(&self) -> anyhow::Result<()> {
        let path = config::get_config_path()?;
        self.config.save(&path)
    }

    pub fn begin_analysis(&mut self) -> u64 {
        self.analysis_epoch += 1;
        self.analysis_epoch
    }

    /// Apply an analysis completion. Returns false (and drops the report)
    /// when a newer analysis has been issued since `epoch`.
    pub fn apply_analysis(&mut self, epoch: u64, report: AnalysisReport) -> bool {
        if epoch != self.analysis_epoch {
            tracing::debug!(epoch, latest = self.analysis_epoch, "discarding stale analysis");
            return false;
        }
        self.last_analysis = Some(report);
        true
    }

    pub fn begin_generation(&mut self) -> u64 {
        self.generation_epoch += 1;
        self.generation_epoch
    }

    pub fn apply_generation(&mut self, epoch: u64, code: String) -> bool {
        if epoch != self.generation_epoch {
            tracing::debug!(epoch, latest = self.generation_epoch, "discarding stale generation");
            return false;
        }
        self.last_generation = Some(code);
        true
    }

    /// Analyze the current code buffer. On success the report is also stored
    /// as the session's last analysis (epoch permitting).
    pub async fn analyze(&mut self) -> Result<AnalysisReport, AiError> {
        let epoch = self.begin_analysis();

        let outcome = match self.client.as_ref() {
            Some(client) => client.analyze(&self.code, self.language).await,
            None => Err(AiError::MissingCredential),
        };

        let report = outcome?;
        self.apply_analysis(epoch, report.clone());
        Ok(report)
    }

    /// Generate code from a description in the session's language.
    pub async fn generate(&mut self, description: &str) -> Result<String, AiError> {
        let epoch = self.begin_generation();

        let outcome = match self.client.as_ref() {
            Some(client) => client.generate(description, self.language).await,
            None => Err(AiError::MissingCredential),
        };

        let code = outcome?;
        self.apply_generation(epoch, code.clone());
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Issue, Severity};

    fn report(summary: &str) -> AnalysisReport {
        AnalysisReport {
            issues: vec![Issue {
                line: 1,
                column: None,
                severity: Severity::Warning,
                message: "unused variable".to_string(),
                suggestion: String::new(),
                impact: String::new(),
            }],
            summary: summary.to_string(),
            general_suggestions: vec![],
        }
    }

    #[test]
    fn stale_analysis_is_discarded() {
        let mut session = Session::new(Config::default());

        let stale = session.begin_analysis();
        let fresh = session.begin_analysis();

        assert!(!session.apply_analysis(stale, report("stale")));
        assert!(session.last_analysis().is_none());

        assert!(session.apply_analysis(fresh, report("fresh")));
        assert_eq!(session.last_analysis().unwrap().summary, "fresh");
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut session = Session::new(Config::default());

        let stale = session.begin_generation();
        let fresh = session.begin_generation();

        assert!(!session.apply_generation(stale, "old".to_string()));
        assert!(session.apply_generation(fresh, "new".to_string()));
        assert_eq!(session.last_generation(), Some("new"));
    }

    #[test]
    fn epochs_are_independent_per_operation_kind() {
        let mut session = Session::new(Config::default());

        let analysis = session.begin_analysis();
        let _ = session.begin_generation();
        let _ = session.begin_generation();

        // Generation churn never invalidates an analysis epoch.
        assert!(session.apply_analysis(analysis, report("ok")));
    }

    #[tokio::test]
    async fn analyze_without_credential_fails_fast() {
        let mut session = Session::new(Config::default());
        session.set_code("print('hi')");

        let err = session.analyze().await.unwrap_err();
        assert!(matches!(err, AiError::MissingCredential));
    }

    #[test]
    fn setting_a_credential_builds_a_client() {
        let mut session = Session::new(Config::default());
        assert!(!session.has_credential());

        session.set_credential("key".to_string());
        assert!(session.has_credential());
    }
}
