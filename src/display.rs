use colored::*;

use crate::ai::{AnalysisReport, Severity};

/// Render an analysis report for the terminal: one badge line per issue,
/// then the summary and general suggestions.
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    if report.has_issues() {
        out.push_str(&format!(
            "{}\n\n",
            format!("{} issue(s) found", report.issues.len()).bold()
        ));

        for issue in &report.issues {
            let badge = match issue.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
                Severity::Info => "info".blue().bold(),
            };
            let location = match issue.column {
                Some(column) => format!("line {}:{}", issue.line, column),
                None => format!("line {}", issue.line),
            };

            out.push_str(&format!("[{}] {} - {}\n", badge, location, issue.message));
            if !issue.suggestion.is_empty() {
                out.push_str(&format!("  fix:    {}\n", issue.suggestion));
            }
            if !issue.impact.is_empty() {
                out.push_str(&format!("  impact: {}\n", issue.impact));
            }
            out.push('\n');
        }
    } else {
        out.push_str(&format!("{}\n\n", "No issues found.".green()));
    }

    if !report.summary.is_empty() {
        out.push_str(&format!("{} {}\n", "Summary:".bold(), report.summary));
    }

    if !report.general_suggestions.is_empty() {
        out.push_str(&format!("{}\n", "Suggestions:".bold()));
        for suggestion in &report.general_suggestions {
            out.push_str(&format!("  - {}\n", suggestion));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Issue;

    #[test]
    fn one_error_shows_one_badge_at_line_one() {
        let report = AnalysisReport {
            issues: vec![Issue {
                line: 1,
                column: None,
                severity: Severity::Error,
                message: "Syntax error: unexpected ':'".to_string(),
                suggestion: "Close the parenthesis".to_string(),
                impact: "Code will not run".to_string(),
            }],
            summary: "One syntax error.".to_string(),
            general_suggestions: vec![],
        };

        let rendered = render_report(&report);
        assert!(rendered.contains("1 issue(s) found"));
        assert!(rendered.contains("line 1"));
        assert!(rendered.contains("Syntax error: unexpected ':'"));
        assert!(rendered.contains("Close the parenthesis"));
        assert!(rendered.contains("One syntax error."));
    }

    #[test]
    fn clean_report_renders_positively() {
        let report = AnalysisReport {
            issues: vec![],
            summary: "Looks good.".to_string(),
            general_suggestions: vec!["Add tests".to_string()],
        };

        let rendered = render_report(&report);
        assert!(rendered.contains("No issues found."));
        assert!(rendered.contains("- Add tests"));
    }

    #[test]
    fn column_is_included_when_present() {
        let report = AnalysisReport {
            issues: vec![Issue {
                line: 4,
                column: Some(12),
                severity: Severity::Warning,
                message: "shadowed variable".to_string(),
                suggestion: String::new(),
                impact: String::new(),
            }],
            summary: String::new(),
            general_suggestions: vec![],
        };

        assert!(render_report(&report).contains("line 4:12"));
    }
}
