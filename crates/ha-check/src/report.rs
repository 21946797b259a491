//! Run-scoped result collector
//!
//! Every check appends findings to the [`Report`] it is handed; nothing is
//! kept in process-wide state. The report decides the exit status through
//! [`Report::has_failures`].

use serde::Serialize;
use std::fmt;

/// Outcome class of a single finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Check succeeded
    Pass,
    /// Advisory problem; never affects the exit status
    Warn,
    /// Structural contradiction; makes the run fail
    Fail,
    /// Informational count or note
    Info,
    /// Check not applicable (e.g. file absent)
    Skip,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Pass => "PASS",
            Severity::Warn => "WARN",
            Severity::Fail => "FAIL",
            Severity::Info => "INFO",
            Severity::Skip => "SKIP",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.label())
    }
}

/// One line of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

/// Aggregate counts per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub warnings: usize,
    pub failed: usize,
    pub info: usize,
    pub skipped: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SUMMARY: {} PASS, {} WARN, {} FAIL ({} INFO, {} SKIP)",
            self.passed, self.warnings, self.failed, self.info, self.skipped
        )
    }
}

/// Findings of one validation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    findings: Vec<Finding>,
    #[serde(skip)]
    section: Option<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new section; following findings are grouped under it
    pub fn section(&mut self, name: impl Into<String>) {
        self.section = Some(name.into());
    }

    /// Append a finding with detail lines
    pub fn record(
        &mut self,
        severity: Severity,
        message: impl Into<String>,
        details: Vec<String>,
    ) {
        self.findings.push(Finding {
            severity,
            section: self.section.clone(),
            message: message.into(),
            details,
        });
    }

    pub fn pass(&mut self, message: impl Into<String>) {
        self.record(Severity::Pass, message, Vec::new());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(Severity::Warn, message, Vec::new());
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.record(Severity::Fail, message, Vec::new());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.record(Severity::Info, message, Vec::new());
    }

    pub fn skip(&mut self, message: impl Into<String>) {
        self.record(Severity::Skip, message, Vec::new());
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Number of findings with the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            passed: self.count(Severity::Pass),
            warnings: self.count(Severity::Warn),
            failed: self.count(Severity::Fail),
            info: self.count(Severity::Info),
            skipped: self.count(Severity::Skip),
        }
    }

    /// Whether any fatal-class finding was recorded
    pub fn has_failures(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Fail)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        let mut section: Option<&str> = None;

        for finding in &self.findings {
            if finding.section.as_deref() != section {
                section = finding.section.as_deref();
                if let Some(name) = section {
                    writeln!(f)?;
                    writeln!(f, "## {name}")?;
                    writeln!(f)?;
                }
            }
            writeln!(f, "{} {}", finding.severity, finding.message)?;
            for detail in &finding.details {
                writeln!(f, "       - {detail}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "{}", self.summary())?;
        write!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_failures() {
        let mut report = Report::new();
        report.pass("ok");
        report.warn("careful");
        report.warn("careful again");
        report.info("note");
        assert!(!report.has_failures());

        report.fail("broken");
        let summary = report.summary();
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.warnings, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.info, 1);
        assert_eq!(summary.skipped, 0);
        assert!(report.has_failures());
    }

    #[test]
    fn test_sections_attach_to_findings() {
        let mut report = Report::new();
        report.info("before");
        report.section("automations.yaml");
        report.pass("after");

        assert_eq!(report.findings()[0].section, None);
        assert_eq!(
            report.findings()[1].section.as_deref(),
            Some("automations.yaml")
        );
    }

    #[test]
    fn test_render() {
        let mut report = Report::new();
        report.section("entities");
        report.record(
            Severity::Warn,
            "possibly missing entity",
            vec!["sensor.nonexistent_thing".to_string()],
        );
        report.skip("scenes.yaml not found");

        let text = report.to_string();
        assert!(text.contains("## entities"));
        assert!(text.contains("[WARN] possibly missing entity"));
        assert!(text.contains("       - sensor.nonexistent_thing"));
        assert!(text.contains("[SKIP] scenes.yaml not found"));
        assert!(text.contains("SUMMARY: 0 PASS, 1 WARN, 0 FAIL (0 INFO, 1 SKIP)"));
    }

    #[test]
    fn test_serialize_severity() {
        let json = serde_json::to_string(&Severity::Warn).unwrap();
        assert_eq!(json, "\"WARN\"");
    }
}
