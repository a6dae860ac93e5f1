//! Conversion issues and results
//!
//!     Callers always get one of three outcomes:
//!
//!         - a result and no issues (clean success),
//!         - a result and a non-empty issue list (best effort, flagged),
//!         - no result and a non-empty issue list (hard failure).
//!
//!     [ConversionResult::failed] is the only way to build a result without output, and it
//!     requires an issue, so a silent partial result cannot be represented.
//!
//!     A result also carries the identifier of the bulletin its message belongs to, when the
//!     caller knows it, so failures can be traced back to their bulletin.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    Syntax,
    MissingData,
    Serialization,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub message: String,
}

impl ConversionIssue {
    pub fn new(severity: Severity, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
        }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, IssueKind::Syntax, message)
    }

    pub fn missing_data(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, IssueKind::MissingData, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, IssueKind::Serialization, message)
    }
}

impl fmt::Display for ConversionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}: {}", self.severity, self.kind, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStatus {
    Success,
    WithWarnings,
    WithErrors,
    Fail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult<T> {
    output: Option<T>,
    issues: Vec<ConversionIssue>,
    bulletin_id: Option<String>,
}

impl<T> ConversionResult<T> {
    pub fn success(output: T) -> Self {
        Self {
            output: Some(output),
            issues: Vec::new(),
            bulletin_id: None,
        }
    }

    pub fn with_issues(output: T, issues: Vec<ConversionIssue>) -> Self {
        Self {
            output: Some(output),
            issues,
            bulletin_id: None,
        }
    }

    pub fn failed(issue: ConversionIssue) -> Self {
        Self {
            output: None,
            issues: vec![issue],
            bulletin_id: None,
        }
    }

    pub fn with_bulletin_id(mut self, bulletin_id: Option<String>) -> Self {
        self.bulletin_id = bulletin_id;
        self
    }

    pub fn bulletin_id(&self) -> Option<&str> {
        self.bulletin_id.as_deref()
    }

    pub fn add_issue(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    pub fn output(&self) -> Option<&T> {
        self.output.as_ref()
    }

    pub fn into_output(self) -> Option<T> {
        self.output
    }

    pub fn issues(&self) -> &[ConversionIssue] {
        &self.issues
    }

    pub fn status(&self) -> ConversionStatus {
        let worst = self.issues.iter().map(|issue| issue.severity).max();
        match (&self.output, worst) {
            (None, _) => ConversionStatus::Fail,
            (Some(_), None) => ConversionStatus::Success,
            (Some(_), Some(Severity::Warning)) => ConversionStatus::WithWarnings,
            (Some(_), Some(Severity::Error)) => ConversionStatus::WithErrors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_output_and_issues() {
        assert_eq!(ConversionResult::success(1).status(), ConversionStatus::Success);

        let warned = ConversionResult::with_issues(
            1,
            vec![ConversionIssue::new(Severity::Warning, IssueKind::Other, "odd")],
        );
        assert_eq!(warned.status(), ConversionStatus::WithWarnings);

        let mut flagged = ConversionResult::success(1);
        flagged.add_issue(ConversionIssue::syntax("duplicate"));
        assert_eq!(flagged.status(), ConversionStatus::WithErrors);

        let failed: ConversionResult<i32> =
            ConversionResult::failed(ConversionIssue::serialization("latitude 91"));
        assert_eq!(failed.status(), ConversionStatus::Fail);
        assert!(failed.output().is_none());
        assert_eq!(failed.issues().len(), 1);
    }
}
