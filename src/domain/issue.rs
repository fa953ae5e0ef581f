// ==========================================
// PTM upload validator - validation result model
// ==========================================
// ValidationIssue / ValidationSummary / ValidationReport
// ==========================================

use crate::domain::header::{DynamicFieldDescriptor, HeaderMap};
use crate::domain::sheet::RawRow;
use crate::domain::types::{IssueCode, Severity};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ==========================================
// ValidationIssue - one problem found in the file
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_hint: Option<String>,
}

impl ValidationIssue {
    pub fn new(severity: Severity, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            row: None,
            column: None,
            fix_hint: None,
        }
    }

    pub fn error(code: IssueCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: IssueCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn in_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// ==========================================
// ValidationSummary - aggregate counts
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub empty_rows: usize,
    pub error_count: usize,
    pub warning_count: usize,
}

// ==========================================
// FileFingerprint - binds a report to the exact bytes it validated
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFingerprint {
    pub size_bytes: u64,
    pub sha256: String, // lowercase hex
}

impl FileFingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self {
            size_bytes: bytes.len() as u64,
            sha256: format!("{:x}", hasher.finalize()),
        }
    }
}

// ==========================================
// ValidationReport - full output of one validation pass
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub file_name: String,
    /// None when validated from an already-parsed sheet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<FileFingerprint>,
    pub headers: Vec<String>,
    pub header_map: HeaderMap,
    pub descriptors: Vec<DynamicFieldDescriptor>,
    pub unclassified: Vec<String>, // headers no family claimed
    pub issues: Vec<ValidationIssue>,
    pub summary: ValidationSummary,
    pub preview_rows: Vec<RawRow>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// Submission is allowed only without errors
    pub fn can_submit(&self) -> bool {
        self.summary.error_count == 0
    }

    /// Warnings need an explicit acknowledgement before submitting
    pub fn requires_confirmation(&self) -> bool {
        self.summary.warning_count > 0
    }

    pub fn issues_with_code(&self, code: IssueCode) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.code == code).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_builder() {
        let issue = ValidationIssue::error(IssueCode::EmptyRequired, "Row 2: \"Name\" is required")
            .at_row(2)
            .in_column("Name")
            .with_hint("Fill in the student name");

        assert!(issue.is_error());
        assert_eq!(issue.row, Some(2));
        assert_eq!(issue.column.as_deref(), Some("Name"));

        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["code"], "EMPTY_REQUIRED");
        assert_eq!(json["severity"], "ERROR");
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = FileFingerprint::of(b"Name,Roll No\nAsha,101\n");
        let b = FileFingerprint::of(b"Name,Roll No\nAsha,102\n");

        assert_eq!(a.size_bytes, b.size_bytes);
        assert_ne!(a, b);
        assert_eq!(a, FileFingerprint::of(b"Name,Roll No\nAsha,101\n"));
        assert_eq!(
            FileFingerprint::of(b"").sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let issue = ValidationIssue::warning(IssueCode::EmptyRows, "1 empty row skipped");
        let json = serde_json::to_value(&issue).unwrap();
        assert!(json.get("row").is_none());
        assert!(json.get("fix_hint").is_none());
    }
}
