// ==========================================
// PTM upload validator - validation pipeline
// ==========================================
// ingest -> resolve headers -> header completeness -> rows -> summary
// A pure function of (file, config): same input, same report
// ==========================================

use crate::config::ValidationConfig;
use crate::domain::issue::{FileFingerprint, ValidationIssue, ValidationReport, ValidationSummary};
use crate::domain::sheet::ParsedSheet;
use crate::domain::types::IssueCode;
use crate::engine::completeness::check_completeness;
use crate::engine::header_alias::HeaderAliasTable;
use crate::engine::header_resolver::{HeaderResolution, HeaderResolver};
use crate::engine::row_validator::RowValidator;
use crate::importer::{ImportError, ImportResult, UniversalFileParser, UploadedFile};
use tracing::{info, instrument};

pub struct UploadValidator {
    config: ValidationConfig,
    resolver: HeaderResolver,
}

impl UploadValidator {
    pub fn new(config: ValidationConfig) -> Self {
        let aliases = HeaderAliasTable::standard().with_extra_aliases(&config.extra_aliases);
        Self {
            config,
            resolver: HeaderResolver::new(aliases),
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Ingest and validate an uploaded file
    ///
    /// # Returns
    /// - Ok(ValidationReport): the file was readable (the report may hold errors)
    /// - Err(ImportError): nothing could be validated
    #[instrument(skip(self, file), fields(file_name = %file.name))]
    pub fn validate_file(&self, file: &UploadedFile) -> ImportResult<ValidationReport> {
        let sheet = UniversalFileParser.parse(file, self.config.max_file_size_bytes)?;
        let mut report = self.validate_sheet(&file.name, sheet);
        report.fingerprint = Some(FileFingerprint::of(&file.bytes));
        Ok(report)
    }

    /// Validate an already-parsed sheet
    pub fn validate_sheet(&self, file_name: &str, sheet: ParsedSheet) -> ValidationReport {
        let mut issues: Vec<ValidationIssue> = Vec::new();

        if sheet.rows.is_empty() {
            issues.push(
                ValidationIssue::error(IssueCode::NoData, "No data found in file")
                    .with_hint("The file needs a header row followed by at least one student row"),
            );
            return build_report(file_name, sheet, HeaderResolution::default(), issues, 0);
        }

        // ===== Headers =====
        let resolution = self.resolver.resolve(&sheet.headers, &mut issues);
        check_completeness(&resolution.descriptors, &mut issues);

        // ===== Rows =====
        let stats = RowValidator::new(&resolution, self.resolver.aliases())
            .validate(&sheet.rows, &mut issues);
        if stats.empty_rows > 0 {
            issues.push(ValidationIssue::warning(
                IssueCode::EmptyRows,
                format!("{} empty row(s) will be skipped", stats.empty_rows),
            ));
        }

        let mut report = build_report(
            file_name,
            sheet,
            resolution,
            issues,
            self.config.preview_row_limit,
        );
        report.summary.empty_rows = stats.empty_rows;
        report.summary.valid_rows = stats.valid_rows;

        info!(
            total_rows = report.summary.total_rows,
            valid_rows = report.summary.valid_rows,
            errors = report.summary.error_count,
            warnings = report.summary.warning_count,
            "validation finished"
        );
        report
    }

    /// Run `validate_file` on the blocking pool so callers stay responsive
    pub async fn validate_in_background(&self, file: UploadedFile) -> ImportResult<ValidationReport> {
        let validator = UploadValidator::new(self.config.clone());
        tokio::task::spawn_blocking(move || validator.validate_file(&file))
            .await
            .map_err(|e| ImportError::WorkerError(e.to_string()))?
    }
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

fn build_report(
    file_name: &str,
    sheet: ParsedSheet,
    resolution: HeaderResolution,
    issues: Vec<ValidationIssue>,
    preview_limit: usize,
) -> ValidationReport {
    let error_count = issues.iter().filter(|i| i.is_error()).count();
    let summary = ValidationSummary {
        total_rows: sheet.rows.len(),
        valid_rows: 0,
        empty_rows: 0,
        error_count,
        warning_count: issues.len() - error_count,
    };

    ValidationReport {
        file_name: file_name.to_string(),
        fingerprint: None,
        headers: sheet.headers,
        header_map: resolution.header_map,
        descriptors: resolution.descriptors,
        unclassified: resolution.unclassified,
        issues,
        summary,
        preview_rows: sheet.rows.into_iter().take(preview_limit).collect(),
    }
}

/// Validate raw file bytes with the given configuration
///
/// # Arguments
/// - bytes: whole file content
/// - file_name: original name, its extension selects the format
/// - config: limits and alias extensions
pub fn validate(
    bytes: &[u8],
    file_name: &str,
    config: &ValidationConfig,
) -> ImportResult<ValidationReport> {
    let file = UploadedFile::new(file_name, bytes.to_vec());
    UploadValidator::new(config.clone()).validate_file(&file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv(content: &str) -> ImportResult<ValidationReport> {
        validate(content.as_bytes(), "ptm.csv", &ValidationConfig::default())
    }

    #[test]
    fn test_header_only_file_is_no_data() {
        let report = csv("Name,Roll No,Batch,Strength\n").unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].code, IssueCode::NoData);
        assert!(!report.can_submit());
    }

    #[test]
    fn test_clean_file_can_submit() {
        let report = csv("Name,Roll No,Batch,Strength\nAsha,101,A1,30\nRavi,102,A1,30\n").unwrap();
        assert!(report.issues.is_empty());
        assert!(report.can_submit());
        assert!(!report.requires_confirmation());
        assert_eq!(report.summary.valid_rows, 2);
        assert_eq!(report.preview_rows.len(), 2);
    }

    #[test]
    fn test_empty_rows_warning() {
        let report = csv("Name,Roll No,Batch,Strength\nAsha,101,A1,30\n,,,\n").unwrap();
        assert_eq!(report.summary.empty_rows, 1);
        assert_eq!(report.issues_with_code(IssueCode::EmptyRows).len(), 1);
        assert!(report.can_submit());
        assert!(report.requires_confirmation());
    }

    #[test]
    fn test_preview_is_capped() {
        let mut content = String::from("Name,Roll No,Batch,Strength\n");
        for i in 0..5 {
            content.push_str(&format!("S{},{},A1,30\n", i, i));
        }
        let config = ValidationConfig {
            preview_row_limit: 3,
            ..ValidationConfig::default()
        };
        let report = validate(content.as_bytes(), "ptm.csv", &config).unwrap();
        assert_eq!(report.summary.total_rows, 5);
        assert_eq!(report.preview_rows.len(), 3);
    }

    #[test]
    fn test_unsupported_file_is_an_import_error() {
        let result = validate(b"x", "ptm.txt", &ValidationConfig::default());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_validate_in_background() {
        let file = UploadedFile::new("ptm.csv", b"Name,Roll No,Batch,Strength\nAsha,101,A1,30\n".to_vec());
        let report = UploadValidator::default()
            .validate_in_background(file)
            .await
            .unwrap();
        assert_eq!(report.summary.valid_rows, 1);
    }
}
