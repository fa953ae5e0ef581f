// ==========================================
// PTM upload validator - API layer error type
// ==========================================
// Submission gate refusals + upload collaborator failures
// ==========================================

use crate::i18n::{t, t_with_args};
use crate::importer::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // Submission gate
    // ==========================================
    #[error("No file selected")]
    NoFile,

    #[error("No PTM date selected")]
    MissingPtmDate,

    #[error("Submission blocked: {error_count} error(s) must be fixed first")]
    SubmissionBlocked { error_count: usize },

    #[error("{warning_count} warning(s) must be acknowledged before submitting")]
    WarningsNotAcknowledged { warning_count: usize },

    #[error("File \"{file_name}\" does not match the validated report for \"{report_file_name}\"")]
    ReportMismatch {
        file_name: String,
        report_file_name: String,
    },

    // ==========================================
    // Downstream
    // ==========================================
    #[error("File import failed: {0}")]
    ImportError(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

impl ApiError {
    /// Message for the person submitting, in the current locale
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NoFile => t("submission.no_file"),
            ApiError::MissingPtmDate => t("submission.no_ptm_date"),
            ApiError::SubmissionBlocked { error_count } => {
                t_with_args("submission.has_errors", &[("count", &error_count.to_string())])
            }
            ApiError::WarningsNotAcknowledged { warning_count } => t_with_args(
                "submission.unconfirmed_warnings",
                &[("count", &warning_count.to_string())],
            ),
            other => other.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
