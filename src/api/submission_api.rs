// ==========================================
// PTM upload validator - submission API
// ==========================================
// Gate: file selected -> PTM date selected -> report matches file (name + content)
//       -> no errors -> warnings acknowledged
// Then the original, unparsed file is forwarded with the PTM date
// and operation "generate" to the upload endpoint
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::issue::{FileFingerprint, ValidationReport};
use crate::importer::UploadedFile;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// Request side
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Generate,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::Generate => write!(f, "generate"),
        }
    }
}

/// The user's answer to "warnings were found, continue?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningAcknowledgement {
    Confirmed,
    NotConfirmed,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionRequest {
    pub file: Option<UploadedFile>,
    pub ptm_date: Option<NaiveDate>,
}

/// What the upload endpoint receives
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub request_id: Uuid,
    pub file: UploadedFile, // original bytes, never re-encoded
    pub ptm_date: NaiveDate,
    pub operation: OperationType,
}

impl UploadPayload {
    /// Multipart text fields (the file itself travels as `csvFile`)
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ptmDate", self.ptm_date.format("%Y-%m-%d").to_string()),
            ("type", self.operation.to_string()),
        ]
    }
}

// ==========================================
// Response side
// ==========================================
/// Per-student outcome reported by the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOutcome {
    pub name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub request_id: Uuid,
    pub results: Vec<RowOutcome>,
}

impl UploadResponse {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

// ==========================================
// UploadEndpoint Trait
// ==========================================
// Opaque downstream service that turns the file into per-student reports
#[async_trait]
pub trait UploadEndpoint: Send + Sync {
    async fn upload(&self, payload: UploadPayload) -> ApiResult<Vec<RowOutcome>>;
}

// ==========================================
// SubmissionApi
// ==========================================
pub struct SubmissionApi {
    endpoint: Arc<dyn UploadEndpoint>,
}

impl SubmissionApi {
    pub fn new(endpoint: Arc<dyn UploadEndpoint>) -> Self {
        Self { endpoint }
    }

    /// Submission gate, no side effects
    ///
    /// # Returns
    /// - Ok((file, ptm_date)): everything needed for the upload
    /// - Err(ApiError): first refusal reason, in gate order
    pub fn check<'r>(
        report: &ValidationReport,
        request: &'r SubmissionRequest,
        acknowledgement: WarningAcknowledgement,
    ) -> ApiResult<(&'r UploadedFile, NaiveDate)> {
        let file = request.file.as_ref().ok_or(ApiError::NoFile)?;
        let ptm_date = request.ptm_date.ok_or(ApiError::MissingPtmDate)?;

        let same_content = report.fingerprint.as_ref() == Some(&FileFingerprint::of(&file.bytes));
        if file.name != report.file_name || !same_content {
            return Err(ApiError::ReportMismatch {
                file_name: file.name.clone(),
                report_file_name: report.file_name.clone(),
            });
        }

        if !report.can_submit() {
            return Err(ApiError::SubmissionBlocked {
                error_count: report.summary.error_count,
            });
        }

        if report.requires_confirmation() && acknowledgement != WarningAcknowledgement::Confirmed {
            return Err(ApiError::WarningsNotAcknowledged {
                warning_count: report.summary.warning_count,
            });
        }

        Ok((file, ptm_date))
    }

    /// Gate the submission and forward the file
    ///
    /// # Arguments
    /// - report: validation report of the selected file
    /// - request: selected file + PTM date
    /// - acknowledgement: answer to the warning confirmation
    #[instrument(skip(self, report, request), fields(file_name = %report.file_name))]
    pub async fn submit(
        &self,
        report: &ValidationReport,
        request: SubmissionRequest,
        acknowledgement: WarningAcknowledgement,
    ) -> ApiResult<UploadResponse> {
        let (file, ptm_date) = Self::check(report, &request, acknowledgement).map_err(|e| {
            warn!(error = %e, "submission refused");
            e
        })?;

        let request_id = Uuid::new_v4();
        let payload = UploadPayload {
            request_id,
            file: file.clone(),
            ptm_date,
            operation: OperationType::Generate,
        };

        info!(%request_id, %ptm_date, size_bytes = file.size_bytes(), "forwarding upload");
        let results = self.endpoint.upload(payload).await.map_err(|e| {
            warn!(%request_id, error = %e, "upload endpoint failed");
            e
        })?;

        let response = UploadResponse {
            request_id,
            results,
        };
        info!(
            %request_id,
            succeeded = response.succeeded(),
            failed = response.failed(),
            "upload finished"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationConfig;
    use crate::engine::validate;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingEndpoint {
        payloads: Mutex<Vec<UploadPayload>>,
    }

    #[async_trait]
    impl UploadEndpoint for RecordingEndpoint {
        async fn upload(&self, payload: UploadPayload) -> ApiResult<Vec<RowOutcome>> {
            self.payloads.lock().unwrap().push(payload);
            Ok(vec![RowOutcome {
                name: "Asha".to_string(),
                success: true,
                report_url: Some("https://reports.example/asha.pdf".to_string()),
                error: None,
            }])
        }
    }

    const CLEAN: &[u8] = b"Name,Roll No,Batch,Strength\nAsha,101,A1,30\n";

    fn request(bytes: &[u8]) -> (ValidationReport, SubmissionRequest) {
        let report = validate(bytes, "ptm.csv", &ValidationConfig::default()).unwrap();
        let request = SubmissionRequest {
            file: Some(UploadedFile::new("ptm.csv", bytes.to_vec())),
            ptm_date: NaiveDate::from_ymd_opt(2024, 7, 20),
        };
        (report, request)
    }

    #[tokio::test]
    async fn test_submit_forwards_original_bytes() {
        let endpoint = Arc::new(RecordingEndpoint::default());
        let api = SubmissionApi::new(endpoint.clone());
        let (report, req) = request(CLEAN);

        let response = api
            .submit(&report, req, WarningAcknowledgement::NotConfirmed)
            .await
            .unwrap();
        assert_eq!(response.succeeded(), 1);

        let payloads = endpoint.payloads.lock().unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].file.bytes, CLEAN.to_vec());
        assert_eq!(
            payloads[0].form_fields(),
            vec![
                ("ptmDate", "2024-07-20".to_string()),
                ("type", "generate".to_string())
            ]
        );
        assert_eq!(payloads[0].request_id, response.request_id);
    }

    #[test]
    fn test_gate_order() {
        let (report, mut req) = request(CLEAN);
        req.ptm_date = None;
        assert!(matches!(
            SubmissionApi::check(&report, &req, WarningAcknowledgement::Confirmed),
            Err(ApiError::MissingPtmDate)
        ));

        req.file = None;
        assert!(matches!(
            SubmissionApi::check(&report, &req, WarningAcknowledgement::Confirmed),
            Err(ApiError::NoFile)
        ));
    }

    #[test]
    fn test_errors_block_even_when_confirmed() {
        let (report, req) = request(b"Name,Roll No,Batch,Strength\n,101,A1,30\n");
        assert!(matches!(
            SubmissionApi::check(&report, &req, WarningAcknowledgement::Confirmed),
            Err(ApiError::SubmissionBlocked { error_count: 1 })
        ));
    }

    #[test]
    fn test_warnings_need_confirmation() {
        let (report, req) = request(b"Name,Roll No,Batch,Strength\nAsha,101,A1,30\n,,,\n");
        assert!(matches!(
            SubmissionApi::check(&report, &req, WarningAcknowledgement::NotConfirmed),
            Err(ApiError::WarningsNotAcknowledged { warning_count: 1 })
        ));
        assert!(SubmissionApi::check(&report, &req, WarningAcknowledgement::Confirmed).is_ok());
    }

    #[test]
    fn test_report_must_match_file() {
        let (report, mut req) = request(CLEAN);
        req.file = Some(UploadedFile::new("other.csv", CLEAN.to_vec()));
        assert!(matches!(
            SubmissionApi::check(&report, &req, WarningAcknowledgement::Confirmed),
            Err(ApiError::ReportMismatch { .. })
        ));
    }

    #[test]
    fn test_edited_file_with_same_name_is_refused() {
        let (report, mut req) = request(CLEAN);
        assert!(report.can_submit());

        // same name, duplicate roll number added after validation
        req.file = Some(UploadedFile::new(
            "ptm.csv",
            b"Name,Roll No,Batch,Strength\nAsha,101,A1,30\nRavi,101,A1,30\n".to_vec(),
        ));
        assert!(matches!(
            SubmissionApi::check(&report, &req, WarningAcknowledgement::Confirmed),
            Err(ApiError::ReportMismatch { .. })
        ));
    }

    #[test]
    fn test_report_without_fingerprint_is_refused() {
        let (mut report, req) = request(CLEAN);
        report.fingerprint = None;
        assert!(matches!(
            SubmissionApi::check(&report, &req, WarningAcknowledgement::Confirmed),
            Err(ApiError::ReportMismatch { .. })
        ));
    }
}
