// ==========================================
// PTM upload validator - API layer
// ==========================================
// Submission gate in front of the external upload endpoint
// ==========================================

pub mod error;
pub mod submission_api;

pub use error::{ApiError, ApiResult};
pub use submission_api::{
    OperationType, RowOutcome, SubmissionApi, SubmissionRequest, UploadEndpoint, UploadPayload,
    UploadResponse, WarningAcknowledgement,
};
