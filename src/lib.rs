// ==========================================
// PTM upload validator - core library
// ==========================================
// Pre-submission validation of PTM (parent-teacher meeting)
// student data sheets: CSV / Excel -> header classification
// -> row rules -> completeness -> report -> submission gate
// ==========================================

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// Module declarations
// ==========================================

// Domain layer - parsed data and validation result model
pub mod domain;

// Ingestion layer - file bytes to ParsedSheet
pub mod importer;

// Engine layer - header and row rules
pub mod engine;

// Configuration layer
pub mod config;

// Database infrastructure (connection setup, config schema)
pub mod db;

// Logging
pub mod logging;

// Internationalization
pub mod i18n;

// Report rendering
pub mod report;

// API layer - submission gate
pub mod api;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    CellValue, DynamicField, DynamicFieldDescriptor, FieldCategory, IssueCode, ParsedSheet,
    RawRow, Severity, ValidationIssue, ValidationReport, ValidationSummary,
};

pub use engine::{validate, HeaderAliasTable, HeaderResolver, UploadValidator};

pub use importer::{ImportError, ImportResult, UploadedFile};

pub use config::{ConfigManager, ValidationConfig};

pub use api::{ApiError, ApiResult, SubmissionApi, SubmissionRequest, UploadEndpoint};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
