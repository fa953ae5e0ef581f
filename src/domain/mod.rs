// ==========================================
// PTM upload validator - domain layer
// ==========================================
// Parsed rows, header bindings, dynamic field descriptors
// and the validation result model
// No parsing or rule logic lives here
// ==========================================

pub mod header;
pub mod issue;
pub mod sheet;
pub mod types;

pub use header::{
    AttendanceKind, BoardField, DynamicField, DynamicFieldDescriptor, ExamDate, FeedbackKind,
    HeaderBinding, HeaderMap, JeeAggregate, JeeField, JeePaperPart, PatternField, ResultField,
};
pub use issue::{ValidationIssue, ValidationReport, ValidationSummary};
pub use sheet::{CellValue, ParsedSheet, RawRow};
pub use types::{FieldCategory, IssueCode, Month, Severity};
