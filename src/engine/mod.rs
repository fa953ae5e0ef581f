// ==========================================
// PTM upload validator - engine layer
// ==========================================
// Header resolution, completeness and row rules
// Rule tables are data (alias table, whitelists, matcher chain),
// all issues flow into one accumulator per validation pass
// ==========================================

pub mod calendar;
pub mod completeness;
pub mod header_alias;
pub mod header_matcher;
pub mod header_resolver;
pub mod pipeline;
pub mod row_validator;
pub mod subjects;

// Re-exports
pub use completeness::check_completeness;
pub use header_alias::{normalize_header, CanonicalField, HeaderAliasTable, ROLL_NO_KEY};
pub use header_matcher::{default_chain, HeaderMatcher, MatchOutcome};
pub use header_resolver::{HeaderResolution, HeaderResolver};
pub use pipeline::{validate, UploadValidator};
pub use row_validator::{normalize_roll_no, RowStats, RowValidator};
