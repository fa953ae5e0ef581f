// ==========================================
// PTM upload validator - ingestion layer
// ==========================================
// Responsibility: uploaded file -> ParsedSheet
// Supports: CSV, Excel (.xlsx)
// ==========================================

pub mod error;
pub mod file_parser;
pub mod sheet_parser_trait;
pub mod upload_file;

pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use sheet_parser_trait::FileParser;
pub use upload_file::{file_extension, FileKind, UploadedFile};
