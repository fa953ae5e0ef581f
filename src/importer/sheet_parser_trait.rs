// ==========================================
// PTM upload validator - sheet parser trait
// ==========================================
// Ingestion seam: one implementation per accepted file format
// ==========================================

use crate::domain::sheet::ParsedSheet;
use crate::importer::error::ImportResult;

// ==========================================
// FileParser Trait
// ==========================================
// Implementors: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// Parse file content into literal headers plus data rows
    ///
    /// # Arguments
    /// - bytes: whole file content
    ///
    /// # Returns
    /// - Ok(ParsedSheet): headers (first row, duplicates kept) and rows in file order
    /// - Err(ImportError::Unreadable): content cannot be decoded, nothing partial is returned
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<ParsedSheet>;
}
