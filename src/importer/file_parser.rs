// ==========================================
// PTM upload validator - file parser implementations
// ==========================================
// Ingestion stage: bytes -> ParsedSheet
// Supports: CSV (.csv) / Excel (.xlsx, first sheet only)
// ==========================================

use crate::domain::sheet::{CellValue, ParsedSheet, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::sheet_parser_trait::FileParser;
use crate::importer::upload_file::{FileKind, UploadedFile};
use calamine::{Data, Reader, Xlsx};
use csv::ReaderBuilder;
use std::io::Cursor;
use tracing::{debug, info, instrument, warn};

const UTF8_BOM: char = '\u{feff}';

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<ParsedSheet> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // ragged rows allowed
            .from_reader(bytes);

        // first row = field names
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                let h = if idx == 0 { h.trim_start_matches(UTF8_BOM) } else { h };
                h.trim().to_string()
            })
            .collect();

        // fully blank lines never reach here, the csv reader drops them
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(rows.len() + 2);
            let cells = record.iter().map(CellValue::from).collect();
            rows.push(RawRow::new(row_number, cells));
        }

        Ok(ParsedSheet::new(headers, rows))
    }
}

// ==========================================
// Excel Parser
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<ParsedSheet> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

        // first sheet only
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::Unreadable("workbook has no worksheets".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

        let mut rows_iter = range.rows();
        let header_row = match rows_iter.next() {
            Some(row) => row,
            None => return Ok(ParsedSheet::default()),
        };

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (offset, data_row) in rows_iter.enumerate() {
            // rows with no cell at all are dropped like blank CSV lines
            if data_row.iter().all(|cell| matches!(cell, Data::Empty)) {
                continue;
            }

            let cells = data_row.iter().map(to_cell_value).collect();
            rows.push(RawRow::new(first_row + offset + 2, cells));
        }

        Ok(ParsedSheet::new(headers, rows))
    }
}

fn to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        other => CellValue::from(other.to_string().as_str()),
    }
}

// ==========================================
// Universal parser (dispatch by extension)
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// Check the upload and parse it with the matching format parser
    ///
    /// # Arguments
    /// - file: uploaded file (name + bytes)
    /// - max_size_bytes: upload size limit
    ///
    /// # Returns
    /// - Ok(ParsedSheet)
    /// - Err: unsupported extension, oversize file or unreadable content
    #[instrument(skip(self, file), fields(file_name = %file.name, size_bytes = file.size_bytes()))]
    pub fn parse(&self, file: &UploadedFile, max_size_bytes: u64) -> ImportResult<ParsedSheet> {
        let kind = file.kind().map_err(|e| {
            warn!(error = %e, "upload rejected");
            e
        })?;

        if file.size_bytes() > max_size_bytes {
            let err = ImportError::FileTooLarge {
                size_bytes: file.size_bytes(),
                limit_bytes: max_size_bytes,
            };
            warn!(error = %err, "upload rejected");
            return Err(err);
        }

        debug!(?kind, "parsing upload");
        let parsed = match kind {
            FileKind::Csv => CsvParser.parse_bytes(&file.bytes),
            FileKind::Xlsx => ExcelParser.parse_bytes(&file.bytes),
        }
        .map_err(|e| {
            warn!(error = %e, "file parsing failed");
            e
        })?;

        info!(
            headers = parsed.headers.len(),
            rows = parsed.rows.len(),
            "file parsed"
        );
        Ok(parsed)
    }
}
