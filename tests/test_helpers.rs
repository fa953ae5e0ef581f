// ==========================================
// Test helpers
// ==========================================
// CSV fixture builders and temporary config databases
// ==========================================
#![allow(dead_code)]

use ptm_upload_validator::{logging, validate, ValidationConfig, ValidationReport};
use std::error::Error;
use tempfile::NamedTempFile;

/// The four required columns, preferred spellings
pub const REQUIRED_HEADERS: [&str; 4] = ["Name", "Roll No", "Batch", "Strength"];

/// Build CSV bytes from a header row and data rows
///
/// Cells containing commas are quoted
pub fn csv_bytes(headers: &[&str], rows: &[&[&str]]) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(&join_csv(headers));
    out.push('\n');
    for row in rows {
        out.push_str(&join_csv(row));
        out.push('\n');
    }
    out.into_bytes()
}

fn join_csv(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|c| {
            if c.contains(',') {
                format!("\"{}\"", c)
            } else {
                c.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Required headers followed by `extra`
pub fn headers_with(extra: &[&'static str]) -> Vec<&'static str> {
    REQUIRED_HEADERS.iter().chain(extra.iter()).copied().collect()
}

/// Validate CSV bytes with the default configuration
pub fn validate_csv(bytes: &[u8]) -> ValidationReport {
    logging::init_test();
    validate(bytes, "ptm.csv", &ValidationConfig::default()).expect("csv should be readable")
}

/// Create a temporary database file
///
/// # Returns
/// - NamedTempFile: keep alive for the duration of the test
/// - String: database path
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("temp path is not utf-8")?
        .to_string();
    Ok((temp_file, db_path))
}
