// ==========================================
// PTM upload validator - parsed sheet model
// ==========================================
// RawRow / CellValue / ParsedSheet
// Rows stay aligned with the literal header list so duplicate headers survive
// ==========================================

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

static EMPTY_CELL: CellValue = CellValue::Empty;

// ==========================================
// CellValue - raw cell content
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Empty, or text that trims to nothing
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Blank or the "-" placeholder
    pub fn is_no_data(&self) -> bool {
        self.is_blank() || self.as_text().trim() == "-"
    }

    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Empty => Cow::Borrowed(""),
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            CellValue::Number(n) => Cow::Owned(n.to_string()),
        }
    }

    /// Finite numeric value, if the cell holds one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

// ==========================================
// RawRow - one data row in file order
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub row_number: usize, // file row, header row is 1
    pub cells: Vec<CellValue>,
}

impl RawRow {
    pub fn new(row_number: usize, cells: Vec<CellValue>) -> Self {
        Self { row_number, cells }
    }

    /// Cell at a column index; ragged rows read as empty
    pub fn get(&self, column: usize) -> &CellValue {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }

    /// Every value is missing or whitespace
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(CellValue::is_blank)
    }
}

// ==========================================
// ParsedSheet - ingestion output
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl ParsedSheet {
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text("   ".to_string()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
        assert!(CellValue::Text(" - ".to_string()).is_no_data());
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(CellValue::Text(" 42.5 ".to_string()).as_number(), Some(42.5));
        assert_eq!(CellValue::Number(7.0).as_number(), Some(7.0));
        assert_eq!(CellValue::Text("NaN".to_string()).as_number(), None);
        assert_eq!(CellValue::Text("abc".to_string()).as_number(), None);
        assert_eq!(CellValue::Number(1001.0).as_text(), "1001");
    }

    #[test]
    fn test_ragged_row_reads_empty() {
        let row = RawRow::new(2, vec![CellValue::from("A")]);
        assert_eq!(row.get(5), &CellValue::Empty);
        assert!(!row.is_empty());
        assert!(RawRow::new(3, vec![CellValue::from(" "), CellValue::Empty]).is_empty());
    }
}
