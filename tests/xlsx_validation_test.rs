// ==========================================
// Excel upload tests
// ==========================================
// Workbooks are built in memory with rust_xlsxwriter
// ==========================================

mod test_helpers;

use ptm_upload_validator::{
    validate, FieldCategory, ImportError, IssueCode, ValidationConfig, ValidationReport,
};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use test_helpers::REQUIRED_HEADERS;

fn write_row(sheet: &mut Worksheet, row: u32, cells: &[Cell]) -> Result<(), XlsxError> {
    for (col, cell) in cells.iter().enumerate() {
        let col = col as u16;
        match cell {
            Cell::Text(s) => {
                sheet.write_string(row, col, *s)?;
            }
            Cell::Num(n) => {
                sheet.write_number(row, col, *n)?;
            }
            Cell::Skip => {}
        }
    }
    Ok(())
}

enum Cell {
    Text(&'static str),
    Num(f64),
    Skip,
}

fn header_cells(extra: &[&'static str]) -> Vec<Cell> {
    REQUIRED_HEADERS
        .iter()
        .chain(extra.iter())
        .map(|h| Cell::Text(*h))
        .collect()
}

fn validate_xlsx(bytes: &[u8]) -> ValidationReport {
    validate(bytes, "ptm.xlsx", &ValidationConfig::default()).expect("xlsx should be readable")
}

#[test]
fn test_complete_workbook_passes() {
    let extra = [
        "Attendance_Jan",
        "Attendance_Jan_P",
        "Attendance_Jan_A",
        "Attendance_Jan_Per",
        "Result_2024_Physics",
        "Result_2024_Total",
        "Result_2024_Rank",
        "Result_2024_Highest_Marks",
        "Physics_CR",
    ];

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    write_row(sheet, 0, &header_cells(&extra)).unwrap();
    write_row(
        sheet,
        1,
        &[
            Cell::Text("Asha"),
            Cell::Num(101.0),
            Cell::Text("A1"),
            Cell::Num(30.0),
            Cell::Num(20.0),
            Cell::Num(18.0),
            Cell::Num(2.0),
            Cell::Num(90.0),
            Cell::Num(72.0),
            Cell::Num(72.0),
            Cell::Num(3.0),
            Cell::Num(98.0),
            Cell::Text("Good"),
        ],
    )
    .unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let report = validate_xlsx(&bytes);
    assert!(report.issues.is_empty(), "unexpected issues: {:?}", report.issues);
    assert_eq!(report.summary.valid_rows, 1);
    assert_eq!(report.descriptors.len(), extra.len());
    assert!(report
        .descriptors
        .iter()
        .any(|d| d.category() == FieldCategory::Feedback));
}

#[test]
fn test_numeric_and_text_roll_numbers_collide() {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    write_row(sheet, 0, &header_cells(&[])).unwrap();
    write_row(
        sheet,
        1,
        &[Cell::Text("Asha"), Cell::Num(101.0), Cell::Text("A1"), Cell::Num(30.0)],
    )
    .unwrap();
    write_row(
        sheet,
        2,
        &[Cell::Text("Ravi"), Cell::Text("101"), Cell::Text("A1"), Cell::Num(30.0)],
    )
    .unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let report = validate_xlsx(&bytes);
    let duplicates = report.issues_with_code(IssueCode::DuplicateRollNo);
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].row, Some(3));
}

#[test]
fn test_missing_cells_are_empty_required() {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    write_row(sheet, 0, &header_cells(&[])).unwrap();
    write_row(
        sheet,
        1,
        &[Cell::Text("Asha"), Cell::Num(101.0), Cell::Skip, Cell::Num(30.0)],
    )
    .unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let report = validate_xlsx(&bytes);
    let empty = report.issues_with_code(IssueCode::EmptyRequired);
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].column.as_deref(), Some("Batch"));
    assert_eq!(empty[0].row, Some(2));
}

#[test]
fn test_only_first_sheet_is_read() {
    let mut workbook = Workbook::new();
    {
        let first = workbook.add_worksheet();
        write_row(first, 0, &header_cells(&[])).unwrap();
        write_row(
            first,
            1,
            &[Cell::Text("Asha"), Cell::Num(101.0), Cell::Text("A1"), Cell::Num(30.0)],
        )
        .unwrap();
    }
    {
        let second = workbook.add_worksheet();
        write_row(second, 0, &[Cell::Text("Notes")]).unwrap();
        write_row(second, 1, &[Cell::Text("ignored")]).unwrap();
    }
    let bytes = workbook.save_to_buffer().unwrap();

    let report = validate_xlsx(&bytes);
    assert_eq!(report.headers, REQUIRED_HEADERS.to_vec());
    assert!(report.issues.is_empty());
}

#[test]
fn test_corrupt_workbook_is_unreadable() {
    let result = validate(b"PK\x03\x04 truncated", "ptm.xlsx", &ValidationConfig::default());
    assert!(matches!(result, Err(ImportError::Unreadable(_))));
}
