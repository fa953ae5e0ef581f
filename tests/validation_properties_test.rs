// ==========================================
// End-to-end validation behavior
// ==========================================
// Whole files through `validate`, asserting on the report
// ==========================================

mod test_helpers;

use ptm_upload_validator::{FieldCategory, IssueCode, Severity};
use test_helpers::{csv_bytes, headers_with, validate_csv, REQUIRED_HEADERS};

#[test]
fn test_file_without_data_rows_is_no_data() {
    for bytes in [
        csv_bytes(&REQUIRED_HEADERS, &[]),
        b"Name,Roll No,Batch,Strength\n\n\n".to_vec(),
    ] {
        let report = validate_csv(&bytes);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].code, IssueCode::NoData);
        assert_eq!(report.issues[0].severity, Severity::Error);
        assert!(report.preview_rows.is_empty());
        assert!(!report.can_submit());
    }
}

#[test]
fn test_missing_required_headers_are_listed_once() {
    let bytes = csv_bytes(&["Name", "Batch", "Remarks"], &[&["Asha", "A1", "ok"]]);
    let report = validate_csv(&bytes);

    let missing = report.issues_with_code(IssueCode::MissingHeaders);
    assert_eq!(missing.len(), 1);
    assert_eq!(
        missing[0].message,
        "Missing required columns: ROLL NO, Strength"
    );

    assert!(report.header_map.contains_key("name"));
    assert!(report.header_map.contains_key("batch"));
    assert!(!report.header_map.contains_key("rollno"));
    assert!(!report.header_map.contains_key("strength"));
}

#[test]
fn test_full_month_name_attendance_is_rejected() {
    let headers = headers_with(&["Attendance_March_P"]);
    let report = validate_csv(&csv_bytes(&headers, &[&["Asha", "101", "A1", "30", "12"]]));

    let invalid = report.issues_with_code(IssueCode::InvalidHeader);
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].column.as_deref(), Some("Attendance_March_P"));
    assert!(invalid[0].fix_hint.as_deref().unwrap_or("").contains("Mar"));

    assert!(report
        .descriptors
        .iter()
        .all(|d| d.category() != FieldCategory::Attendance));
    assert!(report.issues_with_code(IssueCode::InvalidAttendance).is_empty());
}

#[test]
fn test_partial_attendance_set_lists_missing_companions() {
    let headers = headers_with(&["Attendance_Mar_P", "Attendance_Mar"]);
    let report = validate_csv(&csv_bytes(
        &headers,
        &[&["Asha", "101", "A1", "30", "10", "12"]],
    ));

    let incomplete = report.issues_with_code(IssueCode::IncompleteAttendanceSet);
    assert_eq!(incomplete.len(), 1);
    assert!(incomplete[0].message.contains("\"Attendance_Mar_A\""));
    assert!(incomplete[0].message.contains("\"Attendance_Mar_Per\""));
    assert!(!incomplete[0].message.contains("\"Attendance_Mar_P\""));
}

#[test]
fn test_duplicate_roll_number_after_comma_stripping() {
    let report = validate_csv(&csv_bytes(
        &REQUIRED_HEADERS,
        &[
            &["Asha", "1,001", "A1", "30"],
            &["Ravi", " 1001 ", "A1", "30"],
        ],
    ));

    let duplicates = report.issues_with_code(IssueCode::DuplicateRollNo);
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].row, Some(3));
    assert!(duplicates[0].message.contains("\"1001\""));
    assert!(report.issues.iter().all(|i| i.row != Some(2)));
    assert_eq!(report.summary.valid_rows, 1);
}

#[test]
fn test_absent_rank_skips_result_checks() {
    let headers = headers_with(&[
        "Result_07 Jul_Physics",
        "Result_07 Jul_Total",
        "Result_07 Jul_Rank",
        "Result_07 Jul_Highest_Marks",
    ]);
    let report = validate_csv(&csv_bytes(
        &headers,
        &[
            &["Asha", "101", "A1", "30", "", "", "ABS", ""],
            &["Ravi", "102", "A1", "30", "n/a", "", "absent", ""],
            &["Meera", "103", "A1", "30", "55", "", "4", "98"],
        ],
    ));

    assert!(!report
        .issues
        .iter()
        .any(|i| i.row == Some(2) || i.row == Some(3)));

    let missing_total = report.issues_with_code(IssueCode::MissingTotal);
    assert_eq!(missing_total.len(), 1);
    assert_eq!(missing_total[0].row, Some(4));
    assert!(report.can_submit());
}

#[test]
fn test_validation_is_deterministic() {
    let headers = headers_with(&["Attendance_Mar", "Result_07July_Physics", "Remarks"]);
    let bytes = csv_bytes(
        &headers,
        &[
            &["Asha", "101", "A1", "30", "x", "1", ""],
            &["", "101", "A1", "30", "", "", ""],
            &["", "", "", "", "", "", ""],
        ],
    );

    let first = validate_csv(&bytes);
    let second = validate_csv(&bytes);
    assert_eq!(first.issues, second.issues);
    assert_eq!(first.summary, second.summary);
    assert_eq!(first, second);
}

#[test]
fn test_result_date_without_space_suggests_fix() {
    let headers = headers_with(&["Result_07July_Physics"]);
    let report = validate_csv(&csv_bytes(&headers, &[&["Asha", "101", "A1", "30", "55"]]));

    let invalid = report.issues_with_code(IssueCode::InvalidHeader);
    assert_eq!(invalid.len(), 1);
    assert!(invalid[0].is_error());
    assert!(invalid[0].fix_hint.as_deref().unwrap_or("").contains("07 Jul"));
}

#[test]
fn test_blank_row_and_valid_row() {
    let report = validate_csv(&csv_bytes(
        &REQUIRED_HEADERS,
        &[&["", "  ", "", ""], &["Asha", "101", "A1", "30"]],
    ));

    assert_eq!(report.summary.total_rows, 2);
    assert_eq!(report.summary.empty_rows, 1);
    assert_eq!(report.summary.valid_rows, 1);
    assert_eq!(report.summary.error_count, 0);
    assert_eq!(report.issues_with_code(IssueCode::EmptyRows).len(), 1);
    assert!(report.requires_confirmation());
}

#[test]
fn test_all_issues_are_collected_in_one_pass() {
    let headers = headers_with(&["Attendance_Mar", "Result_07July_Physics"]);
    let report = validate_csv(&csv_bytes(
        &headers,
        &[
            &["", "101", "A1", "30", "12", ""],
            &["Ravi", "101", "A1", "30", "-3", ""],
        ],
    ));

    let codes: Vec<IssueCode> = report.issues.iter().map(|i| i.code).collect();
    assert!(codes.contains(&IssueCode::InvalidHeader));
    assert!(codes.contains(&IssueCode::IncompleteAttendanceSet));
    assert!(codes.contains(&IssueCode::EmptyRequired));
    assert!(codes.contains(&IssueCode::DuplicateRollNo));
    assert!(codes.contains(&IssueCode::InvalidAttendance));
    assert_eq!(
        report.summary.error_count + report.summary.warning_count,
        report.issues.len()
    );
}

#[test]
fn test_board_marks_are_checked_but_rank_is_free_text() {
    let headers = headers_with(&["Board_Result_2024_Physics", "Board_Result_2024_Rank"]);
    let report = validate_csv(&csv_bytes(
        &headers,
        &[&["Asha", "101", "A1", "30", "abc", "first in class"]],
    ));

    assert_eq!(report.issues.len(), 1, "unexpected issues: {:?}", report.issues);
    let issue = &report.issues[0];
    assert_eq!(issue.code, IssueCode::InvalidMarks);
    assert_eq!(issue.severity, Severity::Warning);
    assert_eq!(issue.column.as_deref(), Some("Board_Result_2024_Physics"));
    assert!(report.can_submit());
}

#[test]
fn test_subjective_pattern_marks_respect_column_maximum() {
    let headers = headers_with(&[
        "Subjective_Pattern_07 Jul_Eng(20)",
        "Subjective_Pattern_07 Jul_Total(100)",
    ]);
    let report = validate_csv(&csv_bytes(&headers, &[&["Asha", "101", "A1", "30", "25", "80"]]));

    assert_eq!(report.issues.len(), 1, "unexpected issues: {:?}", report.issues);
    let issue = &report.issues[0];
    assert_eq!(issue.code, IssueCode::InvalidMarks);
    assert_eq!(issue.severity, Severity::Warning);
    assert_eq!(issue.row, Some(2));
    assert!(report
        .descriptors
        .iter()
        .all(|d| d.category() == FieldCategory::SubjectivePattern));
}

#[test]
fn test_feedback_columns_with_unknown_type() {
    let headers = headers_with(&["Physics_CR", "Physics_XY"]);
    let report = validate_csv(&csv_bytes(&headers, &[&["Asha", "101", "A1", "30", "Good", "?"]]));

    assert_eq!(report.descriptors.len(), 1);
    assert_eq!(report.descriptors[0].header, "Physics_CR");
    assert_eq!(report.descriptors[0].category(), FieldCategory::Feedback);

    let invalid = report.issues_with_code(IssueCode::InvalidHeader);
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].column.as_deref(), Some("Physics_XY"));
    assert!(!report.can_submit());
}
