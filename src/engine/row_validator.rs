// ==========================================
// PTM upload validator - row validation
// ==========================================
// Per non-empty row, in order:
//   EMPTY_REQUIRED -> DUPLICATE_ROLL_NO -> attendance -> result
//   -> objective/subjective pattern -> board -> JEE Advanced
// Columns are grouped once per file, rows only read cells
// ==========================================

use crate::domain::header::{
    AttendanceKind, BoardField, DynamicField, ExamDate, JeeAggregate, JeeField, ResultField,
};
use crate::domain::issue::ValidationIssue;
use crate::domain::sheet::{CellValue, RawRow};
use crate::domain::types::{FieldCategory, IssueCode, Month};
use crate::engine::header_alias::{HeaderAliasTable, ROLL_NO_KEY};
use crate::engine::header_resolver::HeaderResolution;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// Rank cell values meaning "student did not sit this exam"
const ABSENCE_SENTINELS: [&str; 3] = ["ABS", "ABSENT", "-"];

/// Counts produced by one row pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowStats {
    pub total_rows: usize,
    pub empty_rows: usize,
    pub valid_rows: usize,
}

#[derive(Debug, Clone)]
struct ColumnRef {
    column: usize,
    header: String,
}

#[derive(Debug, Default)]
struct AttendanceColumns {
    held: Option<ColumnRef>,
    present: Option<ColumnRef>,
    absent: Option<ColumnRef>,
    percentage: Option<ColumnRef>,
}

#[derive(Debug, Default)]
struct ResultColumns {
    subjects: Vec<ColumnRef>,
    total: Option<ColumnRef>,
    rank: Option<ColumnRef>,
    highest: Option<ColumnRef>,
}

#[derive(Debug, Default)]
struct PatternColumns {
    subjects: Vec<(ColumnRef, u32)>,
    total: Option<(ColumnRef, u32)>,
}

#[derive(Debug, Default)]
struct JeeColumns {
    paper_marks: Vec<ColumnRef>,
    grand_total: Option<ColumnRef>,
    rank: Option<ColumnRef>,
    highest: Option<ColumnRef>,
}

pub struct RowValidator<'a> {
    resolution: &'a HeaderResolution,
    required: Vec<ColumnRef>,
    attendance: BTreeMap<Month, AttendanceColumns>,
    results: BTreeMap<ExamDate, ResultColumns>,
    patterns: BTreeMap<(ExamDate, bool), PatternColumns>, // bool = subjective
    board_marks: Vec<ColumnRef>,
    jee: BTreeMap<ExamDate, JeeColumns>,
}

impl<'a> RowValidator<'a> {
    /// Group the resolved columns for row checks
    pub fn new(resolution: &'a HeaderResolution, aliases: &HeaderAliasTable) -> Self {
        let required = aliases
            .required_fields()
            .filter_map(|f| resolution.header_map.get(&f.key))
            .map(|b| ColumnRef {
                column: b.column,
                header: b.header.clone(),
            })
            .collect();

        let mut validator = Self {
            resolution,
            required,
            attendance: BTreeMap::new(),
            results: BTreeMap::new(),
            patterns: BTreeMap::new(),
            board_marks: Vec::new(),
            jee: BTreeMap::new(),
        };

        for descriptor in &resolution.descriptors {
            let col = ColumnRef {
                column: descriptor.column,
                header: descriptor.header.clone(),
            };
            match &descriptor.field {
                DynamicField::Attendance { month, kind } => {
                    let set = validator.attendance.entry(*month).or_default();
                    let slot = match kind {
                        AttendanceKind::Held => &mut set.held,
                        AttendanceKind::Present => &mut set.present,
                        AttendanceKind::Absent => &mut set.absent,
                        AttendanceKind::Percentage => &mut set.percentage,
                    };
                    slot.get_or_insert(col);
                }
                DynamicField::Result { date, field } => {
                    let set = validator.results.entry(*date).or_default();
                    match field {
                        ResultField::Subject(_) => set.subjects.push(col),
                        ResultField::Total => {
                            set.total.get_or_insert(col);
                        }
                        ResultField::Rank => {
                            set.rank.get_or_insert(col);
                        }
                        ResultField::Highest => {
                            set.highest.get_or_insert(col);
                        }
                        ResultField::Abs => {}
                    }
                }
                DynamicField::ObjectivePattern { date, field }
                | DynamicField::SubjectivePattern { date, field } => {
                    let subjective = descriptor.category() == FieldCategory::SubjectivePattern;
                    let set = validator.patterns.entry((*date, subjective)).or_default();
                    if field.is_total {
                        set.total.get_or_insert((col, field.max_marks));
                    } else {
                        set.subjects.push((col, field.max_marks));
                    }
                }
                DynamicField::BoardResult { field, .. } => {
                    if !matches!(field, BoardField::Rank) {
                        validator.board_marks.push(col);
                    }
                }
                DynamicField::JeeAdvanced { date, field } => {
                    let set = validator.jee.entry(*date).or_default();
                    match field {
                        JeeField::Paper { .. } => set.paper_marks.push(col),
                        JeeField::Aggregate(JeeAggregate::GrandTotal) => {
                            set.grand_total.get_or_insert(col);
                        }
                        JeeField::Aggregate(JeeAggregate::Rank) => {
                            set.rank.get_or_insert(col);
                        }
                        JeeField::Aggregate(JeeAggregate::Highest) => {
                            set.highest.get_or_insert(col);
                        }
                    }
                }
                DynamicField::Feedback { .. } => {}
            }
        }

        validator
    }

    /// Validate every data row
    ///
    /// # Arguments
    /// - rows: data rows in file order
    /// - issues: shared issue accumulator
    ///
    /// # Returns
    /// RowStats; a row is valid when it is non-empty and got no Error
    #[instrument(skip(self, rows, issues), fields(rows = rows.len()))]
    pub fn validate(&self, rows: &[RawRow], issues: &mut Vec<ValidationIssue>) -> RowStats {
        let mut stats = RowStats {
            total_rows: rows.len(),
            ..RowStats::default()
        };
        let mut seen_roll_numbers: HashMap<String, usize> = HashMap::new();

        for row in rows {
            if row.is_empty() {
                stats.empty_rows += 1;
                continue;
            }

            let first_issue = issues.len();
            self.check_required(row, issues);
            self.check_duplicate_roll_no(row, &mut seen_roll_numbers, issues);
            self.check_attendance(row, issues);
            self.check_results(row, issues);
            self.check_patterns(row, issues);
            self.check_board(row, issues);
            self.check_jee(row, issues);

            if !issues[first_issue..].iter().any(ValidationIssue::is_error) {
                stats.valid_rows += 1;
            }
        }

        debug!(
            empty = stats.empty_rows,
            valid = stats.valid_rows,
            "rows validated"
        );
        stats
    }

    // ==========================================
    // Required fields / roll numbers
    // ==========================================

    fn check_required(&self, row: &RawRow, issues: &mut Vec<ValidationIssue>) {
        for col in &self.required {
            if row.get(col.column).is_blank() {
                issues.push(
                    ValidationIssue::error(
                        IssueCode::EmptyRequired,
                        format!("Row {}: \"{}\" is required but empty", row.row_number, col.header),
                    )
                    .at_row(row.row_number)
                    .in_column(col.header.as_str())
                    .with_hint(format!("Fill in \"{}\" for this student", col.header)),
                );
            }
        }
    }

    fn check_duplicate_roll_no(
        &self,
        row: &RawRow,
        seen: &mut HashMap<String, usize>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let binding = match self.resolution.header_map.get(ROLL_NO_KEY) {
            Some(binding) => binding,
            None => return,
        };

        let roll_no = normalize_roll_no(row.get(binding.column));
        if roll_no.is_empty() {
            return;
        }

        match seen.get(&roll_no) {
            Some(first_row) => issues.push(
                ValidationIssue::error(
                    IssueCode::DuplicateRollNo,
                    format!(
                        "Row {}: roll number \"{}\" already appears in row {}",
                        row.row_number, roll_no, first_row
                    ),
                )
                .at_row(row.row_number)
                .in_column(binding.header.as_str())
                .with_hint("Each student must appear only once"),
            ),
            None => {
                seen.insert(roll_no, row.row_number);
            }
        }
    }

    // ==========================================
    // Attendance
    // ==========================================

    fn check_attendance(&self, row: &RawRow, issues: &mut Vec<ValidationIssue>) {
        for set in self.attendance.values() {
            let held = set.held.as_ref().and_then(|c| self.count(row, c, issues));
            let present = set.present.as_ref().and_then(|c| self.count(row, c, issues));
            for col in [&set.absent, &set.percentage].into_iter().flatten() {
                self.count(row, col, issues);
            }

            if let (Some(col), Some(held_col)) = (&set.present, &set.held) {
                let present_filled = !row.get(col.column).is_no_data();
                if present_filled && row.get(held_col.column).is_no_data() {
                    issues.push(attendance_warning(
                        row,
                        col,
                        format!(
                            "Row {}: \"{}\" is filled but \"{}\" (classes held) is empty",
                            row.row_number, col.header, held_col.header
                        ),
                    ));
                }
            }

            if let (Some(p), Some(h), Some(col)) = (present, held, &set.present) {
                if p > h {
                    issues.push(attendance_warning(
                        row,
                        col,
                        format!(
                            "Row {}: {} classes present is more than {} classes held",
                            row.row_number, p, h
                        ),
                    ));
                }
            }

            if let Some(col) = &set.percentage {
                if let Some(per) = row.get(col.column).as_number() {
                    if per > 100.0 {
                        issues.push(attendance_warning(
                            row,
                            col,
                            format!(
                                "Row {}: \"{}\" is {} which is above 100",
                                row.row_number, col.header, per
                            ),
                        ));
                    }
                }
            }
        }
    }

    /// Non-negative count in an attendance cell; warns on anything else
    fn count(&self, row: &RawRow, col: &ColumnRef, issues: &mut Vec<ValidationIssue>) -> Option<f64> {
        let cell = row.get(col.column);
        if cell.is_no_data() {
            return None;
        }
        match cell.as_number() {
            Some(n) if n >= 0.0 => Some(n),
            _ => {
                issues.push(attendance_warning(
                    row,
                    col,
                    format!(
                        "Row {}: \"{}\" must be a non-negative number, found \"{}\"",
                        row.row_number,
                        col.header,
                        cell.as_text().trim()
                    ),
                ));
                None
            }
        }
    }

    // ==========================================
    // Marks families
    // ==========================================

    fn check_results(&self, row: &RawRow, issues: &mut Vec<ValidationIssue>) {
        for (date, set) in &self.results {
            if is_absent(row, set.rank.as_ref()) {
                continue;
            }

            let mut any_subject = false;
            for col in &set.subjects {
                any_subject |= check_marks(row, col, None, issues);
            }
            let marks_cols = [&set.total, &set.highest];
            for col in marks_cols.into_iter().flatten() {
                check_marks(row, col, None, issues);
            }

            if any_subject {
                check_total_present(row, set.total.as_ref(), &date.to_string(), issues);
            }
        }
    }

    fn check_patterns(&self, row: &RawRow, issues: &mut Vec<ValidationIssue>) {
        for ((date, _), set) in &self.patterns {
            let mut any_subject = false;
            for (col, max) in &set.subjects {
                any_subject |= check_marks(row, col, Some(*max), issues);
            }
            if let Some((col, max)) = &set.total {
                check_marks(row, col, Some(*max), issues);
            }

            if any_subject {
                let total = set.total.as_ref().map(|(col, _)| col);
                check_total_present(row, total, &date.to_string(), issues);
            }
        }
    }

    fn check_board(&self, row: &RawRow, issues: &mut Vec<ValidationIssue>) {
        for col in &self.board_marks {
            check_marks(row, col, None, issues);
        }
    }

    fn check_jee(&self, row: &RawRow, issues: &mut Vec<ValidationIssue>) {
        for (date, set) in &self.jee {
            if is_absent(row, set.rank.as_ref()) {
                continue;
            }

            let mut any_paper_mark = false;
            for col in &set.paper_marks {
                any_paper_mark |= check_marks(row, col, None, issues);
            }
            for col in [&set.grand_total, &set.highest].into_iter().flatten() {
                check_marks(row, col, None, issues);
            }

            if any_paper_mark {
                check_total_present(row, set.grand_total.as_ref(), &date.to_string(), issues);
            }
        }
    }
}

/// Roll number comparison key: commas dropped, surrounding whitespace trimmed
pub fn normalize_roll_no(cell: &CellValue) -> String {
    cell.as_text().replace(',', "").trim().to_string()
}

fn is_absent(row: &RawRow, rank: Option<&ColumnRef>) -> bool {
    rank.map(|col| {
        let value = row.get(col.column).as_text().trim().to_ascii_uppercase();
        ABSENCE_SENTINELS.contains(&value.as_str())
    })
    .unwrap_or(false)
}

fn attendance_warning(row: &RawRow, col: &ColumnRef, message: String) -> ValidationIssue {
    ValidationIssue::warning(IssueCode::InvalidAttendance, message)
        .at_row(row.row_number)
        .in_column(col.header.as_str())
}

/// Check one marks cell
///
/// # Returns
/// true when the cell holds data (valid or not)
fn check_marks(
    row: &RawRow,
    col: &ColumnRef,
    max_marks: Option<u32>,
    issues: &mut Vec<ValidationIssue>,
) -> bool {
    let cell = row.get(col.column);
    if cell.is_no_data() {
        return false;
    }

    match cell.as_number() {
        None => issues.push(
            ValidationIssue::warning(
                IssueCode::InvalidMarks,
                format!(
                    "Row {}: \"{}\" should be a number, found \"{}\"",
                    row.row_number,
                    col.header,
                    cell.as_text().trim()
                ),
            )
            .at_row(row.row_number)
            .in_column(col.header.as_str()),
        ),
        Some(marks) => {
            if let Some(max) = max_marks {
                if marks > f64::from(max) {
                    issues.push(
                        ValidationIssue::warning(
                            IssueCode::InvalidMarks,
                            format!(
                                "Row {}: \"{}\" is {} but the maximum is {}",
                                row.row_number, col.header, marks, max
                            ),
                        )
                        .at_row(row.row_number)
                        .in_column(col.header.as_str()),
                    );
                }
            }
        }
    }
    true
}

/// MISSING_TOTAL when subject marks exist but the total cell is empty
fn check_total_present(
    row: &RawRow,
    total: Option<&ColumnRef>,
    period: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    // a missing total column is already reported at header level
    if let Some(col) = total {
        if row.get(col.column).is_no_data() {
            issues.push(
                ValidationIssue::warning(
                    IssueCode::MissingTotal,
                    format!(
                        "Row {}: marks are entered for {} but \"{}\" is empty",
                        row.row_number, period, col.header
                    ),
                )
                .at_row(row.row_number)
                .in_column(col.header.as_str())
                .with_hint(format!("Fill in \"{}\"", col.header)),
            );
        }
    }
}
