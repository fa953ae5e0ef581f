// ==========================================
// PTM upload validator - dynamic header matchers
// ==========================================
// Ordered chain, first claim wins:
//   Attendance -> Result -> Objective_Pattern -> Subjective_Pattern
//   -> Board_Result -> JEE_ADV -> Feedback
// A matcher that recognizes its family but finds a malformed header
// still claims it (INVALID_HEADER), later matchers never see it
// ==========================================

use crate::domain::header::{
    AttendanceKind, BoardField, DynamicField, DynamicFieldDescriptor, ExamDate, JeeField,
    PatternField, ResultField,
};
use crate::domain::issue::ValidationIssue;
use crate::domain::types::{FieldCategory, IssueCode, Month};
use crate::engine::calendar::{parse_exam_date, parse_month_token, MonthToken};
use crate::engine::subjects::{
    BoardRole, ResultRole, Whitelist, BOARD_FIELDS, FEEDBACK_KINDS, FEEDBACK_SUBJECTS,
    JEE_AGGREGATE_FIELDS, JEE_PAPER_FIELDS, OBJECTIVE_FIELDS, RESULT_FIELDS, SUBJECTIVE_FIELDS,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MAX_MARKS: Regex = Regex::new(r"^(.*?)\s*\(\s*(\d+)\s*\)$").unwrap();
    static ref JEE_PAPER: Regex = Regex::new(r"(?i)^paper([\s_]*)(\d+)_result_(.*)$").unwrap();
}

/// Result of offering one header to one matcher
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Claimed(DynamicFieldDescriptor),
    Malformed(ValidationIssue),
    Declined,
}

// ==========================================
// HeaderMatcher Trait
// ==========================================
pub trait HeaderMatcher: Send + Sync {
    fn category(&self) -> FieldCategory;

    /// # Arguments
    /// - header: literal header text
    /// - column: column index in the file
    fn try_match(&self, header: &str, column: usize) -> MatchOutcome;
}

/// Matchers in precedence order
pub fn default_chain() -> Vec<Box<dyn HeaderMatcher>> {
    vec![
        Box::new(AttendanceMatcher),
        Box::new(ResultMatcher),
        Box::new(PatternMatcher::objective()),
        Box::new(PatternMatcher::subjective()),
        Box::new(BoardResultMatcher),
        Box::new(JeeAdvancedMatcher),
        Box::new(FeedbackMatcher),
    ]
}

/// Case-insensitive prefix strip
fn strip_prefix_ci<'a>(header: &'a str, prefix: &str) -> Option<&'a str> {
    let head = header.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        header.get(prefix.len()..)
    } else {
        None
    }
}

fn invalid_header(header: &str, message: String) -> ValidationIssue {
    ValidationIssue::error(IssueCode::InvalidHeader, message).in_column(header)
}

fn claimed(header: &str, column: usize, period_label: &str, field: DynamicField) -> MatchOutcome {
    MatchOutcome::Claimed(DynamicFieldDescriptor {
        header: header.to_string(),
        column,
        period_label: period_label.trim().to_string(),
        field,
    })
}

/// INVALID_HEADER for an unknown subject token, with a "did you mean" when possible
fn unknown_subject<R: Copy + 'static>(
    header: &str,
    token: &str,
    whitelist: &Whitelist<R>,
    rename: impl Fn(&str) -> String,
) -> MatchOutcome {
    let issue = invalid_header(
        header,
        format!("Column \"{}\": \"{}\" is not a recognized subject", header, token),
    );
    let issue = match whitelist.suggest(token) {
        Some(entry) => issue.with_hint(format!("Did you mean \"{}\"?", rename(entry.canonical))),
        None => issue.with_hint(format!(
            "Use one of: {}",
            whitelist.canonical_names().join(", ")
        )),
    };
    MatchOutcome::Malformed(issue)
}

/// Parse the date token of a dated family, or build the INVALID_HEADER
fn exam_date_or_issue(
    header: &str,
    date_token: &str,
    rename: impl Fn(&str) -> String,
) -> Result<ExamDate, ValidationIssue> {
    parse_exam_date(date_token).map_err(|err| {
        let issue = invalid_header(
            header,
            format!("Column \"{}\": invalid date, {}", header, err.reason),
        );
        match err.suggestion {
            Some(fixed) => issue.with_hint(format!("Rename the column to \"{}\"", rename(&fixed))),
            None => issue.with_hint("Dates are written as \"DD Mon\" (e.g. 07 Jul) or a 4-digit year"),
        }
    })
}

// ==========================================
// Attendance_<Mon>[_P|_A|_Per]
// ==========================================
pub struct AttendanceMatcher;

impl HeaderMatcher for AttendanceMatcher {
    fn category(&self) -> FieldCategory {
        FieldCategory::Attendance
    }

    fn try_match(&self, header: &str, column: usize) -> MatchOutcome {
        let rest = match strip_prefix_ci(header, "Attendance_") {
            Some(rest) => rest,
            None => return MatchOutcome::Declined,
        };

        let tokens: Vec<&str> = rest.split('_').collect();
        let (month_token, suffix) = match tokens.as_slice() {
            [month] => (*month, None),
            [month, suffix] => (*month, Some(*suffix)),
            _ => {
                return MatchOutcome::Malformed(
                    invalid_header(
                        header,
                        format!("Column \"{}\" is not a valid attendance header", header),
                    )
                    .with_hint("Attendance headers look like Attendance_Mar, Attendance_Mar_P, Attendance_Mar_A, Attendance_Mar_Per"),
                )
            }
        };

        let kind = match suffix.map(|s| s.trim().to_ascii_lowercase()) {
            None => AttendanceKind::Held,
            Some(s) if s == "p" => AttendanceKind::Present,
            Some(s) if s == "a" => AttendanceKind::Absent,
            Some(s) if s == "per" => AttendanceKind::Percentage,
            Some(_) => {
                return MatchOutcome::Malformed(
                    invalid_header(
                        header,
                        format!("Column \"{}\": unknown attendance suffix", header),
                    )
                    .with_hint("Use _P (present), _A (absent) or _Per (percentage), or no suffix for classes held"),
                )
            }
        };

        match parse_month_token(month_token) {
            MonthToken::Short(month) => claimed(
                header,
                column,
                month_token,
                DynamicField::Attendance { month, kind },
            ),
            MonthToken::FullName(month) => MatchOutcome::Malformed(
                invalid_header(
                    header,
                    format!(
                        "Column \"{}\" uses the full month name \"{}\"",
                        header,
                        month_token.trim()
                    ),
                )
                .with_hint(format!(
                    "Rename the column to \"Attendance_{}{}\"",
                    month,
                    kind.suffix()
                )),
            ),
            MonthToken::Unknown => MatchOutcome::Malformed(
                invalid_header(
                    header,
                    format!(
                        "Column \"{}\": \"{}\" is not a recognized month",
                        header,
                        month_token.trim()
                    ),
                )
                .with_hint(format!(
                    "Use a short month name: {}",
                    Month::ALL
                        .iter()
                        .map(|m| m.short_name())
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
            ),
        }
    }
}

// ==========================================
// Result_<Date>_<Subject>
// ==========================================
pub struct ResultMatcher;

impl HeaderMatcher for ResultMatcher {
    fn category(&self) -> FieldCategory {
        FieldCategory::Result
    }

    fn try_match(&self, header: &str, column: usize) -> MatchOutcome {
        let rest = match strip_prefix_ci(header, "Result_") {
            Some(rest) => rest,
            None => return MatchOutcome::Declined,
        };

        let (date_token, subject_token) = match rest.split_once('_') {
            Some(parts) => parts,
            None => {
                return MatchOutcome::Malformed(
                    invalid_header(
                        header,
                        format!("Column \"{}\" is missing the date or the subject", header),
                    )
                    .with_hint("Result headers look like Result_07 Jul_Physics"),
                )
            }
        };

        let date = match exam_date_or_issue(header, date_token, |d| {
            format!("Result_{}_{}", d, subject_token)
        }) {
            Ok(date) => date,
            Err(issue) => return MatchOutcome::Malformed(issue),
        };

        let entry = match RESULT_FIELDS.lookup(subject_token) {
            Some(entry) => entry,
            None => {
                return unknown_subject(header, subject_token, &RESULT_FIELDS, |s| {
                    format!("Result_{}_{}", date_token, s)
                })
            }
        };

        let field = match entry.role {
            ResultRole::Subject => ResultField::Subject(entry.canonical.to_string()),
            ResultRole::Total => ResultField::Total,
            ResultRole::Rank => ResultField::Rank,
            ResultRole::Highest => ResultField::Highest,
            ResultRole::Abs => ResultField::Abs,
        };
        claimed(header, column, date_token, DynamicField::Result { date, field })
    }
}

// ==========================================
// Objective_Pattern_<Date>_<Subject>(<max>)
// Subjective_Pattern_<Date>_<Subject>(<max>)
// ==========================================
pub struct PatternMatcher {
    category: FieldCategory,
    prefix: &'static str,
    fields: Whitelist<bool>,
}

impl PatternMatcher {
    pub fn objective() -> Self {
        Self {
            category: FieldCategory::ObjectivePattern,
            prefix: "Objective_Pattern_",
            fields: OBJECTIVE_FIELDS,
        }
    }

    pub fn subjective() -> Self {
        Self {
            category: FieldCategory::SubjectivePattern,
            prefix: "Subjective_Pattern_",
            fields: SUBJECTIVE_FIELDS,
        }
    }
}

impl HeaderMatcher for PatternMatcher {
    fn category(&self) -> FieldCategory {
        self.category
    }

    fn try_match(&self, header: &str, column: usize) -> MatchOutcome {
        let rest = match strip_prefix_ci(header, self.prefix) {
            Some(rest) => rest,
            None => return MatchOutcome::Declined,
        };
        let example = format!("{}07 Jul_Phy(10)", self.prefix);

        let (date_token, subject_part) = match rest.split_once('_') {
            Some(parts) => parts,
            None => {
                return MatchOutcome::Malformed(
                    invalid_header(
                        header,
                        format!("Column \"{}\" is missing the date or the subject", header),
                    )
                    .with_hint(format!("Headers in this family look like {}", example)),
                )
            }
        };

        let date = match exam_date_or_issue(header, date_token, |d| {
            format!("{}{}_{}", self.prefix, d, subject_part)
        }) {
            Ok(date) => date,
            Err(issue) => return MatchOutcome::Malformed(issue),
        };

        let (subject_token, max_marks) = match MAX_MARKS.captures(subject_part) {
            Some(caps) => (
                caps.get(1).map(|m| m.as_str()).unwrap_or(""),
                caps[2].parse::<u32>().unwrap_or(0),
            ),
            None => {
                return MatchOutcome::Malformed(
                    invalid_header(
                        header,
                        format!("Column \"{}\" does not state the maximum marks", header),
                    )
                    .with_hint(format!("Add the maximum marks in brackets, e.g. {}", example)),
                )
            }
        };

        if max_marks == 0 {
            return MatchOutcome::Malformed(
                invalid_header(
                    header,
                    format!("Column \"{}\": maximum marks must be a positive number", header),
                )
                .with_hint(format!("e.g. {}", example)),
            );
        }

        let entry = match self.fields.lookup(subject_token) {
            Some(entry) => entry,
            None => {
                return unknown_subject(header, subject_token, &self.fields, |s| {
                    format!("{}{}_{}({})", self.prefix, date_token, s, max_marks)
                })
            }
        };

        let field = PatternField {
            subject: entry.canonical.to_string(),
            max_marks,
            is_total: entry.role,
        };
        let field = match self.category {
            FieldCategory::SubjectivePattern => DynamicField::SubjectivePattern { date, field },
            _ => DynamicField::ObjectivePattern { date, field },
        };
        claimed(header, column, date_token, field)
    }
}

// ==========================================
// Board_Result_<Date>_<Subject>
// ==========================================
pub struct BoardResultMatcher;

impl HeaderMatcher for BoardResultMatcher {
    fn category(&self) -> FieldCategory {
        FieldCategory::BoardResult
    }

    fn try_match(&self, header: &str, column: usize) -> MatchOutcome {
        let rest = match strip_prefix_ci(header, "Board_Result_") {
            Some(rest) => rest,
            None => return MatchOutcome::Declined,
        };

        let (date_token, subject_token) = match rest.split_once('_') {
            Some(parts) => parts,
            None => {
                return MatchOutcome::Malformed(
                    invalid_header(
                        header,
                        format!("Column \"{}\" is missing the date or the subject", header),
                    )
                    .with_hint("Board headers look like Board_Result_2024_Physics"),
                )
            }
        };

        let date = match exam_date_or_issue(header, date_token, |d| {
            format!("Board_Result_{}_{}", d, subject_token)
        }) {
            Ok(date) => date,
            Err(issue) => return MatchOutcome::Malformed(issue),
        };

        let entry = match BOARD_FIELDS.lookup(subject_token) {
            Some(entry) => entry,
            None => {
                return unknown_subject(header, subject_token, &BOARD_FIELDS, |s| {
                    format!("Board_Result_{}_{}", date_token, s)
                })
            }
        };

        let field = match entry.role {
            BoardRole::Subject => BoardField::Subject(entry.canonical.to_string()),
            BoardRole::Rank => BoardField::Rank,
            BoardRole::Highest => BoardField::Highest,
        };
        claimed(header, column, date_token, DynamicField::BoardResult { date, field })
    }
}

// ==========================================
// JEE_ADV_Result_Paper <n>_Result_<Date>_<Part>
// JEE_ADV_Result_<Date>_<Aggregate>
// ==========================================
pub struct JeeAdvancedMatcher;

const JEE_PREFIX: &str = "JEE_ADV_Result_";

impl JeeAdvancedMatcher {
    fn paper_field(&self, header: &str, column: usize, paper_rest: &str) -> MatchOutcome {
        let caps = match JEE_PAPER.captures(paper_rest) {
            Some(caps) => caps,
            None => {
                return MatchOutcome::Malformed(
                    invalid_header(
                        header,
                        format!("Column \"{}\" is not a valid JEE paper header", header),
                    )
                    .with_hint("Paper headers look like JEE_ADV_Result_Paper 1_Result_07 Jul_Phy"),
                )
            }
        };

        let separator = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let paper_number = &caps[2];
        let tail = caps.get(3).map(|m| m.as_str()).unwrap_or("");

        let paper = match paper_number {
            "1" => 1u8,
            "2" => 2u8,
            _ => {
                return MatchOutcome::Malformed(
                    invalid_header(
                        header,
                        format!("Column \"{}\": only Paper 1 and Paper 2 exist", header),
                    )
                    .with_hint("Use \"Paper 1\" or \"Paper 2\""),
                )
            }
        };

        if separator != " " {
            return MatchOutcome::Malformed(
                invalid_header(
                    header,
                    format!(
                        "Column \"{}\": the paper must be written \"Paper {}\" with one space",
                        header, paper
                    ),
                )
                .with_hint(format!(
                    "Rename the column to \"{}Paper {}_Result_{}\"",
                    JEE_PREFIX, paper, tail
                )),
            );
        }

        let (date_token, part_token) = match tail.split_once('_') {
            Some(parts) => parts,
            None => {
                return MatchOutcome::Malformed(
                    invalid_header(
                        header,
                        format!("Column \"{}\" is missing the date or the subject", header),
                    )
                    .with_hint("Paper headers look like JEE_ADV_Result_Paper 1_Result_07 Jul_Phy"),
                )
            }
        };

        let date = match exam_date_or_issue(header, date_token, |d| {
            format!("{}Paper {}_Result_{}_{}", JEE_PREFIX, paper, d, part_token)
        }) {
            Ok(date) => date,
            Err(issue) => return MatchOutcome::Malformed(issue),
        };

        match JEE_PAPER_FIELDS.lookup(part_token) {
            Some(entry) => claimed(
                header,
                column,
                date_token,
                DynamicField::JeeAdvanced {
                    date,
                    field: JeeField::Paper {
                        paper,
                        part: entry.role,
                    },
                },
            ),
            None => unknown_subject(header, part_token, &JEE_PAPER_FIELDS, |s| {
                format!("{}Paper {}_Result_{}_{}", JEE_PREFIX, paper, date_token, s)
            }),
        }
    }

    fn aggregate_field(&self, header: &str, column: usize, rest: &str) -> MatchOutcome {
        let (date_token, field_token) = match rest.split_once('_') {
            Some(parts) => parts,
            None => {
                return MatchOutcome::Malformed(
                    invalid_header(
                        header,
                        format!("Column \"{}\" is missing the date or the field", header),
                    )
                    .with_hint("Aggregate headers look like JEE_ADV_Result_07 Jul_Grand_Total"),
                )
            }
        };

        let date = match exam_date_or_issue(header, date_token, |d| {
            format!("{}{}_{}", JEE_PREFIX, d, field_token)
        }) {
            Ok(date) => date,
            Err(issue) => return MatchOutcome::Malformed(issue),
        };

        match JEE_AGGREGATE_FIELDS.lookup(field_token) {
            Some(entry) => claimed(
                header,
                column,
                date_token,
                DynamicField::JeeAdvanced {
                    date,
                    field: JeeField::Aggregate(entry.role),
                },
            ),
            None => unknown_subject(header, field_token, &JEE_AGGREGATE_FIELDS, |s| {
                format!("{}{}_{}", JEE_PREFIX, date_token, s)
            }),
        }
    }
}

impl HeaderMatcher for JeeAdvancedMatcher {
    fn category(&self) -> FieldCategory {
        FieldCategory::JeeAdvanced
    }

    fn try_match(&self, header: &str, column: usize) -> MatchOutcome {
        if strip_prefix_ci(header, "JEE_ADV").is_none()
            && strip_prefix_ci(header, "JEE_Advanced").is_none()
        {
            return MatchOutcome::Declined;
        }

        let rest = match strip_prefix_ci(header, JEE_PREFIX) {
            Some(rest) => rest,
            None => {
                return MatchOutcome::Malformed(
                    invalid_header(
                        header,
                        format!("Column \"{}\" does not start with \"{}\"", header, JEE_PREFIX),
                    )
                    .with_hint("JEE headers look like JEE_ADV_Result_Paper 1_Result_07 Jul_Phy or JEE_ADV_Result_07 Jul_Grand_Total"),
                )
            }
        };

        if strip_prefix_ci(rest, "Paper").is_some() {
            self.paper_field(header, column, rest)
        } else {
            self.aggregate_field(header, column, rest)
        }
    }
}

// ==========================================
// <Subject>_<CR|D|CA|HW>
// ==========================================
pub struct FeedbackMatcher;

impl HeaderMatcher for FeedbackMatcher {
    fn category(&self) -> FieldCategory {
        FieldCategory::Feedback
    }

    fn try_match(&self, header: &str, column: usize) -> MatchOutcome {
        let (subject_token, suffix) = match header.rsplit_once('_') {
            Some(parts) => parts,
            None => return MatchOutcome::Declined,
        };

        let exact = FEEDBACK_SUBJECTS.lookup(subject_token);
        let resembling = exact.or_else(|| FEEDBACK_SUBJECTS.suggest(subject_token));
        let subject = match resembling {
            Some(entry) => entry,
            None => return MatchOutcome::Declined,
        };

        let kind = match FEEDBACK_KINDS.lookup(suffix) {
            Some(kind) => kind,
            None => {
                return MatchOutcome::Malformed(
                    invalid_header(
                        header,
                        format!("Column \"{}\": \"{}\" is not a feedback type", header, suffix),
                    )
                    .with_hint(format!(
                        "Feedback columns end in one of: {}",
                        FEEDBACK_KINDS.canonical_names().join(", ")
                    )),
                )
            }
        };

        if exact.is_none() {
            return MatchOutcome::Malformed(
                invalid_header(
                    header,
                    format!(
                        "Column \"{}\": \"{}\" is not a recognized subject",
                        header, subject_token
                    ),
                )
                .with_hint(format!(
                    "Did you mean \"{}_{}\"?",
                    subject.canonical, kind.canonical
                )),
            );
        }

        claimed(
            header,
            column,
            "",
            DynamicField::Feedback {
                subject: subject.canonical.to_string(),
                kind: kind.role,
            },
        )
    }
}
