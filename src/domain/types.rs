// ==========================================
// PTM upload validator - domain type definitions
// ==========================================
// Severity levels, issue taxonomy and dynamic field categories
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Severity
// ==========================================
// Error blocks submission, Warning needs an explicit acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

// ==========================================
// Issue code (validation taxonomy)
// ==========================================
// Serialized as SCREAMING_SNAKE_CASE, consumed by the host UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    NoData,
    MissingHeaders,
    InvalidHeaderVariation,
    InvalidHeader,
    IncompleteAttendanceSet,
    IncompleteResultSet,
    EmptyRequired,
    DuplicateRollNo,
    InvalidAttendance,
    InvalidMarks,
    MissingTotal,
    EmptyRows,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::NoData => "NO_DATA",
            IssueCode::MissingHeaders => "MISSING_HEADERS",
            IssueCode::InvalidHeaderVariation => "INVALID_HEADER_VARIATION",
            IssueCode::InvalidHeader => "INVALID_HEADER",
            IssueCode::IncompleteAttendanceSet => "INCOMPLETE_ATTENDANCE_SET",
            IssueCode::IncompleteResultSet => "INCOMPLETE_RESULT_SET",
            IssueCode::EmptyRequired => "EMPTY_REQUIRED",
            IssueCode::DuplicateRollNo => "DUPLICATE_ROLL_NO",
            IssueCode::InvalidAttendance => "INVALID_ATTENDANCE",
            IssueCode::InvalidMarks => "INVALID_MARKS",
            IssueCode::MissingTotal => "MISSING_TOTAL",
            IssueCode::EmptyRows => "EMPTY_ROWS",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// Dynamic field category
// ==========================================
// One recognized family of non-required headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldCategory {
    Attendance,
    Result,
    ObjectivePattern,
    SubjectivePattern,
    BoardResult,
    JeeAdvanced,
    Feedback,
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldCategory::Attendance => write!(f, "ATTENDANCE"),
            FieldCategory::Result => write!(f, "RESULT"),
            FieldCategory::ObjectivePattern => write!(f, "OBJECTIVE_PATTERN"),
            FieldCategory::SubjectivePattern => write!(f, "SUBJECTIVE_PATTERN"),
            FieldCategory::BoardResult => write!(f, "BOARD_RESULT"),
            FieldCategory::JeeAdvanced => write!(f, "JEE_ADVANCED"),
            FieldCategory::Feedback => write!(f, "FEEDBACK"),
        }
    }
}

// ==========================================
// Short month
// ==========================================
// Month token used by attendance headers and "DD Mon" exam dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// 1-based month number
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            Month::Jan => "January",
            Month::Feb => "February",
            Month::Mar => "March",
            Month::Apr => "April",
            Month::May => "May",
            Month::Jun => "June",
            Month::Jul => "July",
            Month::Aug => "August",
            Month::Sep => "September",
            Month::Oct => "October",
            Month::Nov => "November",
            Month::Dec => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&IssueCode::DuplicateRollNo).unwrap();
        assert_eq!(json, "\"DUPLICATE_ROLL_NO\"");
        assert_eq!(IssueCode::IncompleteAttendanceSet.to_string(), "INCOMPLETE_ATTENDANCE_SET");
    }

    #[test]
    fn test_month_numbers() {
        assert_eq!(Month::Jan.number(), 1);
        assert_eq!(Month::Sep.number(), 9);
        assert_eq!(Month::Dec.number(), 12);
    }
}
