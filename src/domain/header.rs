// ==========================================
// PTM upload validator - header model
// ==========================================
// HeaderMap (canonical key -> literal column)
// DynamicFieldDescriptor (one recognized dynamic header)
// ==========================================

use crate::domain::types::{FieldCategory, Month};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// HeaderMap
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderBinding {
    pub header: String,
    pub column: usize,
}

/// Canonical field key -> literal header found in this file
///
/// Two keys never share a column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderMap {
    entries: BTreeMap<String, HeaderBinding>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to a column
    ///
    /// # Returns
    /// - true: bound
    /// - false: the key is already bound, or the column belongs to another key
    pub fn bind(&mut self, key: &str, header: &str, column: usize) -> bool {
        if self.entries.contains_key(key) || self.claims_column(column) {
            return false;
        }
        self.entries.insert(
            key.to_string(),
            HeaderBinding {
                header: header.to_string(),
                column,
            },
        );
        true
    }

    pub fn get(&self, key: &str) -> Option<&HeaderBinding> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn claims_column(&self, column: usize) -> bool {
        self.entries.values().any(|b| b.column == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &HeaderBinding)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// ExamDate - "<d> <Mon>" or a bare year
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamDate {
    Day { day: u32, month: Month },
    Year(i32),
}

impl fmt::Display for ExamDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamDate::Day { day, month } => write!(f, "{:02} {}", day, month),
            ExamDate::Year(year) => write!(f, "{}", year),
        }
    }
}

// ==========================================
// Field roles per family
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceKind {
    Held,
    Present,
    Absent,
    Percentage,
}

impl AttendanceKind {
    pub const ALL: [AttendanceKind; 4] = [
        AttendanceKind::Held,
        AttendanceKind::Present,
        AttendanceKind::Absent,
        AttendanceKind::Percentage,
    ];

    /// Header suffix, "" for the base (classes held) column
    pub fn suffix(&self) -> &'static str {
        match self {
            AttendanceKind::Held => "",
            AttendanceKind::Present => "_P",
            AttendanceKind::Absent => "_A",
            AttendanceKind::Percentage => "_Per",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultField {
    Subject(String),
    Total,
    Rank,
    Highest,
    Abs,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternField {
    pub subject: String,
    pub max_marks: u32,
    pub is_total: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardField {
    Subject(String),
    Rank,
    Highest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JeePaperPart {
    Phy,
    Chem,
    Maths,
    TotalMarks,
}

impl JeePaperPart {
    pub const ALL: [JeePaperPart; 4] = [
        JeePaperPart::Phy,
        JeePaperPart::Chem,
        JeePaperPart::Maths,
        JeePaperPart::TotalMarks,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            JeePaperPart::Phy => "Phy",
            JeePaperPart::Chem => "Chem",
            JeePaperPart::Maths => "Maths",
            JeePaperPart::TotalMarks => "Total_Marks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JeeAggregate {
    GrandTotal,
    Rank,
    Highest,
}

impl JeeAggregate {
    pub const ALL: [JeeAggregate; 3] = [
        JeeAggregate::GrandTotal,
        JeeAggregate::Rank,
        JeeAggregate::Highest,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            JeeAggregate::GrandTotal => "Grand_Total",
            JeeAggregate::Rank => "Rank",
            JeeAggregate::Highest => "Highest_Marks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JeeField {
    Paper { paper: u8, part: JeePaperPart },
    Aggregate(JeeAggregate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackKind {
    Cr,
    D,
    Ca,
    Hw,
}

impl FeedbackKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            FeedbackKind::Cr => "CR",
            FeedbackKind::D => "D",
            FeedbackKind::Ca => "CA",
            FeedbackKind::Hw => "HW",
        }
    }
}

// ==========================================
// DynamicField - tagged variant per category
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DynamicField {
    Attendance { month: Month, kind: AttendanceKind },
    Result { date: ExamDate, field: ResultField },
    ObjectivePattern { date: ExamDate, field: PatternField },
    SubjectivePattern { date: ExamDate, field: PatternField },
    BoardResult { date: ExamDate, field: BoardField },
    JeeAdvanced { date: ExamDate, field: JeeField },
    Feedback { subject: String, kind: FeedbackKind },
}

impl DynamicField {
    pub fn category(&self) -> FieldCategory {
        match self {
            DynamicField::Attendance { .. } => FieldCategory::Attendance,
            DynamicField::Result { .. } => FieldCategory::Result,
            DynamicField::ObjectivePattern { .. } => FieldCategory::ObjectivePattern,
            DynamicField::SubjectivePattern { .. } => FieldCategory::SubjectivePattern,
            DynamicField::BoardResult { .. } => FieldCategory::BoardResult,
            DynamicField::JeeAdvanced { .. } => FieldCategory::JeeAdvanced,
            DynamicField::Feedback { .. } => FieldCategory::Feedback,
        }
    }

    /// Exam date of a dated family
    pub fn exam_date(&self) -> Option<ExamDate> {
        match self {
            DynamicField::Result { date, .. }
            | DynamicField::ObjectivePattern { date, .. }
            | DynamicField::SubjectivePattern { date, .. }
            | DynamicField::BoardResult { date, .. }
            | DynamicField::JeeAdvanced { date, .. } => Some(*date),
            _ => None,
        }
    }
}

// ==========================================
// DynamicFieldDescriptor
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicFieldDescriptor {
    pub header: String,       // literal header
    pub column: usize,        // column index in the file
    pub period_label: String, // month or date token as written
    pub field: DynamicField,
}

impl DynamicFieldDescriptor {
    pub fn category(&self) -> FieldCategory {
        self.field.category()
    }
}
