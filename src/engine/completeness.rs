// ==========================================
// PTM upload validator - header set completeness
// ==========================================
// Attendance: per month, all of base/_P/_A/_Per
// Result: per date, >=1 subject + Total + Rank + Highest_Marks
// JEE Advanced: per date, both papers (4 parts each) + 3 aggregates
// ==========================================

use crate::domain::header::{
    AttendanceKind, DynamicField, DynamicFieldDescriptor, ExamDate, JeeAggregate, JeeField,
    JeePaperPart, ResultField,
};
use crate::domain::issue::ValidationIssue;
use crate::domain::types::{IssueCode, Month};
use std::collections::{BTreeMap, HashSet};

/// Run every header-level completeness check
pub fn check_completeness(
    descriptors: &[DynamicFieldDescriptor],
    issues: &mut Vec<ValidationIssue>,
) {
    check_attendance_sets(descriptors, issues);
    check_result_sets(descriptors, issues);
    check_jee_sets(descriptors, issues);
}

/// Group descriptors by period; the label is the first spelling seen
fn group_by<K: Ord, V>(
    descriptors: &[DynamicFieldDescriptor],
    select: impl Fn(&DynamicField) -> Option<(K, V)>,
) -> BTreeMap<K, (String, Vec<V>)> {
    let mut groups: BTreeMap<K, (String, Vec<V>)> = BTreeMap::new();
    for descriptor in descriptors {
        if let Some((key, value)) = select(&descriptor.field) {
            groups
                .entry(key)
                .or_insert_with(|| (descriptor.period_label.clone(), Vec::new()))
                .1
                .push(value);
        }
    }
    groups
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("\"{}\"", n))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn check_attendance_sets(
    descriptors: &[DynamicFieldDescriptor],
    issues: &mut Vec<ValidationIssue>,
) {
    let groups: BTreeMap<Month, (String, Vec<AttendanceKind>)> = group_by(descriptors, |field| {
        match field {
            DynamicField::Attendance { month, kind } => Some((*month, *kind)),
            _ => None,
        }
    });

    for (month, (label, present)) in groups {
        let present: HashSet<AttendanceKind> = present.into_iter().collect();
        let missing: Vec<String> = AttendanceKind::ALL
            .iter()
            .filter(|kind| !present.contains(*kind))
            .map(|kind| format!("Attendance_{}{}", label, kind.suffix()))
            .collect();

        if !missing.is_empty() {
            issues.push(
                ValidationIssue::error(
                    IssueCode::IncompleteAttendanceSet,
                    format!(
                        "Attendance for {} is incomplete, missing {}",
                        month.full_name(),
                        quoted(&missing)
                    ),
                )
                .with_hint(format!("Add the columns {}", quoted(&missing))),
            );
        }
    }
}

pub fn check_result_sets(descriptors: &[DynamicFieldDescriptor], issues: &mut Vec<ValidationIssue>) {
    let groups: BTreeMap<ExamDate, (String, Vec<ResultField>)> =
        group_by(descriptors, |field| match field {
            DynamicField::Result { date, field } => Some((*date, field.clone())),
            _ => None,
        });

    for (date, (label, fields)) in groups {
        let mut missing = Vec::new();
        if !fields.iter().any(|f| matches!(f, ResultField::Subject(_))) {
            missing.push(format!("Result_{}_<Subject>", label));
        }
        for (required, token) in [
            (ResultField::Total, "Total"),
            (ResultField::Rank, "Rank"),
            (ResultField::Highest, "Highest_Marks"),
        ] {
            if !fields.contains(&required) {
                missing.push(format!("Result_{}_{}", label, token));
            }
        }

        if !missing.is_empty() {
            issues.push(
                ValidationIssue::error(
                    IssueCode::IncompleteResultSet,
                    format!("Result for {} is incomplete, missing {}", date, quoted(&missing)),
                )
                .with_hint(format!("Add the columns {}", quoted(&missing))),
            );
        }
    }
}

pub fn check_jee_sets(descriptors: &[DynamicFieldDescriptor], issues: &mut Vec<ValidationIssue>) {
    let groups: BTreeMap<ExamDate, (String, Vec<JeeField>)> =
        group_by(descriptors, |field| match field {
            DynamicField::JeeAdvanced { date, field } => Some((*date, *field)),
            _ => None,
        });

    for (date, (label, fields)) in groups {
        let present: HashSet<JeeField> = fields.into_iter().collect();
        let mut missing = Vec::new();

        for paper in 1..=2u8 {
            for part in JeePaperPart::ALL {
                if !present.contains(&JeeField::Paper { paper, part }) {
                    missing.push(format!(
                        "JEE_ADV_Result_Paper {}_Result_{}_{}",
                        paper,
                        label,
                        part.token()
                    ));
                }
            }
        }
        for aggregate in JeeAggregate::ALL {
            if !present.contains(&JeeField::Aggregate(aggregate)) {
                missing.push(format!("JEE_ADV_Result_{}_{}", label, aggregate.token()));
            }
        }

        if !missing.is_empty() {
            issues.push(
                ValidationIssue::error(
                    IssueCode::IncompleteResultSet,
                    format!(
                        "JEE Advanced result for {} is incomplete, missing {}",
                        date,
                        quoted(&missing)
                    ),
                )
                .with_hint(format!("Add the columns {}", quoted(&missing))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::header_matcher::{default_chain, MatchOutcome};

    fn describe(headers: &[&str]) -> Vec<DynamicFieldDescriptor> {
        let chain = default_chain();
        headers
            .iter()
            .enumerate()
            .filter_map(|(column, header)| {
                chain.iter().find_map(|m| match m.try_match(header, column) {
                    MatchOutcome::Claimed(d) => Some(d),
                    _ => None,
                })
            })
            .collect()
    }

    #[test]
    fn test_attendance_set_lists_missing_columns() {
        let mut issues = Vec::new();
        check_attendance_sets(
            &describe(&["Attendance_Mar", "Attendance_Mar_P"]),
            &mut issues,
        );

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::IncompleteAttendanceSet);
        assert!(issues[0].message.contains("\"Attendance_Mar_A\""));
        assert!(issues[0].message.contains("\"Attendance_Mar_Per\""));
    }

    #[test]
    fn test_complete_attendance_set_has_no_issue() {
        let mut issues = Vec::new();
        check_attendance_sets(
            &describe(&[
                "Attendance_Sept",
                "Attendance_Sep_P",
                "Attendance_Sep_A",
                "Attendance_Sep_Per",
            ]),
            &mut issues,
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_result_set_requires_total_rank_highest() {
        let mut issues = Vec::new();
        check_result_sets(
            &describe(&["Result_07 Jul_Physics", "Result_07 Jul_Total"]),
            &mut issues,
        );

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("Result_07 Jul_Rank"));
        assert!(issues[0].message.contains("Result_07 Jul_Highest_Marks"));
        assert!(!issues[0].message.contains("<Subject>"));
    }

    #[test]
    fn test_jee_set_lists_every_gap() {
        let mut headers: Vec<String> = Vec::new();
        for paper in 1..=2 {
            for part in ["Phy", "Chem", "Maths", "Total_Marks"] {
                headers.push(format!("JEE_ADV_Result_Paper {}_Result_07 Jul_{}", paper, part));
            }
        }
        headers.push("JEE_ADV_Result_07 Jul_Grand_Total".to_string());
        headers.push("JEE_ADV_Result_07 Jul_Rank".to_string());

        let refs: Vec<&str> = headers.iter().map(String::as_str).collect();
        let mut issues = Vec::new();
        check_jee_sets(&describe(&refs), &mut issues);

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("JEE_ADV_Result_07 Jul_Highest_Marks"));
        assert!(!issues[0].message.contains("Paper"));
    }
}
