// ==========================================
// PTM upload validator - report rendering
// ==========================================
// Plain-text view of a ValidationReport, labels via i18n
// Issue messages are shown as produced by the engine
// ==========================================

use crate::domain::issue::{ValidationIssue, ValidationReport};
use crate::i18n::{t, t_with_args};
use std::fmt::Write;

/// Render the report for a terminal in the current locale
pub fn render_text(report: &ValidationReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    let _ = writeln!(out, "{}", t_with_args("report.title", &[("file", &report.file_name)]));
    let _ = writeln!(
        out,
        "{}",
        t_with_args(
            "report.rows",
            &[
                ("total", &summary.total_rows.to_string()),
                ("valid", &summary.valid_rows.to_string()),
                ("empty", &summary.empty_rows.to_string()),
            ],
        )
    );
    let _ = writeln!(
        out,
        "{}",
        t_with_args(
            "report.counts",
            &[
                ("errors", &summary.error_count.to_string()),
                ("warnings", &summary.warning_count.to_string()),
            ],
        )
    );

    let errors: Vec<&ValidationIssue> = report.errors().collect();
    if !errors.is_empty() {
        let _ = writeln!(out, "\n{}:", t("report.errors"));
        for issue in errors {
            let _ = writeln!(out, "  {}", render_issue(issue));
        }
    }

    let warnings: Vec<&ValidationIssue> = report.warnings().collect();
    if !warnings.is_empty() {
        let _ = writeln!(out, "\n{}:", t("report.warnings"));
        for issue in warnings {
            let _ = writeln!(out, "  {}", render_issue(issue));
        }
    }

    if !report.unclassified.is_empty() {
        let _ = writeln!(
            out,
            "\n{}",
            t_with_args(
                "report.unclassified",
                &[("columns", &report.unclassified.join(", "))]
            )
        );
    }

    let status = if !report.can_submit() {
        "report.status_blocked"
    } else if report.requires_confirmation() {
        "report.status_confirm"
    } else {
        "report.status_ready"
    };
    let _ = writeln!(out, "\n{}", t(status));

    out
}

/// `[CODE] message (row 3, column "Name") fix: ...`
pub fn render_issue(issue: &ValidationIssue) -> String {
    let mut line = format!("[{}] {}", issue.code, issue.message);

    let mut location = Vec::new();
    if let Some(row) = issue.row {
        location.push(t_with_args("report.row", &[("row", &row.to_string())]));
    }
    if let Some(column) = &issue.column {
        location.push(t_with_args("report.column", &[("column", column)]));
    }
    if !location.is_empty() {
        let _ = write!(line, " ({})", location.join(", "));
    }

    if let Some(hint) = &issue.fix_hint {
        let _ = write!(line, " {}", t_with_args("report.hint", &[("hint", hint)]));
    }
    line
}
