// ==========================================
// PTM upload validator - month / exam date tokens
// ==========================================
// Attendance month: short form (Jan..Dec, "Sept" accepted)
// Exam date: "DD Mon" (one space) or a 4-digit year
// Day validity is checked against a leap reference year,
// so "29 Feb" is always accepted
// ==========================================

use crate::domain::header::ExamDate;
use crate::domain::types::Month;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

const LEAP_REFERENCE_YEAR: i32 = 2024;

lazy_static! {
    static ref DAY_MONTH: Regex = Regex::new(r"^(\d{1,2}) ([A-Za-z]+)$").unwrap();
    static ref DAY_MONTH_LOOSE: Regex = Regex::new(r"^(\d{1,2})\s*([A-Za-z]+)$").unwrap();
    static ref YEAR: Regex = Regex::new(r"^\d{4}$").unwrap();
}

// ==========================================
// Month tokens
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthToken {
    /// Accepted short form ("Mar", "Sept")
    Short(Month),
    /// Full month name ("March"), rejected with a fix
    FullName(Month),
    Unknown,
}

/// Classify a month token (case-insensitive)
pub fn parse_month_token(token: &str) -> MonthToken {
    let lower = token.trim().to_ascii_lowercase();
    if lower == "sept" {
        return MonthToken::Short(Month::Sep);
    }
    for month in Month::ALL {
        if lower == month.short_name().to_ascii_lowercase() {
            return MonthToken::Short(month);
        }
    }
    for month in Month::ALL {
        if lower == month.full_name().to_ascii_lowercase() {
            return MonthToken::FullName(month);
        }
    }
    MonthToken::Unknown
}

/// Best-effort month guess for fix suggestions
///
/// Short forms, full names and any 3+ letter prefix of a full name.
pub fn guess_month(token: &str) -> Option<Month> {
    match parse_month_token(token) {
        MonthToken::Short(m) | MonthToken::FullName(m) => Some(m),
        MonthToken::Unknown => {
            let lower = token.trim().to_ascii_lowercase();
            if lower.len() < 3 {
                return None;
            }
            Month::ALL
                .into_iter()
                .find(|m| m.full_name().to_ascii_lowercase().starts_with(&lower))
        }
    }
}

/// Number of days in a month (February counts 29)
pub fn days_in_month(month: Month) -> u32 {
    (28..=31)
        .rev()
        .find(|day| NaiveDate::from_ymd_opt(LEAP_REFERENCE_YEAR, month.number(), *day).is_some())
        .unwrap_or(28)
}

// ==========================================
// Exam dates
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTokenError {
    pub reason: String,
    /// Corrected token when one can be derived ("07July" -> "07 Jul")
    pub suggestion: Option<String>,
}

impl DateTokenError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            suggestion: None,
        }
    }

    fn suggest(mut self, token: String) -> Self {
        self.suggestion = Some(token);
        self
    }
}

/// Parse an exam date token
///
/// # Arguments
/// - token: "07 Jul", "7 Jul" or "2024"
///
/// # Returns
/// - Ok(ExamDate)
/// - Err(DateTokenError): reason plus a corrected token where possible
pub fn parse_exam_date(token: &str) -> Result<ExamDate, DateTokenError> {
    let token = token.trim();

    if YEAR.is_match(token) {
        return token
            .parse::<i32>()
            .map(ExamDate::Year)
            .map_err(|_| DateTokenError::new(format!("\"{}\" is not a valid year", token)));
    }

    if let Some(caps) = DAY_MONTH.captures(token) {
        let day: u32 = caps[1].parse().unwrap_or(0);
        return match parse_month_token(&caps[2]) {
            MonthToken::Short(month) => check_day(day, month),
            MonthToken::FullName(month) => Err(DateTokenError::new(format!(
                "\"{}\" uses a full month name",
                token
            ))
            .suggest(format!("{:02} {}", day, month))),
            MonthToken::Unknown => Err(DateTokenError::new(format!(
                "\"{}\" is not a recognized month",
                &caps[2]
            ))),
        };
    }

    // "07July", "07Jul", "07  Jul": digits and letters not separated by exactly one space
    if let Some(caps) = DAY_MONTH_LOOSE.captures(token) {
        let day: u32 = caps[1].parse().unwrap_or(0);
        let err = DateTokenError::new(format!(
            "\"{}\" must be written as day, one space, short month",
            token
        ));
        return match guess_month(&caps[2]) {
            Some(month) if (1..=days_in_month(month)).contains(&day) => {
                Err(err.suggest(format!("{:02} {}", day, month)))
            }
            _ => Err(err),
        };
    }

    Err(DateTokenError::new(format!(
        "\"{}\" is not a date; expected \"DD Mon\" (e.g. 07 Jul) or a 4-digit year",
        token
    )))
}

fn check_day(day: u32, month: Month) -> Result<ExamDate, DateTokenError> {
    let valid = day >= 1
        && NaiveDate::from_ymd_opt(LEAP_REFERENCE_YEAR, month.number(), day).is_some();
    if valid {
        Ok(ExamDate::Day { day, month })
    } else {
        Err(DateTokenError::new(format!(
            "{} has no day {} ({} has {} days)",
            month.full_name(),
            day,
            month.full_name(),
            days_in_month(month)
        )))
    }
}
