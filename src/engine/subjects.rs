// ==========================================
// PTM upload validator - subject / field whitelists
// ==========================================
// Per-family tables: canonical name, accepted spellings, role
// Lookups compare normalized tokens (lowercase, alphanumeric only)
// ==========================================

use crate::domain::header::{FeedbackKind, JeeAggregate, JeePaperPart};
use crate::engine::header_alias::normalize_header;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitelistEntry<R: Copy + 'static> {
    pub canonical: &'static str,
    pub spellings: &'static [&'static str],
    pub role: R,
}

/// Read-only view over one whitelist table
#[derive(Debug, Clone, Copy)]
pub struct Whitelist<R: Copy + 'static> {
    entries: &'static [WhitelistEntry<R>],
}

impl<R: Copy + 'static> Whitelist<R> {
    pub const fn new(entries: &'static [WhitelistEntry<R>]) -> Self {
        Self { entries }
    }

    /// Exact lookup of a token among all spellings
    pub fn lookup(&self, token: &str) -> Option<&'static WhitelistEntry<R>> {
        let normalized = normalize_header(token);
        if normalized.is_empty() {
            return None;
        }
        self.entries.iter().find(|entry| {
            entry
                .spellings
                .iter()
                .any(|s| normalize_header(s) == normalized)
        })
    }

    /// Entry the token is a prefix of (3+ characters), for "did you mean"
    pub fn suggest(&self, token: &str) -> Option<&'static WhitelistEntry<R>> {
        let normalized = normalize_header(token);
        if normalized.len() < 3 {
            return None;
        }
        self.entries.iter().find(|entry| {
            entry
                .spellings
                .iter()
                .any(|s| normalize_header(s).starts_with(&normalized))
        })
    }

    /// Canonical names, for "expected one of" hints
    pub fn canonical_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.canonical).collect()
    }
}

// ==========================================
// Result_<Date>_<Subject>
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultRole {
    Subject,
    Total,
    Rank,
    Highest,
    Abs,
}

pub const RESULT_FIELDS: Whitelist<ResultRole> = Whitelist::new(&[
    WhitelistEntry {
        canonical: "Physics",
        spellings: &["Physics", "Phy"],
        role: ResultRole::Subject,
    },
    WhitelistEntry {
        canonical: "Chemistry",
        spellings: &["Chemistry", "Chem"],
        role: ResultRole::Subject,
    },
    WhitelistEntry {
        canonical: "Mathematics",
        spellings: &["Mathematics", "Maths", "Math"],
        role: ResultRole::Subject,
    },
    WhitelistEntry {
        canonical: "Biology",
        spellings: &["Biology", "Bio"],
        role: ResultRole::Subject,
    },
    WhitelistEntry {
        canonical: "Total",
        spellings: &["Total", "Tot"],
        role: ResultRole::Total,
    },
    WhitelistEntry {
        canonical: "Rank",
        spellings: &["Rank"],
        role: ResultRole::Rank,
    },
    WhitelistEntry {
        canonical: "Highest_Marks",
        spellings: &["Highest_Marks", "High"],
        role: ResultRole::Highest,
    },
    WhitelistEntry {
        canonical: "Abs",
        spellings: &["Abs"],
        role: ResultRole::Abs,
    },
]);

// ==========================================
// Objective_Pattern / Subjective_Pattern
// ==========================================
// role = true for the total column
pub const OBJECTIVE_FIELDS: Whitelist<bool> = Whitelist::new(&[
    WhitelistEntry {
        canonical: "Phy",
        spellings: &["Phy", "Physics"],
        role: false,
    },
    WhitelistEntry {
        canonical: "Chem",
        spellings: &["Chem", "Chemistry"],
        role: false,
    },
    WhitelistEntry {
        canonical: "Maths",
        spellings: &["Maths", "Math", "Mathematics"],
        role: false,
    },
    WhitelistEntry {
        canonical: "Bio",
        spellings: &["Bio", "Biology"],
        role: false,
    },
    WhitelistEntry {
        canonical: "Total",
        spellings: &["Total"],
        role: true,
    },
]);

pub const SUBJECTIVE_FIELDS: Whitelist<bool> = Whitelist::new(&[
    WhitelistEntry {
        canonical: "Phy",
        spellings: &["Phy", "Physics"],
        role: false,
    },
    WhitelistEntry {
        canonical: "Chem",
        spellings: &["Chem", "Chemistry"],
        role: false,
    },
    WhitelistEntry {
        canonical: "Maths",
        spellings: &["Maths", "Math", "Mathematics"],
        role: false,
    },
    WhitelistEntry {
        canonical: "Bio",
        spellings: &["Bio", "Biology"],
        role: false,
    },
    WhitelistEntry {
        canonical: "Eng",
        spellings: &["Eng", "English"],
        role: false,
    },
    WhitelistEntry {
        canonical: "Total",
        spellings: &["Total"],
        role: true,
    },
]);

// ==========================================
// Board_Result_<Date>_<Subject>
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardRole {
    Subject,
    Rank,
    Highest,
}

pub const BOARD_FIELDS: Whitelist<BoardRole> = Whitelist::new(&[
    WhitelistEntry {
        canonical: "Physics",
        spellings: &["Physics", "Phy"],
        role: BoardRole::Subject,
    },
    WhitelistEntry {
        canonical: "Chemistry",
        spellings: &["Chemistry", "Chem"],
        role: BoardRole::Subject,
    },
    WhitelistEntry {
        canonical: "Mathematics",
        spellings: &["Mathematics", "Maths", "Math"],
        role: BoardRole::Subject,
    },
    WhitelistEntry {
        canonical: "Biology",
        spellings: &["Biology", "Bio"],
        role: BoardRole::Subject,
    },
    WhitelistEntry {
        canonical: "English",
        spellings: &["English", "Eng"],
        role: BoardRole::Subject,
    },
    WhitelistEntry {
        canonical: "Hindi",
        spellings: &["Hindi"],
        role: BoardRole::Subject,
    },
    WhitelistEntry {
        canonical: "Computer Science",
        spellings: &["Computer Science", "CS"],
        role: BoardRole::Subject,
    },
    WhitelistEntry {
        canonical: "Physical Education",
        spellings: &["Physical Education", "PE"],
        role: BoardRole::Subject,
    },
    WhitelistEntry {
        canonical: "Rank",
        spellings: &["Rank"],
        role: BoardRole::Rank,
    },
    WhitelistEntry {
        canonical: "Highest marks",
        spellings: &["Highest marks", "Highest"],
        role: BoardRole::Highest,
    },
]);

// ==========================================
// JEE_ADV_Result_...
// ==========================================
pub const JEE_PAPER_FIELDS: Whitelist<JeePaperPart> = Whitelist::new(&[
    WhitelistEntry {
        canonical: "Phy",
        spellings: &["Phy", "Physics"],
        role: JeePaperPart::Phy,
    },
    WhitelistEntry {
        canonical: "Chem",
        spellings: &["Chem", "Chemistry"],
        role: JeePaperPart::Chem,
    },
    WhitelistEntry {
        canonical: "Maths",
        spellings: &["Maths", "Math", "Mathematics"],
        role: JeePaperPart::Maths,
    },
    WhitelistEntry {
        canonical: "Total_Marks",
        spellings: &["Total_Marks", "Total"],
        role: JeePaperPart::TotalMarks,
    },
]);

pub const JEE_AGGREGATE_FIELDS: Whitelist<JeeAggregate> = Whitelist::new(&[
    WhitelistEntry {
        canonical: "Grand_Total",
        spellings: &["Grand_Total"],
        role: JeeAggregate::GrandTotal,
    },
    WhitelistEntry {
        canonical: "Rank",
        spellings: &["Rank"],
        role: JeeAggregate::Rank,
    },
    WhitelistEntry {
        canonical: "Highest_Marks",
        spellings: &["Highest_Marks", "High"],
        role: JeeAggregate::Highest,
    },
]);

// ==========================================
// Feedback <Subject>_<CR|D|CA|HW>
// ==========================================
pub const FEEDBACK_SUBJECTS: Whitelist<()> = Whitelist::new(&[
    WhitelistEntry {
        canonical: "Physics",
        spellings: &["Physics", "Phy"],
        role: (),
    },
    WhitelistEntry {
        canonical: "Physical Chemistry",
        spellings: &["Physical Chemistry", "PC"],
        role: (),
    },
    WhitelistEntry {
        canonical: "Organic Chemistry",
        spellings: &["Organic Chemistry", "OC"],
        role: (),
    },
    WhitelistEntry {
        canonical: "Inorganic Chemistry",
        spellings: &["Inorganic Chemistry", "IOC"],
        role: (),
    },
    WhitelistEntry {
        canonical: "Chemistry",
        spellings: &["Chemistry", "Chem"],
        role: (),
    },
    WhitelistEntry {
        canonical: "Mathematics",
        spellings: &["Mathematics", "Maths", "Math"],
        role: (),
    },
    WhitelistEntry {
        canonical: "Biology",
        spellings: &["Biology", "Bio"],
        role: (),
    },
    WhitelistEntry {
        canonical: "Botany",
        spellings: &["Botany"],
        role: (),
    },
    WhitelistEntry {
        canonical: "Zoology",
        spellings: &["Zoology"],
        role: (),
    },
    WhitelistEntry {
        canonical: "English",
        spellings: &["English"],
        role: (),
    },
    WhitelistEntry {
        canonical: "Total",
        spellings: &["Total"],
        role: (),
    },
]);

pub const FEEDBACK_KINDS: Whitelist<FeedbackKind> = Whitelist::new(&[
    WhitelistEntry {
        canonical: "CR",
        spellings: &["CR"],
        role: FeedbackKind::Cr,
    },
    WhitelistEntry {
        canonical: "D",
        spellings: &["D"],
        role: FeedbackKind::D,
    },
    WhitelistEntry {
        canonical: "CA",
        spellings: &["CA"],
        role: FeedbackKind::Ca,
    },
    WhitelistEntry {
        canonical: "HW",
        spellings: &["HW"],
        role: FeedbackKind::Hw,
    },
]);
