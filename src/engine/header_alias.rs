// ==========================================
// PTM upload validator - header alias table
// ==========================================
// Canonical field key -> accepted literal spellings
// Adding a spelling is a data change in DEFAULT_ALIASES
// (or a header_alias/<key> config entry), never a code change
// ==========================================

use std::collections::BTreeMap;
use tracing::warn;

/// Canonical key of the roll-number column (duplicate detection key)
pub const ROLL_NO_KEY: &str = "rollno";

struct AliasEntry {
    key: &'static str,
    required: bool,
    aliases: &'static [&'static str], // first entry = preferred spelling
}

const DEFAULT_ALIASES: &[AliasEntry] = &[
    AliasEntry {
        key: "name",
        required: true,
        aliases: &["Name", "NAME", "Student Name"],
    },
    AliasEntry {
        key: ROLL_NO_KEY,
        required: true,
        aliases: &["ROLL NO", "Roll No", "Roll Number", "ROLLNO", "RollNo"],
    },
    AliasEntry {
        key: "batch",
        required: true,
        aliases: &["Batch", "BATCH"],
    },
    AliasEntry {
        key: "strength",
        required: true,
        aliases: &["Strength", "STRENGTH"],
    },
    AliasEntry {
        key: "mothername",
        required: false,
        aliases: &["M_N", "Mother Name", "MotherName"],
    },
    AliasEntry {
        key: "fathername",
        required: false,
        aliases: &["F_N", "Father Name", "FatherName"],
    },
    AliasEntry {
        key: "studentcontactnumber",
        required: false,
        aliases: &["Students Contact No.", "Student Contact No.", "StudentContactNo"],
    },
    AliasEntry {
        key: "fathercontactnumber",
        required: false,
        aliases: &["Father Contact No.", "Father Contact Number", "FatherContactNo"],
    },
    AliasEntry {
        key: "mothercontactnumber",
        required: false,
        aliases: &["Mother Contact No.", "Mother Contact Number", "MotherContactNo"],
    },
];

/// Lowercase and drop every non-alphanumeric character
///
/// "Roll No." / "ROLL_NO" / "rollno" all normalize to "rollno".
pub fn normalize_header(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ==========================================
// CanonicalField
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalField {
    pub key: String,
    pub required: bool,
    pub aliases: Vec<String>,
    normalized: Vec<String>,
}

impl CanonicalField {
    fn new(key: &str, required: bool, aliases: Vec<String>) -> Self {
        let normalized = aliases.iter().map(|a| normalize_header(a)).collect();
        Self {
            key: key.to_string(),
            required,
            aliases,
            normalized,
        }
    }

    /// Spelling suggested when the column is missing
    pub fn preferred_alias(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or(&self.key)
    }

    /// Does an already-normalized header spell this field?
    pub fn matches(&self, normalized_header: &str) -> bool {
        !normalized_header.is_empty() && self.normalized.iter().any(|a| a == normalized_header)
    }

    /// Does a normalized header embed one of this field's spellings?
    pub fn resembles(&self, normalized_header: &str) -> bool {
        self.normalized
            .iter()
            .any(|a| !a.is_empty() && normalized_header.contains(a.as_str()))
    }

    fn add_alias(&mut self, alias: &str) {
        let normalized = normalize_header(alias);
        if normalized.is_empty() || self.normalized.contains(&normalized) {
            return;
        }
        self.aliases.push(alias.to_string());
        self.normalized.push(normalized);
    }
}

// ==========================================
// HeaderAliasTable
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderAliasTable {
    fields: Vec<CanonicalField>,
}

impl HeaderAliasTable {
    /// Built-in alias table
    pub fn standard() -> Self {
        let fields = DEFAULT_ALIASES
            .iter()
            .map(|entry| {
                CanonicalField::new(
                    entry.key,
                    entry.required,
                    entry.aliases.iter().map(|a| a.to_string()).collect(),
                )
            })
            .collect();
        Self { fields }
    }

    /// Append configured spellings to known keys
    ///
    /// Unknown keys are skipped: configuration may widen the accepted
    /// spellings but cannot invent new canonical fields.
    pub fn with_extra_aliases(mut self, extra: &BTreeMap<String, Vec<String>>) -> Self {
        for (key, aliases) in extra {
            match self.fields.iter_mut().find(|f| &f.key == key) {
                Some(field) => {
                    for alias in aliases {
                        field.add_alias(alias);
                    }
                }
                None => warn!(key = %key, "ignoring aliases for unknown header key"),
            }
        }
        self
    }

    pub fn fields(&self) -> &[CanonicalField] {
        &self.fields
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &CanonicalField> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn field(&self, key: &str) -> Option<&CanonicalField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// First field (in table order) that a normalized header spells
    pub fn field_for(&self, normalized_header: &str) -> Option<&CanonicalField> {
        self.fields.iter().find(|f| f.matches(normalized_header))
    }
}

impl Default for HeaderAliasTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Roll No."), "rollno");
        assert_eq!(normalize_header(" ROLL_NO "), "rollno");
        assert_eq!(normalize_header("Students Contact No."), "studentscontactno");
        assert_eq!(normalize_header("__"), "");
    }

    #[test]
    fn test_standard_table_required_keys() {
        let table = HeaderAliasTable::standard();
        let required: Vec<&str> = table.required_fields().map(|f| f.key.as_str()).collect();
        assert_eq!(required, vec!["name", "rollno", "batch", "strength"]);
        assert_eq!(table.field(ROLL_NO_KEY).unwrap().preferred_alias(), "ROLL NO");
    }

    #[test]
    fn test_field_for_matches_spelling_variants() {
        let table = HeaderAliasTable::standard();
        assert_eq!(table.field_for(&normalize_header("Roll Number")).unwrap().key, "rollno");
        assert_eq!(table.field_for(&normalize_header("Mother_Name")).unwrap().key, "mothername");
        assert!(table.field_for(&normalize_header("Section")).is_none());
    }

    #[test]
    fn test_extra_aliases_extend_known_keys_only() {
        let mut extra = BTreeMap::new();
        extra.insert("rollno".to_string(), vec!["Admission No".to_string()]);
        extra.insert("house".to_string(), vec!["House".to_string()]);

        let table = HeaderAliasTable::standard().with_extra_aliases(&extra);
        assert_eq!(table.field_for("admissionno").unwrap().key, "rollno");
        assert!(table.field("house").is_none());
    }
}
