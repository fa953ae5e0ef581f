// ==========================================
// PTM upload validator - header resolution
// ==========================================
// Step 1: bind canonical fields (alias table, first column wins)
// Step 2: duplicate spellings of a bound field -> INVALID_HEADER_VARIATION warning
// Step 3: remaining headers -> dynamic matcher chain
// Step 4: missing required fields -> MISSING_HEADERS, near misses flagged
// ==========================================

use crate::domain::header::{DynamicFieldDescriptor, HeaderMap};
use crate::domain::issue::ValidationIssue;
use crate::domain::types::IssueCode;
use crate::engine::header_alias::{normalize_header, HeaderAliasTable};
use crate::engine::header_matcher::{default_chain, HeaderMatcher, MatchOutcome};
use tracing::{debug, instrument};

/// Output of header resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderResolution {
    pub header_map: HeaderMap,
    pub descriptors: Vec<DynamicFieldDescriptor>,
    pub unclassified: Vec<String>,
}

pub struct HeaderResolver {
    aliases: HeaderAliasTable,
    matchers: Vec<Box<dyn HeaderMatcher>>,
}

impl HeaderResolver {
    pub fn new(aliases: HeaderAliasTable) -> Self {
        Self {
            aliases,
            matchers: default_chain(),
        }
    }

    pub fn aliases(&self) -> &HeaderAliasTable {
        &self.aliases
    }

    /// Resolve the literal header row
    ///
    /// # Arguments
    /// - headers: first row of the file, in column order
    /// - issues: shared issue accumulator
    ///
    /// # Returns
    /// HeaderMap + dynamic field descriptors + headers no family claimed
    #[instrument(skip(self, headers, issues), fields(headers = headers.len()))]
    pub fn resolve(
        &self,
        headers: &[String],
        issues: &mut Vec<ValidationIssue>,
    ) -> HeaderResolution {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let mut resolution = HeaderResolution::default();
        let mut handled = vec![false; headers.len()];

        // ===== Step 1: canonical fields =====
        for field in self.aliases.fields() {
            let hit = normalized
                .iter()
                .enumerate()
                .find(|(column, n)| !handled[*column] && field.matches(n));
            if let Some((column, _)) = hit {
                resolution.header_map.bind(&field.key, &headers[column], column);
                handled[column] = true;
            }
        }

        // ===== Step 2: second spelling of an already-bound field =====
        for (column, header) in headers.iter().enumerate() {
            if handled[column] {
                continue;
            }
            let field = match self.aliases.field_for(&normalized[column]) {
                Some(field) => field,
                None => continue,
            };
            if let Some(binding) = resolution.header_map.get(&field.key) {
                issues.push(
                    ValidationIssue::warning(
                        IssueCode::InvalidHeaderVariation,
                        format!(
                            "Column \"{}\" repeats \"{}\"; only the first one is read",
                            header, binding.header
                        ),
                    )
                    .in_column(header.as_str())
                    .with_hint(format!("Remove or rename the duplicate \"{}\" column", header)),
                );
                handled[column] = true;
            }
        }

        // ===== Step 3: dynamic families =====
        let mut unclassified_columns = Vec::new();
        for (column, header) in headers.iter().enumerate() {
            if handled[column] || header.trim().is_empty() {
                continue;
            }
            match self.classify(header, column) {
                MatchOutcome::Claimed(descriptor) => resolution.descriptors.push(descriptor),
                MatchOutcome::Malformed(issue) => issues.push(issue),
                MatchOutcome::Declined => unclassified_columns.push(column),
            }
        }

        // ===== Step 4: required fields =====
        let missing: Vec<_> = self
            .aliases
            .required_fields()
            .filter(|f| !resolution.header_map.contains_key(&f.key))
            .collect();

        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.preferred_alias()).collect();
            issues.push(
                ValidationIssue::error(
                    IssueCode::MissingHeaders,
                    format!("Missing required columns: {}", names.join(", ")),
                )
                .with_hint(format!("Add columns named: {}", names.join(", "))),
            );

            for field in &missing {
                let near_miss = unclassified_columns
                    .iter()
                    .position(|&column| field.resembles(&normalized[column]));
                if let Some(pos) = near_miss {
                    let column = unclassified_columns.remove(pos);
                    issues.push(
                        ValidationIssue::error(
                            IssueCode::InvalidHeaderVariation,
                            format!(
                                "Column \"{}\" looks like \"{}\" but is not an accepted spelling",
                                headers[column],
                                field.preferred_alias()
                            ),
                        )
                        .in_column(headers[column].as_str())
                        .with_hint(format!(
                            "Rename \"{}\" to \"{}\"",
                            headers[column],
                            field.preferred_alias()
                        )),
                    );
                }
            }
        }

        resolution.unclassified = unclassified_columns
            .into_iter()
            .map(|column| headers[column].clone())
            .collect();

        debug!(
            bound = resolution.header_map.len(),
            dynamic = resolution.descriptors.len(),
            unclassified = resolution.unclassified.len(),
            "headers resolved"
        );
        resolution
    }

    fn classify(&self, header: &str, column: usize) -> MatchOutcome {
        for matcher in &self.matchers {
            match matcher.try_match(header, column) {
                MatchOutcome::Declined => continue,
                outcome => return outcome,
            }
        }
        MatchOutcome::Declined
    }
}

impl Default for HeaderResolver {
    fn default() -> Self {
        Self::new(HeaderAliasTable::standard())
    }
}
