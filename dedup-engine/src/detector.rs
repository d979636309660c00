use serde::{Deserialize, Serialize};
use shared_types::{DuplicateMatch, MatchType};

use crate::exact::find_exact_duplicates;
use crate::fuzzy::{find_fuzzy_duplicates_with, FuzzyThreshold};
use crate::merge::{suggest_primary, Completeness, PrimaryChoice};
use crate::reconcile::reconcile;
use crate::record::Dedupable;
use crate::similarity::similarity;

/// Knobs for the detection pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorOptions {
    pub fuzzy_threshold: FuzzyThreshold,
    pub fuzzy_enabled: bool,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            fuzzy_threshold: FuzzyThreshold::default(),
            fuzzy_enabled: true,
        }
    }
}

/// Outcome of checking one candidate against existing records: one entry
/// per distinct existing record, exact matches first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCheck<R> {
    pub matches: Vec<DuplicateMatch<R>>,
}

impl<R> DuplicateCheck<R> {
    /// Nothing found; creation can go ahead without asking
    pub fn is_clear(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn has_exact(&self) -> bool {
        self.matches.iter().any(DuplicateMatch::is_exact)
    }

    pub fn exact(&self) -> impl Iterator<Item = &DuplicateMatch<R>> {
        self.matches.iter().filter(|m| m.match_type == MatchType::Exact)
    }

    pub fn fuzzy(&self) -> impl Iterator<Item = &DuplicateMatch<R>> {
        self.matches.iter().filter(|m| m.match_type == MatchType::Fuzzy)
    }
}

/// Two records inside one snapshot that look like the same entity.
/// Indexes point into the scanned slice, `first < second`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatePair {
    pub first: usize,
    pub second: usize,
    pub match_type: MatchType,
    pub confidence: f64,
    pub suggested_primary: PrimaryChoice,
}

/// Runs exact and fuzzy detection and reconciles the results.
#[derive(Debug, Clone, Default)]
pub struct DuplicateDetector {
    options: DetectorOptions,
}

impl DuplicateDetector {
    pub fn new(options: DetectorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DetectorOptions {
        &self.options
    }

    /// Check a candidate before it is created or saved.
    pub fn check<R: Dedupable>(&self, candidate: &R, existing: &[R]) -> DuplicateCheck<R> {
        let exact = find_exact_duplicates(candidate, existing);
        let fuzzy = if self.options.fuzzy_enabled {
            find_fuzzy_duplicates_with(candidate, existing, self.options.fuzzy_threshold)
        } else {
            Vec::new()
        };

        let matches = reconcile(exact, fuzzy);
        if !matches.is_empty() {
            tracing::info!(
                kind = %candidate.kind(),
                candidate = candidate.match_name().unwrap_or_default(),
                matches = matches.len(),
                "potential duplicates found"
            );
        }

        DuplicateCheck { matches }
    }

    /// Every duplicate pair inside one snapshot, ordered by `first` then
    /// `second`. A pair that matches both ways is reported once, as exact.
    pub fn scan<R: Dedupable + Completeness>(&self, records: &[R]) -> Vec<DuplicatePair> {
        let keys: Vec<Option<String>> = records.iter().map(Dedupable::identity_key).collect();
        let mut pairs = Vec::new();

        for (i, first) in records.iter().enumerate() {
            for (j, second) in records.iter().enumerate().skip(i + 1) {
                if first.kind() != second.kind() || first.is_same_record(second) {
                    continue;
                }

                let found = if keys[i].is_some() && keys[i] == keys[j] {
                    Some((MatchType::Exact, 1.0))
                } else {
                    self.fuzzy_score(first, second)
                        .map(|score| (MatchType::Fuzzy, score))
                };

                if let Some((match_type, confidence)) = found {
                    pairs.push(DuplicatePair {
                        first: i,
                        second: j,
                        match_type,
                        confidence,
                        suggested_primary: suggest_primary(first, second),
                    });
                }
            }
        }

        tracing::debug!(
            records = records.len(),
            pairs = pairs.len(),
            "duplicate scan finished"
        );

        pairs
    }

    fn fuzzy_score<R: Dedupable>(&self, a: &R, b: &R) -> Option<f64> {
        if !self.options.fuzzy_enabled {
            return None;
        }
        let (Some(a), Some(b)) = (a.match_name(), b.match_name()) else {
            return None;
        };
        let score = similarity(a, b);
        (score >= self.options.fuzzy_threshold.value()).then_some(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Company, Contact, Record};

    #[test]
    fn test_check_new_contact_with_known_email() {
        let existing = vec![Contact::named("Jane Doe").with_id("c1").with_email("jane@acme.com")];
        let candidate = Contact::named("Jane Doe").with_email("jane@acme.com");

        let check = DuplicateDetector::default().check(&candidate, &existing);
        assert_eq!(check.matches.len(), 1);
        assert!(check.has_exact());
        assert_eq!(check.matches[0].record.id.as_deref(), Some("c1"));
        assert_eq!(check.matches[0].match_type, MatchType::Exact);
    }

    #[test]
    fn test_check_clear() {
        let existing = vec![Contact::named("Jane Doe").with_id("c1").with_email("jane@acme.com")];
        let candidate = Contact::named("Bob Stone").with_email("bob@stone.dev");

        let check = DuplicateDetector::default().check(&candidate, &existing);
        assert!(check.is_clear());
        assert!(!check.has_exact());
    }

    #[test]
    fn test_check_fuzzy_only() {
        let existing = vec![
            Contact::named("John Smith").with_id("c1").with_email("john@smith.io"),
            Contact::named("Jane Doe").with_id("c2").with_email("jane@acme.com"),
        ];
        let candidate = Contact::named("Jon Smith").with_email("jon@other.io");

        let check = DuplicateDetector::default().check(&candidate, &existing);
        assert_eq!(check.matches.len(), 1);
        assert_eq!(check.fuzzy().count(), 1);
        assert_eq!(check.exact().count(), 0);
    }

    #[test]
    fn test_fuzzy_can_be_disabled() {
        let existing = vec![Contact::named("John Smith").with_id("c1")];
        let detector = DuplicateDetector::new(DetectorOptions {
            fuzzy_enabled: false,
            ..Default::default()
        });
        assert!(detector.check(&Contact::named("Jon Smith"), &existing).is_clear());
    }

    #[test]
    fn test_scan_pairs() {
        let records = vec![
            Record::Contact(Contact::named("Jane Doe").with_id("c1").with_email("jane@acme.com")),
            Record::Contact(Contact::named("J. Doe").with_id("c2").with_email("JANE@acme.com")),
            Record::Contact(Contact::named("Jane Doe").with_id("c3")),
            Record::Company(Company::named("Jane Doe").with_id("co1")),
        ];

        let pairs = DuplicateDetector::default().scan(&records);
        let summary: Vec<_> = pairs
            .iter()
            .map(|p| (p.first, p.second, p.match_type))
            .collect();
        assert_eq!(
            summary,
            vec![(0, 1, MatchType::Exact), (0, 2, MatchType::Fuzzy)]
        );
        assert_eq!(pairs[1].suggested_primary, PrimaryChoice::First);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: DetectorOptions = serde_json::from_str(r#"{"fuzzy_threshold": 0.9}"#).unwrap();
        assert_eq!(options.fuzzy_threshold.value(), 0.9);
        assert!(options.fuzzy_enabled);
        assert!(serde_json::from_str::<DetectorOptions>(r#"{"fuzzy_threshold": -1}"#).is_err());
    }
}
