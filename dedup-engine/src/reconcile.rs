use shared_types::DuplicateMatch;
use std::collections::HashSet;

use crate::record::Dedupable;

/// Merge the exact and fuzzy result lists into one entry per existing record.
///
/// Exact matches come first, in their own order, and win over a fuzzy match
/// for the same record. Records are keyed by id, then by normalized email,
/// then (companies only) by resolved domain. A match with no key at all is
/// always kept.
pub fn reconcile<R: Dedupable>(
    exact: Vec<DuplicateMatch<R>>,
    fuzzy: Vec<DuplicateMatch<R>>,
) -> Vec<DuplicateMatch<R>> {
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(exact.len() + fuzzy.len());

    for found in exact.into_iter().chain(fuzzy) {
        match found.record.reconcile_key() {
            Some(key) => {
                if seen.insert(key) {
                    result.push(found);
                }
            }
            None => result.push(found),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Contact, MatchType};

    #[test]
    fn test_exact_wins_over_fuzzy() {
        let record = Contact::named("Jane Doe").with_id("c1").with_email("jane@acme.com");
        let exact = vec![DuplicateMatch::exact(record.clone())];
        let fuzzy = vec![DuplicateMatch::fuzzy(record, 1.0)];

        let merged = reconcile(exact, fuzzy);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].match_type, MatchType::Exact);
        assert_eq!(merged[0].confidence, 1.0);
    }

    #[test]
    fn test_order_exact_then_new_fuzzy() {
        let exact = vec![DuplicateMatch::exact(Contact::named("B").with_id("2"))];
        let fuzzy = vec![
            DuplicateMatch::fuzzy(Contact::named("A").with_id("1"), 0.9),
            DuplicateMatch::fuzzy(Contact::named("B").with_id("2"), 0.85),
            DuplicateMatch::fuzzy(Contact::named("C").with_id("3"), 0.82),
        ];

        let ids: Vec<_> = reconcile(exact, fuzzy)
            .into_iter()
            .map(|m| m.record.id.unwrap())
            .collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_email_fallback_for_unsaved_records() {
        let exact = vec![DuplicateMatch::exact(Contact::named("Jane").with_email("jane@acme.com"))];
        let fuzzy = vec![DuplicateMatch::fuzzy(
            Contact::named("Jane D").with_email(" JANE@acme.com"),
            0.83,
        )];
        assert_eq!(reconcile(exact, fuzzy).len(), 1);
    }

    #[test]
    fn test_keyless_matches_are_kept() {
        let fuzzy = vec![
            DuplicateMatch::fuzzy(Contact::named("Jane"), 0.9),
            DuplicateMatch::fuzzy(Contact::named("Jane"), 0.9),
        ];
        assert_eq!(reconcile(Vec::new(), fuzzy).len(), 2);
    }
}
