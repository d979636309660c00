use shared_types::DuplicateMatch;

use crate::record::Dedupable;

/// Existing records that share the candidate's identity key.
///
/// Contacts match on normalized email, companies on resolved domain. A record
/// of a different kind, a record with the candidate's own id, and any record
/// without a key are skipped. Results keep the order of `existing`.
pub fn find_exact_duplicates<R: Dedupable>(candidate: &R, existing: &[R]) -> Vec<DuplicateMatch<R>> {
    let Some(key) = candidate.identity_key() else {
        return Vec::new();
    };

    let matches: Vec<DuplicateMatch<R>> = existing
        .iter()
        .filter(|record| record.kind() == candidate.kind())
        .filter(|record| !record.is_same_record(candidate))
        .filter(|record| record.identity_key().as_deref() == Some(key.as_str()))
        .map(|record| DuplicateMatch::exact(record.clone()))
        .collect();

    tracing::debug!(
        kind = %candidate.kind(),
        key = %key,
        matches = matches.len(),
        "exact duplicate lookup"
    );

    matches
}
