use serde::{Deserialize, Serialize};
use shared_types::DuplicateMatch;

use crate::error::DedupError;
use crate::record::Dedupable;
use crate::similarity::similarity_opt;

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

/// Minimum name similarity for a fuzzy match. Always a finite value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FuzzyThreshold(f64);

impl FuzzyThreshold {
    pub fn new(value: f64) -> Result<Self, DedupError> {
        if !value.is_finite() {
            return Err(DedupError::InvalidArgument(format!(
                "fuzzy threshold must be a finite number, got {value}"
            )));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(DedupError::InvalidArgument(format!(
                "fuzzy threshold must be between 0 and 1, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for FuzzyThreshold {
    fn default() -> Self {
        Self(DEFAULT_FUZZY_THRESHOLD)
    }
}

impl TryFrom<f64> for FuzzyThreshold {
    type Error = DedupError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FuzzyThreshold> for f64 {
    fn from(threshold: FuzzyThreshold) -> Self {
        threshold.0
    }
}

/// Existing records whose name is at least `threshold` similar to the
/// candidate's. Rejects a threshold outside `[0, 1]`.
pub fn find_fuzzy_duplicates<R: Dedupable>(
    candidate: &R,
    existing: &[R],
    threshold: f64,
) -> Result<Vec<DuplicateMatch<R>>, DedupError> {
    let threshold = FuzzyThreshold::new(threshold)?;
    Ok(find_fuzzy_duplicates_with(candidate, existing, threshold))
}

/// Infallible core of [`find_fuzzy_duplicates`] for an already validated
/// threshold. A candidate without a name matches nothing.
pub fn find_fuzzy_duplicates_with<R: Dedupable>(
    candidate: &R,
    existing: &[R],
    threshold: FuzzyThreshold,
) -> Vec<DuplicateMatch<R>> {
    let Some(name) = candidate.match_name() else {
        return Vec::new();
    };

    let mut matches = Vec::new();
    for record in existing {
        if record.kind() != candidate.kind() || record.is_same_record(candidate) {
            continue;
        }

        let score = similarity_opt(Some(name), record.match_name());
        tracing::trace!(
            candidate = name,
            existing = record.match_name().unwrap_or_default(),
            score,
            "name similarity"
        );

        if score >= threshold.value() {
            matches.push(DuplicateMatch::fuzzy(record.clone(), score));
        }
    }

    tracing::debug!(
        kind = %candidate.kind(),
        threshold = threshold.value(),
        matches = matches.len(),
        "fuzzy duplicate lookup"
    );

    matches
}
