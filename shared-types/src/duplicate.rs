use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// How a duplicate was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum MatchType {
    /// Same email (contacts) or same domain (companies)
    Exact,
    /// Names are close by edit distance
    Fuzzy,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchType::Exact => write!(f, "exact"),
            MatchType::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// An existing record that looks like a duplicate of a candidate.
///
/// `confidence` is 1.0 for exact matches and equals `similarity` for fuzzy
/// ones. `similarity` is only present on fuzzy matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateMatch<R> {
    pub record: R,
    pub match_type: MatchType,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

impl<R> DuplicateMatch<R> {
    pub fn exact(record: R) -> Self {
        Self {
            record,
            match_type: MatchType::Exact,
            confidence: 1.0,
            similarity: None,
        }
    }

    pub fn fuzzy(record: R, similarity: f64) -> Self {
        Self {
            record,
            match_type: MatchType::Fuzzy,
            confidence: similarity,
            similarity: Some(similarity),
        }
    }

    pub fn is_exact(&self) -> bool {
        self.match_type == MatchType::Exact
    }
}

/// Entities elsewhere in the workspace that may point at a merged record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum RelatedEntity {
    Contacts,
    Deals,
    Projects,
    Tasks,
    Invoices,
    Contracts,
}

impl RelatedEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelatedEntity::Contacts => "contacts",
            RelatedEntity::Deals => "deals",
            RelatedEntity::Projects => "projects",
            RelatedEntity::Tasks => "tasks",
            RelatedEntity::Invoices => "invoices",
            RelatedEntity::Contracts => "contracts",
        }
    }
}

impl fmt::Display for RelatedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelatedEntity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contacts" | "contact" => Ok(RelatedEntity::Contacts),
            "deals" | "deal" => Ok(RelatedEntity::Deals),
            "projects" | "project" => Ok(RelatedEntity::Projects),
            "tasks" | "task" => Ok(RelatedEntity::Tasks),
            "invoices" | "invoice" => Ok(RelatedEntity::Invoices),
            "contracts" | "contract" => Ok(RelatedEntity::Contracts),
            other => Err(format!("unknown related entity: {other}")),
        }
    }
}

/// Counts of related entities, supplied by the caller and shown as-is
pub type RelatedRecordCounts = BTreeMap<RelatedEntity, u64>;

/// What a merge of `secondary` into `primary` would change.
///
/// `merged` carries the primary's id and every computed field;
/// `fields_to_update` lists, in declaration order, the fields where `merged`
/// differs from `primary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MergePreview<R> {
    pub primary: R,
    pub secondary: R,
    pub merged: R,
    pub fields_to_update: Vec<String>,
    pub related_record_counts: RelatedRecordCounts,
}

impl<R> MergePreview<R> {
    pub fn has_changes(&self) -> bool {
        !self.fields_to_update.is_empty()
    }
}
