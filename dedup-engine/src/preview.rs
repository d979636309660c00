use shared_types::{Company, Contact, MergePreview, Record, RelatedRecordCounts};

use crate::error::DedupError;
use crate::merge::{merge_companies, merge_contacts, Mergeable};

/// Show what merging `secondary` into `primary` would change, without
/// touching either record. `related` is passed through as-is.
pub fn get_merge_preview<R: Mergeable>(
    primary: &R,
    secondary: &R,
    related: Option<RelatedRecordCounts>,
) -> MergePreview<R> {
    let merged = R::merge(primary, secondary);
    let fields_to_update = R::changed_fields(primary, &merged)
        .into_iter()
        .map(str::to_string)
        .collect();

    MergePreview {
        primary: primary.clone(),
        secondary: secondary.clone(),
        merged,
        fields_to_update,
        related_record_counts: related.unwrap_or_default(),
    }
}

/// [`get_merge_preview`] over tagged records. Both records must be of the
/// same kind.
pub fn get_record_merge_preview(
    primary: &Record,
    secondary: &Record,
    related: Option<RelatedRecordCounts>,
) -> Result<MergePreview<Record>, DedupError> {
    let (merged, fields) = match (primary, secondary) {
        (Record::Contact(p), Record::Contact(s)) => {
            let merged = merge_contacts(p, s);
            let fields = Contact::changed_fields(p, &merged);
            (Record::Contact(merged), fields)
        }
        (Record::Company(p), Record::Company(s)) => {
            let merged = merge_companies(p, s);
            let fields = Company::changed_fields(p, &merged);
            (Record::Company(merged), fields)
        }
        _ => {
            return Err(DedupError::KindMismatch {
                primary: primary.kind(),
                secondary: secondary.kind(),
            })
        }
    };

    tracing::debug!(
        kind = %primary.kind(),
        primary = primary.id().map(String::as_str).unwrap_or("<unsaved>"),
        fields = fields.len(),
        "merge preview"
    );

    Ok(MergePreview {
        primary: primary.clone(),
        secondary: secondary.clone(),
        merged,
        fields_to_update: fields.into_iter().map(str::to_string).collect(),
        related_record_counts: related.unwrap_or_default(),
    })
}
