use anyhow::Result;
use dedup_engine::{DuplicateCheck, DuplicatePair, PrimaryChoice};
use serde::Serialize;
use shared_types::{MergePreview, Record};
use std::io::Write;

use crate::config::OutputFormat;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PairReport<'a> {
    first_record: &'a Record,
    second_record: &'a Record,
    #[serde(flatten)]
    pair: &'a DuplicatePair,
}

pub fn write_check(
    out: &mut impl Write,
    format: OutputFormat,
    candidate: &Record,
    check: &DuplicateCheck<Record>,
) -> Result<()> {
    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut *out, check)?;
        writeln!(out)?;
        return Ok(());
    }

    let name = label(candidate);
    if check.is_clear() {
        writeln!(out, "No duplicates found for {} {}", candidate.kind(), name)?;
        return Ok(());
    }

    writeln!(
        out,
        "{} potential duplicate(s) for {} {}:",
        check.matches.len(),
        candidate.kind(),
        name
    )?;
    for found in &check.matches {
        writeln!(
            out,
            "  [{}] {:<24} {:>5.1}%  {}",
            found.match_type,
            label(&found.record),
            found.confidence * 100.0,
            found.record.id().map(String::as_str).unwrap_or("-"),
        )?;
    }
    Ok(())
}

pub fn write_scan(
    out: &mut impl Write,
    format: OutputFormat,
    records: &[Record],
    pairs: &[DuplicatePair],
) -> Result<()> {
    if format == OutputFormat::Json {
        let reports: Vec<PairReport> = pairs
            .iter()
            .map(|pair| PairReport {
                first_record: &records[pair.first],
                second_record: &records[pair.second],
                pair,
            })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &reports)?;
        writeln!(out)?;
        return Ok(());
    }

    if pairs.is_empty() {
        writeln!(out, "No duplicate pairs in {} record(s)", records.len())?;
        return Ok(());
    }

    writeln!(out, "{} duplicate pair(s) in {} record(s):", pairs.len(), records.len())?;
    for pair in pairs {
        let (keep, drop) = match pair.suggested_primary {
            PrimaryChoice::First => (&records[pair.first], &records[pair.second]),
            PrimaryChoice::Second => (&records[pair.second], &records[pair.first]),
        };
        writeln!(
            out,
            "  [{}] {:>5.1}%  keep {} <- merge {}",
            pair.match_type,
            pair.confidence * 100.0,
            label(keep),
            label(drop),
        )?;
    }
    Ok(())
}

pub fn write_preview(
    out: &mut impl Write,
    format: OutputFormat,
    preview: &MergePreview<Record>,
) -> Result<()> {
    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut *out, preview)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "Merge {} into {}",
        label(&preview.secondary),
        label(&preview.primary)
    )?;
    if preview.has_changes() {
        writeln!(out, "Fields to update: {}", preview.fields_to_update.join(", "))?;
    } else {
        writeln!(out, "Fields to update: none")?;
    }
    for (entity, count) in &preview.related_record_counts {
        writeln!(out, "  {entity}: {count} to repoint")?;
    }
    Ok(())
}

fn label(record: &Record) -> String {
    let name = record.name().unwrap_or("(unnamed)");
    match record.id() {
        Some(id) => format!("{name} ({id})"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dedup_engine::{get_record_merge_preview, DuplicateDetector};
    use shared_types::{Contact, RelatedEntity, RelatedRecordCounts};

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_check_text_output() {
        let existing = vec![Record::Contact(
            Contact::named("Jane Doe").with_id("c1").with_email("jane@acme.com"),
        )];
        let candidate = Record::Contact(Contact::named("Jane Doe").with_email("jane@acme.com"));
        let check = DuplicateDetector::default().check(&candidate, &existing);

        let text = render(|out| write_check(out, OutputFormat::Text, &candidate, &check));
        assert!(text.starts_with("1 potential duplicate(s) for contact Jane Doe:"));
        assert!(text.contains("[exact]"));
        assert!(text.contains("100.0%"));
    }

    #[test]
    fn test_check_json_output() {
        let candidate = Record::Contact(Contact::named("Nobody"));
        let existing: Vec<Record> = Vec::new();
        let check = DuplicateDetector::default().check(&candidate, &existing);

        let json = render(|out| write_check(out, OutputFormat::Json, &candidate, &check));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["matches"], serde_json::json!([]));
    }

    #[test]
    fn test_scan_json_flattens_pair() {
        let records = vec![
            Record::Contact(Contact::named("Jane Doe").with_id("c1")),
            Record::Contact(Contact::named("Jane Doe").with_id("c2")),
        ];
        let pairs = DuplicateDetector::default().scan(&records);

        let json = render(|out| write_scan(out, OutputFormat::Json, &records, &pairs));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["matchType"], "fuzzy");
        assert_eq!(value[0]["firstRecord"]["id"], "c1");
        assert_eq!(value[0]["second"], 1);
        assert_eq!(value[0]["suggestedPrimary"], "first");
    }

    #[test]
    fn test_preview_text_output() {
        let primary = Record::Contact(Contact::named("Jon").with_id("c1"));
        let secondary = Record::Contact(Contact {
            phone: Some("555-1234".to_string()),
            ..Contact::named("Jonathan").with_id("c2")
        });
        let mut related = RelatedRecordCounts::new();
        related.insert(RelatedEntity::Deals, 3);
        let preview = get_record_merge_preview(&primary, &secondary, Some(related)).unwrap();

        let text = render(|out| write_preview(out, OutputFormat::Text, &preview));
        assert!(text.contains("Merge Jonathan (c2) into Jon (c1)"));
        assert!(text.contains("Fields to update: phone"));
        assert!(text.contains("deals: 3 to repoint"));
    }
}
