use anyhow::{Context, Result};
use serde::Deserialize;
use shared_types::{Company, Contact, Record};
use std::path::Path;

/// Accepted shapes of a snapshot file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Snapshot {
    Records(Vec<Record>),
    Lists(SnapshotLists),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotLists {
    contacts: Option<Vec<Contact>>,
    companies: Option<Vec<Company>>,
}

impl Snapshot {
    fn into_records(self) -> Result<Vec<Record>> {
        match self {
            Snapshot::Records(records) => Ok(records),
            Snapshot::Lists(SnapshotLists {
                contacts: None,
                companies: None,
            }) => anyhow::bail!("snapshot object needs a \"contacts\" or \"companies\" list"),
            Snapshot::Lists(SnapshotLists {
                contacts,
                companies,
            }) => Ok(contacts
                .unwrap_or_default()
                .into_iter()
                .map(Record::from)
                .chain(companies.unwrap_or_default().into_iter().map(Record::from))
                .collect()),
        }
    }
}

/// Load existing records from a JSON snapshot: a tagged record array or a
/// `{"contacts": [...], "companies": [...]}` object.
pub fn load_snapshot(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot at {:?}", path))?;
    let snapshot: Snapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot at {:?}", path))?;

    let records = snapshot
        .into_records()
        .with_context(|| format!("Unrecognized snapshot at {:?}", path))?;
    tracing::info!(path = %path.display(), records = records.len(), "loaded snapshot");
    Ok(records)
}

/// Load a single tagged candidate record from JSON
pub fn load_candidate(path: &Path) -> Result<Record> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read candidate at {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse candidate at {:?}", path))
}

/// Load the first contact of a vCard file as a candidate
pub fn load_vcard(path: &Path) -> Result<Record> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read vCard at {:?}", path))?;
    let contact = parse_vcard(&content)
        .ok_or_else(|| anyhow::anyhow!("No vCard with a full name (FN) found in {:?}", path))?;
    Ok(Record::Contact(contact))
}

/// Parse the first `BEGIN:VCARD` block that carries a full name.
pub fn parse_vcard(content: &str) -> Option<Contact> {
    content
        .split("BEGIN:VCARD")
        .skip(1)
        .find_map(parse_vcard_block)
}

fn parse_vcard_block(vcard: &str) -> Option<Contact> {
    let mut contact = Contact::default();

    for line in vcard.lines() {
        let line = line.trim();
        // Property name and parameters sit before the first ':'
        let Some((property, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let name = property
            .split(';')
            .next()
            .unwrap_or_default()
            .to_uppercase();

        match name.as_str() {
            "FN" => contact.name = Some(value.to_string()),
            "EMAIL" if contact.email.is_none() => contact.email = Some(value.to_string()),
            "TEL" if contact.phone.is_none() => contact.phone = Some(value.to_string()),
            "TITLE" | "ROLE" if contact.role.is_none() => contact.role = Some(value.to_string()),
            "URL" if value.to_lowercase().contains("linkedin.com") => {
                contact.linkedin = Some(value.to_string())
            }
            "NOTE" => contact.notes = Some(value.replace("\\n", "\n")),
            _ => {}
        }
    }

    contact.name.is_some().then_some(contact)
}
