use shared_types::*;
use std::fs;
use std::path::PathBuf;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for the duplicate-detection types
    let mut types = Vec::new();

    // Record types
    types.push(clean_type(Contact::export_to_string()?));
    types.push(clean_type(ContactsResponse::export_to_string()?));
    types.push(clean_type(Company::export_to_string()?));
    types.push(clean_type(CompaniesResponse::export_to_string()?));
    types.push(clean_type(RecordKind::export_to_string()?));
    types.push(clean_type(Record::export_to_string()?));

    // Detection and merge types
    types.push(clean_type(MatchType::export_to_string()?));
    types.push(clean_type(DuplicateMatch::<Record>::export_to_string()?));
    types.push(clean_type(RelatedEntity::export_to_string()?));
    types.push(clean_type(MergePreview::<Record>::export_to_string()?));

    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("../web/src/api-types"));
    fs::create_dir_all(&output_dir)?;

    let output_path = output_dir.join("dedup.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Everything lands in one file, so cross-type imports are dropped
    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
