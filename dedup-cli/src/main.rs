use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use dedup_engine::{get_record_merge_preview, DuplicateDetector};
use shared_types::{Record, RelatedEntity, RelatedRecordCounts};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::prelude::*;

mod config;
mod report;
mod sources;

use config::{DedupConfig, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "impactflow-dedup",
    author,
    version,
    about = "Find duplicate contacts and companies and preview their merge"
)]
struct Cli {
    /// Config file (defaults to <config dir>/impactflow/dedup.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the fuzzy name-match threshold (0.0 - 1.0)
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Override the output format
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a new record against a snapshot before creating it
    #[command(group(
        ArgGroup::new("input")
            .required(true)
            .args(["candidate", "vcard"]),
    ))]
    Check {
        /// Snapshot of existing records (JSON)
        #[arg(long, value_name = "PATH")]
        existing: PathBuf,

        /// Candidate record as tagged JSON
        #[arg(long, value_name = "PATH", group = "input")]
        candidate: Option<PathBuf>,

        /// Candidate contact from a .vcf business card
        #[arg(long, value_name = "PATH", group = "input")]
        vcard: Option<PathBuf>,
    },

    /// List duplicate pairs inside a snapshot
    Scan {
        #[arg(long, value_name = "PATH")]
        existing: PathBuf,
    },

    /// Show what merging one record into another would change
    MergePreview {
        #[arg(long, value_name = "PATH")]
        existing: PathBuf,

        /// Id of the record that survives the merge
        #[arg(long)]
        primary: String,

        /// Id of the record merged into the primary
        #[arg(long)]
        secondary: String,

        /// Related record count, e.g. `--related deals=3` (repeatable)
        #[arg(long = "related", value_name = "KIND=COUNT", value_parser = parse_related)]
        related: Vec<(RelatedEntity, u64)>,
    },
}

enum Outcome {
    Clear,
    DuplicatesFound,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file_path.as_deref());

    match run(cli) {
        Ok(Outcome::Clear) => ExitCode::SUCCESS,
        Ok(Outcome::DuplicatesFound) => ExitCode::from(2),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Outcome> {
    let (config, config_path) =
        DedupConfig::load(cli.config.as_deref()).context("Failed to load dedup config")?;
    tracing::debug!(path = %config_path.display(), "config loaded");

    let options = config.detection.to_options(cli.threshold)?;
    let format = cli.format.unwrap_or(config.output.format);
    let detector = DuplicateDetector::new(options);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Check {
            existing,
            candidate,
            vcard,
        } => {
            let records = sources::load_snapshot(&existing)?;
            let candidate = match (candidate, vcard) {
                (Some(path), None) => sources::load_candidate(&path)?,
                (None, Some(path)) => sources::load_vcard(&path)?,
                (Some(_), Some(_)) => anyhow::bail!("Pass only one of --candidate or --vcard"),
                (None, None) => anyhow::bail!("Pass one of --candidate or --vcard"),
            };

            let check = detector.check(&candidate, &records);
            report::write_check(&mut out, format, &candidate, &check)?;

            Ok(if check.is_clear() {
                Outcome::Clear
            } else {
                Outcome::DuplicatesFound
            })
        }
        Command::Scan { existing } => {
            let records = sources::load_snapshot(&existing)?;
            let pairs = detector.scan(&records);
            report::write_scan(&mut out, format, &records, &pairs)?;

            Ok(if pairs.is_empty() {
                Outcome::Clear
            } else {
                Outcome::DuplicatesFound
            })
        }
        Command::MergePreview {
            existing,
            primary,
            secondary,
            related,
        } => {
            if primary == secondary {
                anyhow::bail!("Cannot merge record {} into itself", primary);
            }
            let records = sources::load_snapshot(&existing)?;
            let primary = find_record(&records, &primary, &existing)?;
            let secondary = find_record(&records, &secondary, &existing)?;
            let related: RelatedRecordCounts = related.into_iter().collect();

            let preview = get_record_merge_preview(primary, secondary, Some(related))?;
            report::write_preview(&mut out, format, &preview)?;

            Ok(Outcome::Clear)
        }
    }
}

fn find_record<'a>(records: &'a [Record], id: &str, path: &Path) -> Result<&'a Record> {
    records
        .iter()
        .find(|record| record.id().map(String::as_str) == Some(id))
        .ok_or_else(|| anyhow::anyhow!("No record with id {} in {:?}", id, path))
}

fn parse_related(value: &str) -> Result<(RelatedEntity, u64), String> {
    let (kind, count) = value
        .split_once('=')
        .ok_or_else(|| format!("expected KIND=COUNT, got {value}"))?;
    let kind = kind.parse::<RelatedEntity>()?;
    let count = count
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid count {count:?}: {e}"))?;
    Ok((kind, count))
}

fn init_tracing(log_file_path: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let Some(log_path) = log_file_path else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init();
        return None;
    };

    let log_path = Path::new(log_path);
    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(Path::new(".")),
        log_path
            .file_name()
            .unwrap_or(std::ffi::OsStr::new("impactflow-dedup.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .try_init();

    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_related() {
        assert_eq!(parse_related("deals=3"), Ok((RelatedEntity::Deals, 3)));
        assert_eq!(parse_related("Invoices= 12"), Ok((RelatedEntity::Invoices, 12)));
        assert!(parse_related("deals").is_err());
        assert!(parse_related("widgets=1").is_err());
        assert!(parse_related("deals=-1").is_err());
    }

    #[test]
    fn test_check_requires_one_input() {
        let missing = Cli::try_parse_from(["impactflow-dedup", "check", "--existing", "a.json"]);
        assert!(missing.is_err());

        let both = Cli::try_parse_from([
            "impactflow-dedup",
            "check",
            "--existing",
            "a.json",
            "--candidate",
            "c.json",
            "--vcard",
            "c.vcf",
        ]);
        assert!(both.is_err());
    }

    #[test]
    fn test_run_check_against_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("dedup.toml");
        std::fs::write(&config, "[output]\nformat = \"json\"\n").unwrap();
        let existing = dir.path().join("existing.json");
        std::fs::write(
            &existing,
            r#"{"contacts":[{"id":"c1","name":"Jane Doe","email":"jane@acme.com"}]}"#,
        )
        .unwrap();
        let candidate = dir.path().join("candidate.json");
        std::fs::write(
            &candidate,
            r#"{"kind":"contact","name":"Jane Doe","email":"jane@acme.com"}"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "impactflow-dedup",
            "--config",
            config.to_str().unwrap(),
            "check",
            "--existing",
            existing.to_str().unwrap(),
            "--candidate",
            candidate.to_str().unwrap(),
        ])
        .unwrap();
        assert!(matches!(run(cli).unwrap(), Outcome::DuplicatesFound));
    }

    #[test]
    fn test_run_rejects_bad_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("dedup.toml");
        std::fs::write(&config, "").unwrap();
        let existing = dir.path().join("existing.json");
        std::fs::write(&existing, "[]").unwrap();

        let cli = Cli::try_parse_from([
            "impactflow-dedup",
            "--config",
            config.to_str().unwrap(),
            "--threshold",
            "1.5",
            "scan",
            "--existing",
            existing.to_str().unwrap(),
        ])
        .unwrap();
        let err = run(cli).err().unwrap();
        assert!(err.to_string().contains("fuzzy threshold"));
    }

    #[test]
    fn test_merge_preview_rejects_same_record() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("dedup.toml");
        std::fs::write(&config, "").unwrap();
        let existing = dir.path().join("existing.json");
        std::fs::write(&existing, r#"[{"kind":"contact","id":"c1","name":"Jane Doe"}]"#).unwrap();

        let cli = Cli::try_parse_from([
            "impactflow-dedup",
            "--config",
            config.to_str().unwrap(),
            "merge-preview",
            "--existing",
            existing.to_str().unwrap(),
            "--primary",
            "c1",
            "--secondary",
            "c1",
        ])
        .unwrap();
        let err = run(cli).err().unwrap();
        assert!(err.to_string().contains("into itself"));
    }
}
