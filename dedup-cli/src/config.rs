use config::{Config, ConfigError, File};
use dedup_engine::{DedupError, DetectorOptions, FuzzyThreshold, DEFAULT_FUZZY_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"
[detection]
# Minimum name similarity (0.0 - 1.0) for a fuzzy duplicate
fuzzy_threshold = 0.8
# Set to false to only report exact (email / domain) duplicates
fuzzy_enabled = true

[output]
# "text" or "json"
format = "text"
"#;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct DedupConfig {
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DetectionConfig {
    pub fuzzy_threshold: f64,
    pub fuzzy_enabled: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            fuzzy_enabled: true,
        }
    }
}

impl DetectionConfig {
    /// Validated detector options; `threshold` overrides the file value.
    pub fn to_options(&self, threshold: Option<f64>) -> Result<DetectorOptions, DedupError> {
        let fuzzy_threshold = FuzzyThreshold::new(threshold.unwrap_or(self.fuzzy_threshold))?;
        Ok(DetectorOptions {
            fuzzy_threshold,
            fuzzy_enabled: self.fuzzy_enabled,
        })
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl DedupConfig {
    /// Load the config file. An explicit path must exist; the default path is
    /// created with commented defaults on first run.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::Message(format!(
                        "Config file not found at {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let path = get_config_path();
                write_default_config(&path)?;
                path
            }
        };

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let config: DedupConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }
}

fn write_default_config(config_path: &Path) -> Result<(), ConfigError> {
    if config_path.exists() {
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::Message(format!("Failed to create config directory: {e}"))
        })?;
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .map_err(|e| ConfigError::Message(format!("Failed to write default config: {e}")))
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("impactflow").join("dedup.toml")
    } else {
        PathBuf::from("dedup.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dedup.toml");
        write_default_config(&path).unwrap();

        let (config, loaded_from) = DedupConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded_from, path);
        assert_eq!(config.detection.fuzzy_threshold, 0.8);
        assert!(config.detection.fuzzy_enabled);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dedup.toml");
        std::fs::write(&path, "[detection]\nfuzzy_threshold = 0.9\nfuzzy_enabled = false\n").unwrap();
        write_default_config(&path).unwrap();

        let (config, _) = DedupConfig::load(Some(&path)).unwrap();
        assert_eq!(config.detection.fuzzy_threshold, 0.9);
        assert!(!config.detection.fuzzy_enabled);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DedupConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_threshold_override_is_validated() {
        let detection = DetectionConfig::default();
        let options = detection.to_options(Some(0.6)).unwrap();
        assert_eq!(options.fuzzy_threshold.value(), 0.6);
        assert_eq!(detection.to_options(None).unwrap().fuzzy_threshold.value(), 0.8);
        assert!(detection.to_options(Some(1.2)).is_err());
    }
}
