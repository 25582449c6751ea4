// crates/yago-seltab-core/src/config.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// On-disk format for the per-type output tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Parquet,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Parquet => "parquet",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = PipelineError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "parquet" => Ok(OutputFormat::Parquet),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(PipelineError::Validation(format!(
                "unknown output format '{other}', expected 'parquet' or 'csv'"
            ))),
        }
    }
}

/// Full parameter set for one extraction run. Defaults reproduce the
/// original YAGO3-DL seltab materialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Glob matching the raw fact triple files (TSV or parquet parts).
    pub facts_pattern: String,
    /// Glob matching the raw type assertion files.
    pub types_pattern: String,
    /// Directory the per-type tables and the run manifest are written to.
    pub dest_path: PathBuf,
    pub output_format: OutputFormat,
    /// How many top-connectivity subjects seed the type selection.
    pub n_subjects: usize,
    /// Minimum fact count for a subject to survive the popularity filter.
    pub min_count: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            facts_pattern: "data/yago3-dl/raw/yagoFacts*".to_string(),
            types_pattern: "data/yago3-dl/raw/yagoTypes*".to_string(),
            dest_path: PathBuf::from("data/yago3-dl/seltab"),
            output_format: OutputFormat::Parquet,
            n_subjects: 10_000,
            min_count: 10,
        }
    }
}

impl ExtractionConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_run() {
        let config = ExtractionConfig::default();
        assert_eq!(config.n_subjects, 10_000);
        assert_eq!(config.min_count, 10);
        assert_eq!(config.dest_path, PathBuf::from("data/yago3-dl/seltab"));
        assert_eq!(config.output_format, OutputFormat::Parquet);
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: ExtractionConfig =
            toml::from_str("n_subjects = 500\noutput_format = \"csv\"").unwrap();
        assert_eq!(config.n_subjects, 500);
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert_eq!(config.min_count, 10);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!("feather".parse::<OutputFormat>().is_err());
        assert_eq!("PARQUET".parse::<OutputFormat>().unwrap(), OutputFormat::Parquet);
    }
}
