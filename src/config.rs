use crate::loaders::Columns;
use eyre::{WrapErr, ensure};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: InputConfig,
    pub columns: Columns,
    pub report: ReportConfig,
    pub solver: SolverConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub path: PathBuf,
    /// Single byte field separator, a tab by default.
    pub delimiter: String,
    /// Honor double quotes around fields.
    pub quoting: bool,
}

impl Default for InputConfig {
    fn default() -> InputConfig {
        InputConfig {
            path: PathBuf::from("data_source.txt"),
            delimiter: "\t".to_owned(),
            quoting: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> ReportConfig {
        ReportConfig {
            path: PathBuf::from("validation_report.txt"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub algorithm: String,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            algorithm: "greedy".to_owned(),
        }
    }
}

impl Config {
    pub fn load(file_name: &Path) -> eyre::Result<Config> {
        let content = fs::read_to_string(file_name)
            .wrap_err_with(|| format!("cannot load configuration file {}", file_name.display()))?;
        Config::parse(&content)
            .wrap_err_with(|| format!("cannot parse configuration file {}", file_name.display()))
    }

    /// Load `file_name` if it exists, or use defaults when the file is
    /// absent and has not been explicitly requested.
    pub fn load_or_default(file_name: &Path, explicit: bool) -> eyre::Result<Config> {
        if explicit || file_name.exists() {
            Config::load(file_name)
        } else {
            Ok(Config::default())
        }
    }

    pub fn parse(content: &str) -> eyre::Result<Config> {
        let config: Config = toml::from_str(content)?;
        config.delimiter()?;
        Ok(config)
    }

    pub fn delimiter(&self) -> eyre::Result<u8> {
        let delimiter = self.input.delimiter.as_bytes();
        ensure!(
            delimiter.len() == 1,
            "input.delimiter must be a single byte, got {:?}",
            self.input.delimiter
        );
        Ok(delimiter[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.input.path, PathBuf::from("data_source.txt"));
        assert_eq!(config.delimiter().unwrap(), b'\t');
        assert!(!config.input.quoting);
        assert_eq!(config.report.path, PathBuf::from("validation_report.txt"));
        assert_eq!(config.solver.algorithm, "greedy");
        assert_eq!(config.columns.output, "NOUVEAU GROUPE");
        assert_eq!(config.columns.id, None);
    }

    #[test]
    fn test_overrides() {
        let config = Config::parse(
            r#"
            [input]
            path = "students.csv"
            delimiter = ";"
            quoting = true

            [columns]
            id = "Numero"
            period = "Période"
            "#,
        )
        .unwrap();
        assert_eq!(config.input.path, PathBuf::from("students.csv"));
        assert_eq!(config.delimiter().unwrap(), b';');
        assert!(config.input.quoting);
        assert_eq!(config.columns.id.as_deref(), Some("Numero"));
        assert_eq!(config.columns.period, "Période");
        assert_eq!(config.columns.profession, "Metier");
    }

    #[test]
    fn test_invalid() {
        assert!(Config::parse("[input]\ndelimiter = \"ab\"\n").is_err());
        assert!(Config::parse("[input]\nunknown = 1\n").is_err());
        assert!(Config::parse("[nowhere]\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regroup.toml");
        assert!(Config::load_or_default(&path, false).is_ok());
        assert!(Config::load_or_default(&path, true).is_err());
        fs::write(&path, "[solver]\nalgorithm = \"other\"\n").unwrap();
        let config = Config::load_or_default(&path, false).unwrap();
        assert_eq!(config.solver.algorithm, "other");
    }
}
