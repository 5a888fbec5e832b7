//! Configuration: JSON config file plus command-line overrides.
//!
//! JSON shape (every key optional, `null` allowed):
//! {
//!   "MONGO_LOG_FILE": "/var/log/mongodb/mongod.log",
//!   "LAST_MINUTES": 60,
//!   "QUERY_THRESHOLD": 5,
//!   "WEBHOOK_URL": "https://chat.example.com/v1/spaces/..."
//! }
//!
//! Precedence: command line, then config file, then built-in defaults.

use crate::Result;
use crate::diagnostics;

use anyhow::Context;
use clap::Args;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, Default, Args)]
pub struct ReportArgs {
    /// MongoDB JSON log file(s); defaults to MONGO_LOG_FILE from the config.
    pub logfiles: Vec<String>,

    /// Only analyze entries from the last N minutes.
    #[arg(long)]
    pub last_minutes: Option<u64>,

    /// Minimum occurrences for a find shape to be reported.
    #[arg(long)]
    pub threshold: Option<u64>,

    /// Chat webhook receiving the report (and failure notices).
    #[arg(long)]
    pub webhook_url: Option<String>,

    /// JSON config file [default: config.json, ignored if absent].
    #[arg(long)]
    pub config: Option<String>,

    /// Reduced output for scheduled runs; exit code carries the outcome.
    #[arg(long, visible_alias = "quiet")]
    pub cron_mode: bool,
}

/// Config file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileConfig {
    #[serde(rename = "MONGO_LOG_FILE", default)]
    pub log_file: Option<String>,

    #[serde(rename = "LAST_MINUTES", default)]
    pub last_minutes: Option<u64>,

    #[serde(rename = "QUERY_THRESHOLD", default)]
    pub query_threshold: Option<u64>,

    #[serde(rename = "WEBHOOK_URL", default)]
    pub webhook_url: Option<String>,
}

impl FileConfig {
    pub fn load(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| diagnostics::error_message(format!("read config file {}", path)))?;
        serde_json::from_str(&text)
            .with_context(|| diagnostics::error_message(format!("invalid JSON in config file {}", path)))
    }

    /// The config named on the command line must exist; the default one may not.
    pub fn load_for(args: &ReportArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }
}

/// Fully resolved parameters for one report run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Empty when neither the command line nor the config names a log.
    pub log_files: Vec<String>,
    pub last_minutes: Option<u64>,
    pub threshold: u64,
    pub webhook_url: Option<String>,
    pub quiet: bool,
}

impl Settings {
    pub fn resolve(args: &ReportArgs, file: FileConfig) -> Self {
        let log_files = if args.logfiles.is_empty() {
            file.log_file.into_iter().filter(|p| !p.is_empty()).collect()
        } else {
            args.logfiles.clone()
        };

        Settings {
            log_files,
            last_minutes: args.last_minutes.or(file.last_minutes),
            threshold: args.threshold.or(file.query_threshold).unwrap_or(0),
            webhook_url: args
                .webhook_url
                .clone()
                .or(file.webhook_url)
                .filter(|url| !url.trim().is_empty()),
            quiet: args.cron_mode,
        }
    }

    pub fn load(args: &ReportArgs) -> Result<Self> {
        Ok(Self::resolve(args, FileConfig::load_for(args)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn config_file(text: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("tempfile");
        f.write_all(text.as_bytes()).expect("write");
        f
    }

    #[test]
    fn file_values_fill_unset_arguments() {
        let file = FileConfig {
            log_file: Some("/var/log/mongod.log".into()),
            last_minutes: Some(60),
            query_threshold: Some(5),
            webhook_url: Some("https://hook".into()),
        };
        let settings = Settings::resolve(&ReportArgs::default(), file);
        assert_eq!(
            settings,
            Settings {
                log_files: vec!["/var/log/mongod.log".into()],
                last_minutes: Some(60),
                threshold: 5,
                webhook_url: Some("https://hook".into()),
                quiet: false,
            }
        );
    }

    #[test]
    fn arguments_override_file_values() {
        let args = ReportArgs {
            logfiles: vec!["a.log".into(), "b.log".into()],
            last_minutes: Some(15),
            threshold: Some(2),
            webhook_url: Some("https://cli".into()),
            config: None,
            cron_mode: true,
        };
        let file = FileConfig {
            log_file: Some("file.log".into()),
            last_minutes: Some(60),
            query_threshold: Some(9),
            webhook_url: Some("https://file".into()),
        };
        let settings = Settings::resolve(&args, file);
        assert_eq!(settings.log_files, vec!["a.log".to_string(), "b.log".to_string()]);
        assert_eq!(settings.last_minutes, Some(15));
        assert_eq!(settings.threshold, 2);
        assert_eq!(settings.webhook_url.as_deref(), Some("https://cli"));
        assert!(settings.quiet);
    }

    #[test]
    fn defaults_when_nothing_is_configured() {
        let settings = Settings::resolve(
            &ReportArgs::default(),
            FileConfig {
                log_file: Some(String::new()),
                webhook_url: Some("  ".into()),
                ..FileConfig::default()
            },
        );
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn loads_json_with_nulls_and_unknown_keys() {
        let f = config_file(
            r#"{"MONGO_LOG_FILE": "m.log", "LAST_MINUTES": null, "QUERY_THRESHOLD": 3, "EXTRA": true}"#,
        );
        let loaded = FileConfig::load(&f.path().to_string_lossy()).ok();
        assert_eq!(
            loaded,
            Some(FileConfig {
                log_file: Some("m.log".into()),
                last_minutes: None,
                query_threshold: Some(3),
                webhook_url: None,
            })
        );
    }

    #[test]
    fn explicit_config_must_exist_and_parse() {
        let bad = config_file("{ not json");
        let args = ReportArgs {
            config: Some(bad.path().to_string_lossy().into_owned()),
            ..ReportArgs::default()
        };
        let err = Settings::load(&args).err().map(|e| format!("{e:#}"));
        assert!(err.is_some_and(|e| e.contains("invalid JSON in config file")));

        let dir = tempfile::tempdir().expect("tempdir");
        let args = ReportArgs {
            config: Some(dir.path().join("missing.json").to_string_lossy().into_owned()),
            ..ReportArgs::default()
        };
        assert!(Settings::load(&args).is_err());
    }
}
