//! Daemon settings
//!
//! Sources, later wins: built-in defaults, `jobmatch.toml` (or the file named
//! by `JOBMATCH_CONFIG`), then `JOBMATCH_*` environment variables.

use anyhow::{ensure, Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use jobmatch_core::domain::PageLimits;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const ENV_PREFIX: &str = "JOBMATCH";
const CONFIG_PATH_VAR: &str = "JOBMATCH_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "jobmatch.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub http_host: String,
    pub http_port: u16,
    pub cluster_base_url: String,
    pub cluster_timeout_ms: u64,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub log_format: LogFormat,
    /// `~` is expanded
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Settings {
    /// Load from the process environment
    pub fn load() -> Result<Self> {
        let file = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => File::from(PathBuf::from(path)).required(true),
            Err(_) => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = defaults()?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings: Settings = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.cluster_timeout_ms > 0,
            "cluster_timeout_ms must be positive"
        );
        ensure!(
            self.default_page_size > 0 && self.default_page_size <= self.max_page_size,
            "default_page_size must be in 1..=max_page_size (got {} / {})",
            self.default_page_size,
            self.max_page_size
        );
        ensure!(
            self.cluster_base_url.starts_with("http://")
                || self.cluster_base_url.starts_with("https://"),
            "cluster_base_url must be an http(s) URL, got {:?}",
            self.cluster_base_url
        );
        Ok(())
    }

    pub fn cluster_timeout(&self) -> Duration {
        Duration::from_millis(self.cluster_timeout_ms)
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.log_dir
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).into_owned()))
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_size: self.default_page_size,
            max_size: self.max_page_size,
        }
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("database_url", "sqlite://jobmatch.db")?
        .set_default("http_host", "127.0.0.1")?
        .set_default("http_port", 8080_i64)?
        .set_default("cluster_base_url", "http://localhost:8000")?
        .set_default("cluster_timeout_ms", 5000_i64)?
        .set_default("default_page_size", 20_i64)?
        .set_default("max_page_size", 100_i64)?
        .set_default("log_format", "pretty")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::build(defaults().unwrap().add_source(env(&[]))).unwrap();

        assert_eq!(settings.database_url, "sqlite://jobmatch.db");
        assert_eq!(settings.http_port, 8080);
        assert_eq!(settings.cluster_timeout(), Duration::from_secs(5));
        assert_eq!(settings.page_limits(), PageLimits::default());
        assert_eq!(settings.log_format, LogFormat::Pretty);
        assert!(settings.log_dir().is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let file = File::from_str(
            "http_port = 9000\ncluster_base_url = \"http://recommender:8000\"\nlog_format = \"json\"",
            FileFormat::Toml,
        );
        let builder = defaults()
            .unwrap()
            .add_source(file)
            .add_source(env(&[("JOBMATCH_HTTP_PORT", "9100")]));

        let settings = Settings::build(builder).unwrap();
        assert_eq!(settings.http_port, 9100);
        assert_eq!(settings.cluster_base_url, "http://recommender:8000");
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_log_dir_from_env() {
        let builder = defaults()
            .unwrap()
            .add_source(env(&[("JOBMATCH_LOG_DIR", "/var/log/jobmatch")]));
        let settings = Settings::build(builder).unwrap();
        assert_eq!(settings.log_dir(), Some(PathBuf::from("/var/log/jobmatch")));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        for vars in [
            [("JOBMATCH_CLUSTER_TIMEOUT_MS", "0")],
            [("JOBMATCH_DEFAULT_PAGE_SIZE", "500")],
            [("JOBMATCH_CLUSTER_BASE_URL", "recommender:8000")],
        ] {
            let builder = defaults().unwrap().add_source(env(&vars));
            assert!(Settings::build(builder).is_err(), "{:?} accepted", vars);
        }
    }
}
