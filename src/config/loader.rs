// Copyright (c) 2025 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::core::AppConfig;
use super::validation::ConfigValidator;
use crate::types::Target;

pub struct ConfigLoader {
    config_path: PathBuf,
    format: ConfigFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

/// Target files may be a bare list or wrapped in `targets:`
#[derive(Deserialize)]
#[serde(untagged)]
enum TargetFile {
    Wrapped { targets: Vec<TargetEntry> },
    List(Vec<TargetEntry>),
}

/// One target-file entry; a missing port takes the configured default
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetEntry {
    host: String,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default, rename = "useSSL", alias = "useSsl")]
    use_ssl: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TargetEntry {
    fn into_target(self, default_port: u16) -> Target {
        Target {
            host: self.host,
            port: self.port.unwrap_or(default_port),
            use_ssl: self.use_ssl,
            description: self.description,
        }
    }
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let path = config_path.as_ref().to_path_buf();
        let format = Self::detect_format(&path)?;

        Ok(Self {
            config_path: path,
            format,
        })
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    fn detect_format(path: &Path) -> Result<ConfigFormat> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| anyhow::anyhow!("Could not determine config file format"))?;

        match extension {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(anyhow::anyhow!("Unsupported config file format: {}", extension)),
        }
    }

    fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        let parsed = match self.format {
            ConfigFormat::Yaml => {
                serde_yaml::from_str(content).context("Failed to parse YAML")?
            }
            ConfigFormat::Toml => toml::from_str(content).context("Failed to parse TOML")?,
            ConfigFormat::Json => {
                serde_json::from_str(content).context("Failed to parse JSON")?
            }
        };
        Ok(parsed)
    }

    fn read(&self) -> Result<String> {
        std::fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read file: {:?}", self.config_path))
    }

    /// File, then environment overrides, then validation
    pub fn load_config(&self) -> Result<AppConfig> {
        let content = self.read()?;
        let mut config: AppConfig = self
            .parse(&content)
            .with_context(|| format!("Invalid config file: {:?}", self.config_path))?;

        apply_env_overrides(&mut config)?;
        ConfigValidator::validate_app_config(&config)?;

        Ok(config)
    }

    /// Load a list of targets from this file, filling absent ports with `default_port`
    pub fn load_targets(&self, default_port: u16) -> Result<Vec<Target>> {
        let content = self.read()?;
        let file: TargetFile = self
            .parse(&content)
            .with_context(|| format!("Invalid target file: {:?}", self.config_path))?;

        let entries = match file {
            TargetFile::Wrapped { targets } => targets,
            TargetFile::List(targets) => targets,
        };

        Ok(entries
            .into_iter()
            .map(|entry| entry.into_target(default_port))
            .collect())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("Invalid {} value: {}", name, raw)),
        Err(_) => Ok(None),
    }
}

/// Environment variables take precedence over file values
pub fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
    if let Some(port) = env_parse("RAYSENTRY_DEFAULT_PORT")? {
        config.probe.default_port = port;
    }

    if let Some(timeout) = env_parse("RAYSENTRY_PROBE_TIMEOUT_MS")? {
        config.probe.timeout_ms = timeout;
    }

    if let Some(timeout) = env_parse("RAYSENTRY_EXPLOIT_TIMEOUT_MS")? {
        config.exploit.timeout_ms = timeout;
    }

    if let Some(retries) = env_parse("RAYSENTRY_MAX_RETRIES")? {
        config.retry.max_retries = retries;
    }

    if let Some(concurrency) = env_parse("RAYSENTRY_MAX_CONCURRENCY")? {
        config.scan.max_concurrency = concurrency;
    }

    if let Ok(client_id) = std::env::var("RAYSENTRY_CLIENT_ID") {
        config.http.client_id = if client_id.is_empty() {
            None
        } else {
            Some(client_id)
        };
    }

    if let Some(accept) = env_parse("ACCEPT_INVALID_CERTS")? {
        config.http.accept_invalid_certs = accept;
    }

    if let Ok(log_level) = std::env::var("LOG_LEVEL") {
        config.observability.log_level = log_level;
    }

    Ok(())
}

/// Load from `path` if given, otherwise defaults plus environment
pub fn load_config_with_overrides(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => ConfigLoader::new(path)?.load_config(),
        None => AppConfig::from_env(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_RAY_PORT;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(ConfigLoader::new("a.yml").unwrap().format(), ConfigFormat::Yaml);
        assert_eq!(ConfigLoader::new("a.toml").unwrap().format(), ConfigFormat::Toml);
        assert_eq!(ConfigLoader::new("a.json").unwrap().format(), ConfigFormat::Json);
        assert!(ConfigLoader::new("a.ini").is_err());
        assert!(ConfigLoader::new("noext").is_err());
    }

    #[test]
    fn test_load_partial_toml_fills_defaults() {
        let file = write_temp(
            ".toml",
            r#"
[retry]
max_retries = 1
initial_delay_ms = 50

[scan]
max_concurrency = 2
"#,
        );

        let config = ConfigLoader::new(file.path()).unwrap().load_config().unwrap();
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.retry.initial_delay_ms, 50);
        assert_eq!(config.retry.max_delay_ms, 10000);
        assert_eq!(config.scan.max_concurrency, 2);
        assert_eq!(config.probe.candidate_paths.len(), 2);
        assert_eq!(config.exploit.success_statuses, vec![200, 201]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let file = write_temp(
            ".yaml",
            "probe:\n  candidate_paths: []\n",
        );
        assert!(ConfigLoader::new(file.path()).unwrap().load_config().is_err());
    }

    #[test]
    fn test_load_targets_list_and_wrapped() {
        let list = write_temp(
            ".json",
            r#"[{"host": "10.0.0.1"}, {"host": "10.0.0.2", "port": 9000, "useSSL": true}]"#,
        );
        let targets = ConfigLoader::new(list.path())
            .unwrap()
            .load_targets(DEFAULT_RAY_PORT)
            .unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].port, 8265);
        assert_eq!(targets[1].port, 9000);
        assert!(targets[1].use_ssl);

        let wrapped = write_temp(
            ".yaml",
            "targets:\n  - host: ray-a\n    description: training cluster\n  - host: ray-b\n",
        );
        let targets = ConfigLoader::new(wrapped.path())
            .unwrap()
            .load_targets(DEFAULT_RAY_PORT)
            .unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].description.as_deref(), Some("training cluster"));
    }

    #[test]
    fn test_load_targets_uses_configured_default_port() {
        let mut config = AppConfig::default();
        config.probe.default_port = 9000;

        let file = write_temp(
            ".json",
            r#"[{"host": "10.0.0.1"}, {"host": "10.0.0.2", "port": 8265}]"#,
        );
        let targets = ConfigLoader::new(file.path())
            .unwrap()
            .load_targets(config.probe.default_port)
            .unwrap();

        assert_eq!(targets[0].port, 9000);
        assert_eq!(targets[1].port, 8265);
    }
}
