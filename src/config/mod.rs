// Copyright (c) 2025 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

pub mod core;
pub mod loader;
pub mod validation;

pub use self::core::{
    AppConfig, ExploitConfig, HttpConfig, ObservabilityConfig, ProbeConfig, RetryConfig,
    ScanSettings,
};

pub use loader::{apply_env_overrides, load_config_with_overrides, ConfigFormat, ConfigLoader};

pub use validation::ConfigValidator;

use anyhow::Result;

impl AppConfig {
    /// Defaults with environment variable overrides
    ///
    /// Supports the following environment variables:
    /// - RAYSENTRY_DEFAULT_PORT: Port used when a target gives none
    /// - RAYSENTRY_PROBE_TIMEOUT_MS / RAYSENTRY_EXPLOIT_TIMEOUT_MS: Request timeouts
    /// - RAYSENTRY_MAX_RETRIES: Retries per candidate endpoint
    /// - RAYSENTRY_MAX_CONCURRENCY: Targets probed in parallel
    /// - RAYSENTRY_CLIENT_ID: Identifying header value (empty disables it)
    /// - ACCEPT_INVALID_CERTS: Skip TLS verification
    /// - LOG_LEVEL: Logging level
    pub fn from_env() -> Result<Self> {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config)?;
        ConfigValidator::validate_app_config(&config)?;
        Ok(config)
    }

    /// Commented TOML written by `raysentry init`
    pub fn sample_toml() -> Result<String> {
        let body = toml::to_string_pretty(&AppConfig::default())?;
        Ok(format!(
            "# RaySentry configuration\n\
             # Environment variables (RAYSENTRY_*, LOG_LEVEL) override these values.\n\n{}",
            body
        ))
    }
}
