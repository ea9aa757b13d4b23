// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use validator::Validate;

use super::core::AppConfig;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate_app_config(config: &AppConfig) -> Result<()> {
        config
            .validate()
            .context("Configuration validation failed")?;

        Self::validate_probe_config(config)?;
        Self::validate_exploit_config(config)?;
        Self::validate_retry_config(config)?;
        Self::validate_observability_config(config)?;

        Ok(())
    }

    fn validate_probe_config(config: &AppConfig) -> Result<()> {
        if config.probe.candidate_paths.is_empty() {
            return Err(anyhow::anyhow!("At least one candidate path is required"));
        }

        for path in &config.probe.candidate_paths {
            if !path.starts_with('/') || !path.ends_with('/') {
                return Err(anyhow::anyhow!(
                    "Candidate path must start and end with '/': {}",
                    path
                ));
            }
        }

        if config.probe.default_port == 0 {
            return Err(anyhow::anyhow!("Default port must be greater than 0"));
        }

        Ok(())
    }

    fn validate_exploit_config(config: &AppConfig) -> Result<()> {
        if config.exploit.success_statuses.is_empty() {
            return Err(anyhow::anyhow!("Success status set cannot be empty"));
        }

        if let Some(code) = config
            .exploit
            .success_statuses
            .iter()
            .find(|c| !(100..=599).contains(*c))
        {
            return Err(anyhow::anyhow!("Invalid success status code: {}", code));
        }

        Ok(())
    }

    fn validate_retry_config(config: &AppConfig) -> Result<()> {
        let retry = &config.retry;

        if retry.initial_delay_ms > retry.max_delay_ms {
            return Err(anyhow::anyhow!(
                "Retry initial delay ({}ms) exceeds max delay ({}ms)",
                retry.initial_delay_ms,
                retry.max_delay_ms
            ));
        }

        if retry.backoff_multiplier < 1.0 {
            return Err(anyhow::anyhow!("Backoff multiplier must be >= 1.0"));
        }

        Ok(())
    }

    fn validate_observability_config(config: &AppConfig) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.observability.log_level.to_lowercase().as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                config.observability.log_level,
                valid_log_levels
            ));
        }

        Ok(())
    }
}
