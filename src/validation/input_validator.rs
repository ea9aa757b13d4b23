// Copyright (c) 2025 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * RaySentry - Input Validator
 * Rejects malformed target hosts before any network activity and flags
 * destructive job commands without blocking them
 *
 * Copyright 2025 Bountyy Oy
 */

use crate::errors::{ScannerError, ScannerResult};
use crate::types::Target;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Characters that must never appear in a host. The host ends up in a URL
/// and may be echoed into shell contexts downstream.
pub const SHELL_METACHARACTERS: &[char] = &[';', '&', '|', '`', '$', '(', ')'];

/// Substrings (matched case-insensitively) that mark a command as destructive
pub const DEFAULT_DESTRUCTIVE_PATTERNS: &[&str] = &[
    "rm -rf",
    "rm -fr",
    "mkfs",
    "format c:",
    "dd if=",
    "> /dev/sd",
    ":(){",
    "chmod -r 777 /",
    "shutdown",
    "wipefs",
];

/// Validation verdict
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
            warning: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            warning: None,
        }
    }

    pub fn with_warning(warning: impl Into<String>) -> Self {
        Self {
            valid: true,
            error: None,
            warning: Some(warning.into()),
        }
    }

    /// Turn an invalid verdict into a `ScannerError::Validation`
    pub fn into_result(self) -> ScannerResult<Option<String>> {
        if self.valid {
            Ok(self.warning)
        } else {
            Err(ScannerError::Validation(
                self.error.unwrap_or_else(|| "invalid input".to_string()),
            ))
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputValidator {
    destructive_patterns: Vec<String>,
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new(DEFAULT_DESTRUCTIVE_PATTERNS.iter().map(|p| p.to_string()))
    }
}

impl InputValidator {
    pub fn new<I, S>(destructive_patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            destructive_patterns: destructive_patterns
                .into_iter()
                .map(|p| p.into().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn destructive_patterns(&self) -> &[String] {
        &self.destructive_patterns
    }

    /// Reject empty hosts and hosts containing shell metacharacters
    pub fn validate_host(&self, host: &str) -> ValidationResult {
        if host.trim().is_empty() {
            return ValidationResult::invalid("Invalid target: host cannot be empty");
        }

        if let Some(c) = host.chars().find(|c| SHELL_METACHARACTERS.contains(c)) {
            warn!(host = host, character = %c, "Rejected host with shell metacharacter");
            return ValidationResult::invalid(format!(
                "Invalid target: {} contains potentially dangerous characters ('{}')",
                host, c
            ));
        }

        ValidationResult::ok()
    }

    /// Host rules plus a usable port
    pub fn validate_target(&self, target: &Target) -> ValidationResult {
        let host = self.validate_host(&target.host);
        if !host.valid {
            return host;
        }

        if target.port == 0 {
            return ValidationResult::invalid(format!(
                "Invalid target: {} has port 0",
                target.host
            ));
        }

        ValidationResult::ok()
    }

    /// Never blocks. Attaches an advisory warning when the command matches a
    /// destructive pattern.
    pub fn validate_command(&self, command: &str) -> ValidationResult {
        let lowered = command.to_lowercase();

        match self
            .destructive_patterns
            .iter()
            .find(|pattern| lowered.contains(pattern.as_str()))
        {
            Some(pattern) => {
                warn!(pattern = %pattern, "Command matches a destructive pattern");
                ValidationResult::with_warning(format!(
                    "WARNING: command matches destructive pattern '{}'. \
                     Make sure this is covered by your authorization.",
                    pattern
                ))
            }
            None => ValidationResult::ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hosts() {
        let validator = InputValidator::default();
        for host in ["192.0.2.1", "ray-head.internal", "::1", "ray.example.com"] {
            assert!(validator.validate_host(host).valid, "{} should be valid", host);
        }
    }

    #[test]
    fn test_empty_hosts_rejected() {
        let validator = InputValidator::default();
        for host in ["", "   ", "\t\n"] {
            let result = validator.validate_host(host);
            assert!(!result.valid);
            assert!(result.error.unwrap().contains("cannot be empty"));
        }
    }

    #[test]
    fn test_every_metacharacter_rejected() {
        let validator = InputValidator::default();
        for c in SHELL_METACHARACTERS {
            let host = format!("10.0.0.1{}id", c);
            let result = validator.validate_host(&host);
            assert!(!result.valid, "{:?} should be rejected", host);
            assert!(result.error.unwrap().contains("dangerous characters"));
        }
        assert!(!validator.validate_host("a;rm -rf /").valid);
        assert!(!validator.validate_host("a && b").valid);
        assert!(!validator.validate_host("$(whoami)").valid);
    }

    #[test]
    fn test_port_zero_rejected() {
        let validator = InputValidator::default();
        let target = Target::new("192.0.2.1").with_port(0);
        assert!(!validator.validate_target(&target).valid);
        assert!(validator.validate_target(&Target::new("192.0.2.1")).valid);
    }

    #[test]
    fn test_command_always_valid() {
        let validator = InputValidator::default();
        for cmd in ["whoami", "", "RM -RF /tmp/x", ":(){ :|:& };:", "dd if=/dev/zero of=/dev/sda"] {
            assert!(validator.validate_command(cmd).valid);
        }
    }

    #[test]
    fn test_destructive_warning_case_insensitive() {
        let validator = InputValidator::default();

        assert!(validator.validate_command("whoami").warning.is_none());
        assert!(validator.validate_command("hostname && id").warning.is_none());

        let warning = validator.validate_command("sudo RM -RF /var/lib").warning;
        assert!(warning.unwrap().contains("rm -rf"));
        assert!(validator.validate_command("MKFS.ext4 /dev/sdb1").warning.is_some());
        assert!(validator.validate_command(":(){ :|:& };:").warning.is_some());
    }

    #[test]
    fn test_custom_patterns() {
        let validator = InputValidator::new(["curl", ""]);
        assert_eq!(validator.destructive_patterns(), &["curl".to_string()]);
        assert!(validator.validate_command("CURL http://x").warning.is_some());
        assert!(validator.validate_command("rm -rf /").warning.is_none());
    }

    #[test]
    fn test_into_result() {
        let err = ValidationResult::invalid("nope").into_result().unwrap_err();
        assert!(matches!(err, ScannerError::Validation(ref m) if m == "nope"));
        assert_eq!(
            ValidationResult::with_warning("careful").into_result().unwrap(),
            Some("careful".to_string())
        );
    }
}
