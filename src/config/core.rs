// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use crate::retry::RetryPolicy;
use crate::types::DEFAULT_RAY_PORT;
use crate::validation::DEFAULT_DESTRUCTIVE_PATTERNS;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct AppConfig {
    #[validate(nested)]
    #[serde(default)]
    pub probe: ProbeConfig,

    #[validate(nested)]
    #[serde(default)]
    pub exploit: ExploitConfig,

    #[validate(nested)]
    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[validate(nested)]
    #[serde(default)]
    pub scan: ScanSettings,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            probe: ProbeConfig::default(),
            exploit: ExploitConfig::default(),
            retry: RetryConfig::default(),
            http: HttpConfig::default(),
            scan: ScanSettings::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ProbeConfig {
    #[validate(range(min = 1))]
    #[serde(default = "default_port")]
    pub default_port: u16,

    /// Tried in order, newest job API first
    #[validate(length(min = 1))]
    #[serde(default = "default_candidate_paths")]
    pub candidate_paths: Vec<String>,

    #[validate(range(min = 1, max = 600000))]
    #[serde(default = "default_probe_timeout")]
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            default_port: default_port(),
            candidate_paths: default_candidate_paths(),
            timeout_ms: default_probe_timeout(),
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ExploitConfig {
    #[validate(length(min = 1))]
    #[serde(default = "default_success_statuses")]
    pub success_statuses: Vec<u16>,

    #[serde(default = "default_destructive_patterns")]
    pub destructive_patterns: Vec<String>,

    #[validate(range(min = 1, max = 600000))]
    #[serde(default = "default_exploit_timeout")]
    pub timeout_ms: u64,
}

impl Default for ExploitConfig {
    fn default() -> Self {
        Self {
            success_statuses: default_success_statuses(),
            destructive_patterns: default_destructive_patterns(),
            timeout_ms: default_exploit_timeout(),
        }
    }
}

impl ExploitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct RetryConfig {
    #[validate(range(min = 0, max = 10))]
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    #[validate(range(min = 1.0, max = 10.0))]
    #[serde(default = "default_multiplier")]
    pub backoff_multiplier: f64,

    #[serde(default)]
    pub enable_jitter: bool,

    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_retries(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            backoff_multiplier: default_multiplier(),
            enable_jitter: false,
            jitter_factor: default_jitter_factor(),
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            backoff_multiplier: self.backoff_multiplier,
            enable_jitter: self.enable_jitter,
            jitter_factor: self.jitter_factor,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpConfig {
    #[serde(default = "default_client_header")]
    pub client_header: String,

    /// Value for `client_header`; `None` sends no identifying header
    #[serde(default = "default_client_id")]
    pub client_id: Option<String>,

    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            client_header: default_client_header(),
            client_id: default_client_id(),
            accept_invalid_certs: false,
        }
    }
}

impl HttpConfig {
    pub fn header_pair(&self) -> Option<(String, String)> {
        self.client_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .map(|id| (self.client_header.clone(), id.clone()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ScanSettings {
    #[validate(range(min = 1, max = 1024))]
    #[serde(default = "default_concurrency")]
    pub max_concurrency: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_concurrency: default_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_RAY_PORT
}

fn default_candidate_paths() -> Vec<String> {
    vec!["/api/jobs/".to_string(), "/api/job_agent/jobs/".to_string()]
}

fn default_probe_timeout() -> u64 {
    5000
}

fn default_success_statuses() -> Vec<u16> {
    vec![200, 201]
}

fn default_destructive_patterns() -> Vec<String> {
    DEFAULT_DESTRUCTIVE_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_exploit_timeout() -> u64 {
    10000
}

fn default_retries() -> u32 {
    3
}

fn default_initial_delay() -> u64 {
    1000
}

fn default_max_delay() -> u64 {
    10000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_jitter_factor() -> f64 {
    0.3
}

fn default_client_header() -> String {
    "X-Scanner-Client".to_string()
}

fn default_client_id() -> Option<String> {
    Some(format!("raysentry/{}", env!("CARGO_PKG_VERSION")))
}

fn default_concurrency() -> usize {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}
