// Copyright (c) 2025 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use crate::errors::ErrorCategory;
use serde::{Deserialize, Serialize};

/// Default Ray dashboard / job API port
pub const DEFAULT_RAY_PORT: u16 = 8265;

fn default_port() -> u16 {
    DEFAULT_RAY_PORT
}

/// One remote Ray service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default, rename = "useSSL", alias = "useSsl")]
    pub use_ssl: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Target {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_RAY_PORT,
            use_ssl: false,
            description: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn scheme(&self) -> &'static str {
        if self.use_ssl {
            "https"
        } else {
            "http"
        }
    }

    /// `{http|https}://{host}:{port}`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port)
    }

    /// Short `host:port` label for logs and reports
    pub fn label(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Candidate job-submission URLs, in the order given
    pub fn candidate_urls(&self, paths: &[String]) -> Vec<String> {
        let base = self.base_url();
        paths.iter().map(|p| format!("{}{}", base, p)).collect()
    }
}

/// Outcome of probing one candidate path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointCandidate {
    pub url: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Transport failure text when no response was obtained
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EndpointCandidate {
    pub fn responded(url: String, status_code: u16) -> Self {
        Self {
            url,
            available: status_code != 404,
            status_code: Some(status_code),
            error: None,
        }
    }

    pub fn unreachable(url: String, error: String) -> Self {
        Self {
            url,
            available: false,
            status_code: None,
            error: Some(error),
        }
    }

    pub fn got_response(&self) -> bool {
        self.status_code.is_some()
    }
}

/// Verdict for a single target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub accessible: bool,
    pub vulnerable: bool,
    pub endpoints: Vec<EndpointCandidate>,
    pub message: String,
}

/// Outcome of a job submission attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExploitResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub endpoint: String,
    pub retry_attempts: u32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Body returned by the Ray job API on successful submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobSubmissionResponse {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub submission_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Per-target line of a batch scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetFinding {
    pub target: Target,
    pub accessible: bool,
    pub vulnerable: bool,
    pub message: String,
    pub endpoints: Vec<EndpointCandidate>,
}

impl TargetFinding {
    pub fn from_probe(target: Target, probe: ProbeResult) -> Self {
        Self {
            target,
            accessible: probe.accessible,
            vulnerable: probe.vulnerable,
            message: probe.message,
            endpoints: probe.endpoints,
        }
    }
}

/// Aggregated result of one batch scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub scan_id: String,
    pub total_targets: usize,
    pub vulnerable_targets: usize,
    pub accessible_targets: usize,
    pub risk_score: u8,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub findings: Vec<TargetFinding>,
    pub started_at: String,
    pub completed_at: String,
}

impl ScanRecord {
    pub fn inaccessible_targets(&self) -> usize {
        self.total_targets.saturating_sub(self.accessible_targets)
    }
}
