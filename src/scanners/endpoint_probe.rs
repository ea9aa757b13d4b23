// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use crate::config::ProbeConfig;
use crate::errors::ScannerResult;
use crate::http_client::HttpTransport;
use crate::scanners::TargetOperation;
use crate::types::{EndpointCandidate, ProbeResult, Target};
use crate::validation::InputValidator;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

pub const MSG_NOT_ACCESSIBLE: &str = "Target is not accessible or Ray server is not running";
pub const MSG_VULNERABLE: &str =
    "Target is VULNERABLE - Ray job submission endpoints are accessible without authentication";
pub const MSG_NOT_VULNERABLE: &str =
    "Target is accessible but job submission endpoints are not available";

/// Checks which candidate job API paths answer on a target
pub struct EndpointProbe {
    transport: Arc<dyn HttpTransport>,
    candidate_paths: Vec<String>,
    validator: InputValidator,
}

impl EndpointProbe {
    pub fn new(transport: Arc<dyn HttpTransport>, candidate_paths: Vec<String>) -> Self {
        Self {
            transport,
            candidate_paths,
            validator: InputValidator::default(),
        }
    }

    pub fn from_config(transport: Arc<dyn HttpTransport>, config: &ProbeConfig) -> Self {
        Self::new(transport, config.candidate_paths.clone())
    }

    /// Validate the target, then probe it
    pub async fn check(&self, target: &Target) -> ScannerResult<ProbeResult> {
        self.validator.validate_target(target).into_result()?;
        Ok(self.probe(target).await)
    }

    /// Probe every candidate path in order. Never short-circuits: the verdict
    /// has to reflect all candidates.
    pub async fn probe(&self, target: &Target) -> ProbeResult {
        let label = target.label();
        let mut endpoints = Vec::with_capacity(self.candidate_paths.len());

        for url in target.candidate_urls(&self.candidate_paths) {
            let candidate = match self.transport.get(&url).await {
                Ok(response) => {
                    debug!(
                        target = %label,
                        endpoint = %url,
                        status = response.status_code,
                        "Candidate endpoint responded"
                    );
                    EndpointCandidate::responded(url, response.status_code)
                }
                Err(err) => {
                    debug!(
                        target = %label,
                        endpoint = %url,
                        error = %err,
                        "Candidate endpoint unreachable"
                    );
                    EndpointCandidate::unreachable(url, err.to_string())
                }
            };
            endpoints.push(candidate);
        }

        let accessible = endpoints.iter().any(EndpointCandidate::got_response);
        let vulnerable = endpoints.iter().any(|e| e.available);

        let message = if !accessible {
            MSG_NOT_ACCESSIBLE
        } else if vulnerable {
            MSG_VULNERABLE
        } else {
            MSG_NOT_VULNERABLE
        };

        info!(
            target = %label,
            accessible = accessible,
            vulnerable = vulnerable,
            "Probe complete"
        );

        ProbeResult {
            accessible,
            vulnerable,
            endpoints,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl TargetOperation for EndpointProbe {
    type Output = ScannerResult<ProbeResult>;

    fn name(&self) -> &'static str {
        "check-ray-vulnerability"
    }

    async fn run(&self, target: &Target) -> Self::Output {
        self.check(target).await
    }
}
