// Copyright (c) 2025 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Ray Job API Operations
 * Probe and job-submission operations against a single target
 *
 * @copyright 2025 Bountyy Oy
 * @license Proprietary
 */

use crate::config::AppConfig;
use crate::http_client::{HttpClient, HttpClientOptions};
use crate::types::Target;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

pub mod endpoint_probe;
pub mod exploit;

pub use endpoint_probe::EndpointProbe;
pub use exploit::{BoundExploit, ExploitExecutor};

/// A single-target operation. The set is closed: [`EndpointProbe`] and
/// [`BoundExploit`].
#[async_trait]
pub trait TargetOperation: Send + Sync {
    type Output: Send;

    fn name(&self) -> &'static str;

    async fn run(&self, target: &Target) -> Self::Output;
}

/// Build the production HTTP client for an operation with the given timeout
pub fn build_http_client(config: &AppConfig, timeout: Duration) -> Result<HttpClient> {
    HttpClient::with_options(HttpClientOptions {
        timeout,
        client_header: config.http.header_pair(),
        accept_invalid_certs: config.http.accept_invalid_certs,
    })
}
