// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - RaySentry Scanner Library
 * Ray job API exposure checks, authorized job submission and batch risk reporting
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod config;
pub mod types;

// Wire access
pub mod http_client;

// Production error handling and resilience modules
pub mod errors;
pub mod retry;

// Validation modules
pub mod validation;

// Probe and job submission operations
pub mod scanners;

// Batch scanning and scoring
pub mod orchestrator;
pub mod scorer;

pub mod reporting;

pub use errors::{ErrorCategory, ScannerError, ScannerResult};
pub use orchestrator::ScanOrchestrator;
pub use reporting::{Report, ReportFormat, ReportGenerator};
pub use retry::{RetryOutcome, RetryPolicy};
pub use scanners::{EndpointProbe, ExploitExecutor, TargetOperation};
pub use types::{ExploitResult, ProbeResult, ScanRecord, Target};
