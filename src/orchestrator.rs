// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scan Orchestrator
 * Batch probing with a single aggregation point
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::config::AppConfig;
use crate::errors::{ScannerError, ScannerResult};
use crate::http_client::HttpTransport;
use crate::scanners::EndpointProbe;
use crate::scorer;
use crate::types::{ScanRecord, Target, TargetFinding};
use crate::validation::InputValidator;
use chrono::{SecondsFormat, Utc};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{error, info};

pub struct ScanOrchestrator {
    probe: EndpointProbe,
    validator: InputValidator,
    max_concurrency: usize,
}

impl ScanOrchestrator {
    pub fn new(probe: EndpointProbe, max_concurrency: usize) -> Self {
        Self {
            probe,
            validator: InputValidator::default(),
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn from_config(transport: Arc<dyn HttpTransport>, config: &AppConfig) -> Self {
        Self::new(
            EndpointProbe::from_config(transport, &config.probe),
            config.scan.max_concurrency,
        )
    }

    /// Every fatal check runs before the first request goes out
    fn preflight(&self, targets: &[Target], authorization_confirmed: bool) -> ScannerResult<()> {
        if !authorization_confirmed {
            error!("Scan refused: authorization not confirmed");
            return Err(ScannerError::AuthorizationNotConfirmed);
        }

        if targets.is_empty() {
            return Err(ScannerError::NoTargets);
        }

        for target in targets {
            self.validator.validate_target(target).into_result()?;
        }

        Ok(())
    }

    /// Probe every target and aggregate the verdicts into one record.
    ///
    /// Targets are probed concurrently up to `max_concurrency`; findings keep
    /// input order and tallies are computed once all probes have joined.
    pub async fn scan(
        &self,
        targets: &[Target],
        authorization_confirmed: bool,
    ) -> ScannerResult<ScanRecord> {
        self.preflight(targets, authorization_confirmed)?;

        let scan_id = scorer::generate_scan_id();
        let started_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        info!(
            scan_id = %scan_id,
            targets = targets.len(),
            concurrency = self.max_concurrency,
            "Starting batch scan"
        );

        let probes = stream::iter(targets.iter())
            .map(|target| self.probe.probe(target))
            .buffered(self.max_concurrency)
            .collect::<Vec<_>>()
            .await;

        let findings: Vec<TargetFinding> = targets
            .iter()
            .cloned()
            .zip(probes)
            .map(|(target, probe)| TargetFinding::from_probe(target, probe))
            .collect();

        let total_targets = findings.len();
        let accessible_targets = findings.iter().filter(|f| f.accessible).count();
        let vulnerable_targets = findings.iter().filter(|f| f.vulnerable).count();
        let risk_score = scorer::risk_score(vulnerable_targets, accessible_targets, total_targets);

        info!(
            scan_id = %scan_id,
            total = total_targets,
            accessible = accessible_targets,
            vulnerable = vulnerable_targets,
            risk_score = risk_score,
            "Batch scan complete"
        );

        Ok(ScanRecord {
            scan_id,
            total_targets,
            vulnerable_targets,
            accessible_targets,
            risk_score,
            summary: scorer::summary(vulnerable_targets, total_targets),
            recommendations: scorer::recommendations(vulnerable_targets),
            findings,
            started_at,
            completed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}
