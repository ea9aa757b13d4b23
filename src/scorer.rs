// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Risk Scorer
 * Turns batch tallies into a 0-100 risk score, summary and remediation tracks
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Weight of the vulnerability rate in the risk score
pub const VULNERABILITY_WEIGHT: f64 = 70.0;
/// Weight of the accessibility rate in the risk score
pub const ACCESSIBILITY_WEIGHT: f64 = 30.0;

const SCAN_ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `round(vulnerable/total * 70 + accessible/total * 30)`, 0 for an empty batch
pub fn risk_score(vulnerable: usize, accessible: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }

    let total = total as f64;
    let score = (vulnerable as f64 / total) * VULNERABILITY_WEIGHT
        + (accessible as f64 / total) * ACCESSIBILITY_WEIGHT;

    score.round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Critical,
    Medium,
    Low,
}

impl RiskTier {
    pub fn from_score(score: u8) -> Self {
        if score >= 70 {
            RiskTier::Critical
        } else if score >= 40 {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Critical => "critical",
            RiskTier::Medium => "medium",
            RiskTier::Low => "low",
        }
    }

    /// Upper-case label used in text reports
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Critical => "CRITICAL",
            RiskTier::Medium => "MEDIUM",
            RiskTier::Low => "LOW",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn summary(vulnerable: usize, total: usize) -> String {
    if vulnerable == 0 {
        format!(
            "GOOD NEWS: None of the {} scanned targets are vulnerable to unauthenticated Ray job submission.",
            total
        )
    } else {
        format!(
            "WARNING: {} out of {} targets are vulnerable to unauthenticated Ray job submission.",
            vulnerable, total
        )
    }
}

/// Fixed remediation tracks. Blank entries separate the tracks when joined.
pub fn recommendations(vulnerable: usize) -> Vec<String> {
    let lines: &[&str] = if vulnerable > 0 {
        &[
            "IMMEDIATE ACTIONS:",
            "   1. Enable Ray authentication on all vulnerable instances",
            "   2. Restrict network access to Ray ports (8265, 10001, 6379)",
            "   3. Implement firewall rules or VPN access control",
            "",
            "SHORT-TERM ACTIONS:",
            "   1. Update Ray to the latest version",
            "   2. Deploy monitoring and alerting",
            "",
            "LONG-TERM ACTIONS:",
            "   1. Regular security audits",
            "   2. Implement least privilege access",
        ]
    } else {
        &[
            "No immediate vulnerabilities detected",
            "",
            "MAINTAIN SECURITY POSTURE:",
            "   1. Keep Ray updated",
            "   2. Continue regular scans",
            "   3. Monitor for new CVEs",
        ]
    };

    lines.iter().map(|l| l.to_string()).collect()
}

/// `scan-{unix_millis}-{9 base36 chars}`. Only locally distinguishing.
pub fn generate_scan_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SCAN_ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();

    format!("scan-{}-{}", Utc::now().timestamp_millis(), suffix)
}
