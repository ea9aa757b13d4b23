// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use crate::scorer::RiskTier;
use crate::types::{ScanRecord, TargetFinding};

const RULE: &str = "═══════════════════════════════════════════════════════════════";

/// Fixed-structure plain text report
pub struct TextReportGenerator;

impl TextReportGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, record: &ScanRecord, generated_at: &str) -> String {
        let tier = RiskTier::from_score(record.risk_score);
        let mut text = String::new();

        text.push_str("╔════════════════════════════════════════════════════════════════╗\n");
        text.push_str("║              RAYSENTRY - SECURITY SCAN REPORT                  ║\n");
        text.push_str("╚════════════════════════════════════════════════════════════════╝\n\n");

        text.push_str(&format!("Scan ID: {}\n", record.scan_id));
        text.push_str(&format!("Timestamp: {}\n", generated_at));
        text.push_str(&format!(
            "Risk Score: {}/100 {}\n\n",
            record.risk_score,
            tier.label()
        ));
        text.push_str(&format!("{}\n\n", RULE));

        text.push_str("SUMMARY:\n");
        text.push_str(&format!("{}\n\n", record.summary));

        text.push_str("STATISTICS:\n");
        text.push_str(&format!("- Total Targets Scanned: {}\n", record.total_targets));
        text.push_str(&format!("- Vulnerable Targets: {}\n", record.vulnerable_targets));
        text.push_str(&format!("- Accessible Targets: {}\n", record.accessible_targets));
        text.push_str(&format!(
            "- Inaccessible Targets: {}\n\n",
            record.inaccessible_targets()
        ));

        if !record.findings.is_empty() {
            text.push_str("TARGETS:\n");
            for finding in &record.findings {
                text.push_str(&finding_line(finding));
                text.push('\n');
            }
            text.push('\n');
        }

        text.push_str(&format!("{}\n\n", RULE));
        text.push_str("RECOMMENDATIONS:\n\n");
        text.push_str(&record.recommendations.join("\n"));
        text.push_str(&format!("\n\n{}\n\n", RULE));

        text.push_str("LEGAL NOTICE:\n");
        text.push_str("This scan was performed for authorized security testing purposes only.\n");
        text.push_str("Ensure all findings are handled according to your organization's security\n");
        text.push_str("policies and coordinated disclosure guidelines.\n\n");

        text.push_str(&format!(
            "Report generated by RaySentry v{}\n",
            env!("CARGO_PKG_VERSION")
        ));
        text.push_str(RULE);

        text
    }
}

impl Default for TextReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn finding_line(finding: &TargetFinding) -> String {
    let status = if finding.vulnerable {
        "VULNERABLE"
    } else if finding.accessible {
        "ACCESSIBLE"
    } else {
        "UNREACHABLE"
    };

    match &finding.target.description {
        Some(description) => format!(
            "- [{}] {} ({}): {}",
            status,
            finding.target.base_url(),
            description,
            finding.message
        ),
        None => format!(
            "- [{}] {}: {}",
            status,
            finding.target.base_url(),
            finding.message
        ),
    }
}
