// Copyright (c) 2025 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use crate::scorer::RiskTier;
use crate::types::ScanRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Rendered report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub report_text: String,
    pub scan_id: String,
    pub risk_score: u8,
    pub format: ReportFormat,
    pub generated_at: String,
}

/// JSON document: the scan record plus render-time fields
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReportDocument<'a> {
    #[serde(flatten)]
    pub record: &'a ScanRecord,
    pub risk_tier: RiskTier,
    pub inaccessible_targets: usize,
    pub generated_at: &'a str,
}
