// Copyright (c) 2025 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use crate::reporting::types::JsonReportDocument;
use crate::scorer::RiskTier;
use crate::types::ScanRecord;
use anyhow::Result;

pub struct JsonReportGenerator;

impl JsonReportGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, record: &ScanRecord, generated_at: &str) -> Result<String> {
        let document = JsonReportDocument {
            record,
            risk_tier: RiskTier::from_score(record.risk_score),
            inaccessible_targets: record.inaccessible_targets(),
            generated_at,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

impl Default for JsonReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
