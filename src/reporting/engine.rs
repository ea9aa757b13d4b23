// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use crate::reporting::formats::{json::JsonReportGenerator, text::TextReportGenerator};
use crate::reporting::types::{Report, ReportFormat};
use crate::types::ScanRecord;
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

/// Renders a [`ScanRecord`]. Pure apart from the timestamp taken by [`render`].
///
/// [`render`]: ReportGenerator::render
pub struct ReportGenerator {
    format: ReportFormat,
}

impl ReportGenerator {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    pub fn render(&self, record: &ScanRecord) -> Result<Report> {
        self.render_at(record, Utc::now())
    }

    pub fn render_at(&self, record: &ScanRecord, generated_at: DateTime<Utc>) -> Result<Report> {
        let timestamp = generated_at.to_rfc3339_opts(SecondsFormat::Millis, true);

        let report_text = match self.format {
            ReportFormat::Text => TextReportGenerator::new().generate(record, &timestamp),
            ReportFormat::Json => JsonReportGenerator::new()
                .generate(record, &timestamp)
                .context("Failed to serialize JSON report")?,
        };

        debug!(
            scan_id = %record.scan_id,
            format = ?self.format,
            bytes = report_text.len(),
            "Report rendered"
        );

        Ok(Report {
            report_text,
            scan_id: record.scan_id.clone(),
            risk_score: record.risk_score,
            format: self.format,
            generated_at: timestamp,
        })
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(ReportFormat::Text)
    }
}
