// Copyright (c) 2025 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! RaySentry - Performance Benchmarks
//! © 2026 Bountyy Oy
//!
//! Benchmarks for validation, scoring, report rendering and probing throughput

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use raysentry_scanner::config::AppConfig;
use raysentry_scanner::errors::ScannerResult;
use raysentry_scanner::http_client::{HttpResponse, HttpTransport};
use raysentry_scanner::orchestrator::ScanOrchestrator;
use raysentry_scanner::reporting::{ReportFormat, ReportGenerator};
use raysentry_scanner::scorer;
use raysentry_scanner::types::{ScanRecord, Target, TargetFinding};
use raysentry_scanner::validation::InputValidator;
use std::sync::Arc;

/// Answers every probe instantly
struct StaticTransport;

#[async_trait]
impl HttpTransport for StaticTransport {
    async fn get(&self, url: &str) -> ScannerResult<HttpResponse> {
        Ok(HttpResponse {
            status_code: if url.ends_with("/api/jobs/") { 200 } else { 404 },
            body: String::new(),
            headers: Default::default(),
            duration_ms: 0,
        })
    }

    async fn post_json(&self, _url: &str, _json: &serde_json::Value) -> ScannerResult<HttpResponse> {
        Ok(HttpResponse {
            status_code: 200,
            body: r#"{"job_id":"1","submission_id":"s-1"}"#.to_string(),
            headers: Default::default(),
            duration_ms: 0,
        })
    }
}

fn benchmark_validation(c: &mut Criterion) {
    let validator = InputValidator::default();
    let hosts = vec![
        "192.0.2.1",
        "ray-head.internal.example.com",
        "a;rm -rf /",
        "host$(whoami)",
        "",
    ];
    let commands = vec![
        "id",
        "python -c 'print(1)'",
        "RM -RF / --no-preserve-root",
        "dd if=/dev/zero of=/dev/sda",
    ];

    c.bench_function("validate_host", |b| {
        b.iter(|| {
            for host in &hosts {
                let _ = validator.validate_host(black_box(host));
            }
        })
    });

    c.bench_function("validate_command", |b| {
        b.iter(|| {
            for command in &commands {
                let _ = validator.validate_command(black_box(command));
            }
        })
    });
}

fn benchmark_risk_scoring(c: &mut Criterion) {
    c.bench_function("risk_score", |b| {
        b.iter(|| {
            for total in 1..=100usize {
                let _ = scorer::risk_score(black_box(total / 3), black_box(total / 2), total);
            }
        })
    });
}

fn sample_record(targets: usize) -> ScanRecord {
    let findings: Vec<TargetFinding> = (0..targets)
        .map(|i| TargetFinding {
            target: Target::new(format!("10.0.{}.{}", i / 250, i % 250)),
            accessible: i % 2 == 0,
            vulnerable: i % 4 == 0,
            message: "Target is accessible but job submission endpoints are not available"
                .to_string(),
            endpoints: vec![],
        })
        .collect();

    let accessible = findings.iter().filter(|f| f.accessible).count();
    let vulnerable = findings.iter().filter(|f| f.vulnerable).count();

    ScanRecord {
        scan_id: "scan-1700000000000-benchmark".to_string(),
        total_targets: targets,
        vulnerable_targets: vulnerable,
        accessible_targets: accessible,
        risk_score: scorer::risk_score(vulnerable, accessible, targets),
        summary: scorer::summary(vulnerable, targets),
        recommendations: scorer::recommendations(vulnerable),
        findings,
        started_at: "2026-01-01T00:00:00.000Z".to_string(),
        completed_at: "2026-01-01T00:00:05.000Z".to_string(),
    }
}

fn benchmark_report_rendering(c: &mut Criterion) {
    let at = Utc.timestamp_opt(1_767_225_600, 0).single().unwrap();
    let mut group = c.benchmark_group("report_rendering");

    for size in [10usize, 100, 1000] {
        let record = sample_record(size);

        group.bench_with_input(BenchmarkId::new("text", size), &record, |b, record| {
            let generator = ReportGenerator::new(ReportFormat::Text);
            b.iter(|| generator.render_at(black_box(record), at))
        });

        group.bench_with_input(BenchmarkId::new("json", size), &record, |b, record| {
            let generator = ReportGenerator::new(ReportFormat::Json);
            b.iter(|| generator.render_at(black_box(record), at))
        });
    }

    group.finish();
}

fn benchmark_batch_scan(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let orchestrator =
        ScanOrchestrator::from_config(Arc::new(StaticTransport), &AppConfig::default());
    let targets: Vec<Target> = (0..200)
        .map(|i| Target::new(format!("10.1.0.{}", i)))
        .collect();

    c.bench_function("batch_scan_200_targets", |b| {
        b.to_async(&runtime)
            .iter(|| async { orchestrator.scan(black_box(&targets), true).await })
    });
}

criterion_group!(
    benches,
    benchmark_validation,
    benchmark_risk_scoring,
    benchmark_report_rendering,
    benchmark_batch_scan
);
criterion_main!(benches);
