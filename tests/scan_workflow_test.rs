// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Batch Scan Workflow Tests
 * Orchestrator, scoring and report rendering against simulated dashboards
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use raysentry_scanner::config::{AppConfig, ConfigLoader};
use raysentry_scanner::errors::{ErrorCategory, ScannerError, ScannerResult};
use raysentry_scanner::http_client::{HttpClient, HttpResponse, HttpTransport};
use raysentry_scanner::orchestrator::ScanOrchestrator;
use raysentry_scanner::reporting::{ReportFormat, ReportGenerator};
use raysentry_scanner::scorer;
use raysentry_scanner::types::Target;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct CountingTransport {
    calls: AtomicUsize,
}

#[async_trait]
impl HttpTransport for CountingTransport {
    async fn get(&self, _url: &str) -> ScannerResult<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(HttpResponse {
            status_code: 404,
            body: String::new(),
            headers: Default::default(),
            duration_ms: 0,
        })
    }

    async fn post_json(&self, _url: &str, _json: &serde_json::Value) -> ScannerResult<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        unreachable!("batch scans never submit jobs")
    }
}

async fn dashboard(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status))
        .expect(2)
        .mount(&server)
        .await;
    server
}

fn target_for(server: &MockServer) -> Target {
    let addr = server.address();
    Target::new(addr.ip().to_string()).with_port(addr.port())
}

fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn orchestrator() -> ScanOrchestrator {
    let client = HttpClient::new(Duration::from_secs(5)).unwrap();
    ScanOrchestrator::from_config(Arc::new(client), &AppConfig::default())
}

#[tokio::test]
async fn test_fatal_errors_abort_before_network() {
    let counter = Arc::new(CountingTransport::default());
    let orchestrator = ScanOrchestrator::from_config(counter.clone(), &AppConfig::default());

    let err = orchestrator.scan(&[], true).await.unwrap_err();
    assert!(matches!(err, ScannerError::NoTargets));
    assert_eq!(err.to_string(), "No targets provided for scanning");

    let err = orchestrator.scan(&[Target::new("a")], false).await.unwrap_err();
    assert!(matches!(err, ScannerError::AuthorizationNotConfirmed));
    assert!(err.to_string().contains("AUTHORIZATION NOT CONFIRMED"));

    let err = orchestrator
        .scan(&[Target::new("a;rm -rf /")], true)
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ValidationError);
    assert!(err.to_string().contains("potentially dangerous characters"));

    assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_mixed_batch_end_to_end() {
    let open = dashboard(200).await;
    let locked = dashboard(404).await;
    let down = Target::new("127.0.0.1")
        .with_port(closed_port())
        .with_description("decommissioned");

    let targets = vec![
        target_for(&open).with_description("training cluster"),
        target_for(&locked),
        down,
    ];

    let record = orchestrator().scan(&targets, true).await.unwrap();

    assert_eq!(record.total_targets, 3);
    assert_eq!(record.accessible_targets, 2);
    assert_eq!(record.vulnerable_targets, 1);
    assert_eq!(record.inaccessible_targets(), 1);
    // round(1/3*70 + 2/3*30) = round(43.33)
    assert_eq!(record.risk_score, 43);
    assert!(record.summary.starts_with("WARNING: 1 out of 3"));

    assert_eq!(record.findings.len(), 3);
    assert!(record.findings[0].vulnerable);
    assert!(record.findings[1].accessible && !record.findings[1].vulnerable);
    assert!(!record.findings[2].accessible);

    let report = ReportGenerator::new(ReportFormat::Text).render(&record).unwrap();
    assert_eq!(report.scan_id, record.scan_id);
    assert!(report.report_text.contains("Risk Score: 43/100 MEDIUM"));
    assert!(report.report_text.contains("(training cluster)"));
    assert!(report.report_text.contains("[UNREACHABLE]"));
}

#[tokio::test]
async fn test_clean_batch_reports_good_news() {
    let locked = dashboard(404).await;
    let record = orchestrator()
        .scan(&[target_for(&locked)], true)
        .await
        .unwrap();

    assert_eq!(record.risk_score, 30);
    assert!(record.summary.starts_with("GOOD NEWS"));

    let report = ReportGenerator::new(ReportFormat::Text).render(&record).unwrap();
    assert!(report.report_text.contains("Risk Score: 30/100 LOW"));
    assert!(report.report_text.contains("MAINTAIN SECURITY POSTURE:"));
}

#[tokio::test]
async fn test_targets_file_to_json_report() {
    let open = dashboard(200).await;
    let addr = open.address();

    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{"targets": [{{"host": "{}", "port": {}, "description": "from file"}}]}}"#,
        addr.ip(),
        addr.port()
    )
    .unwrap();

    let targets = ConfigLoader::new(file.path())
        .unwrap()
        .load_targets(AppConfig::default().probe.default_port)
        .unwrap();
    let record = orchestrator().scan(&targets, true).await.unwrap();
    assert_eq!(record.vulnerable_targets, 1);
    assert_eq!(record.risk_score, 100);

    let generated_at = Utc.timestamp_opt(1_767_225_600, 0).single().unwrap();
    let report = ReportGenerator::new(ReportFormat::Json)
        .render_at(&record, generated_at)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&report.report_text).unwrap();

    assert_eq!(value["riskTier"], "critical");
    assert_eq!(value["findings"][0]["target"]["description"], "from file");
    assert_eq!(value["generatedAt"], "2026-01-01T00:00:00.000Z");
}

#[tokio::test]
async fn test_targets_file_entries_take_configured_port() {
    let open = dashboard(200).await;
    let addr = open.address();

    let mut config = AppConfig::default();
    config.probe.default_port = addr.port();

    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(file, "targets:\n  - host: \"{}\"\n", addr.ip()).unwrap();

    let targets = ConfigLoader::new(file.path())
        .unwrap()
        .load_targets(config.probe.default_port)
        .unwrap();
    assert_eq!(targets[0].port, addr.port());

    let client = HttpClient::new(Duration::from_secs(5)).unwrap();
    let record = ScanOrchestrator::from_config(Arc::new(client), &config)
        .scan(&targets, true)
        .await
        .unwrap();
    assert_eq!(record.vulnerable_targets, 1);
}

#[test]
fn test_risk_score_reference_batch() {
    assert_eq!(scorer::risk_score(5, 8, 10), 59);
}

#[tokio::test]
async fn test_report_rendering_is_pure() {
    let locked = dashboard(404).await;
    let record = orchestrator()
        .scan(&[target_for(&locked)], true)
        .await
        .unwrap();

    let generator = ReportGenerator::new(ReportFormat::Text);
    let at = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap();

    let first = generator.render_at(&record, at).unwrap();
    let second = generator.render_at(&record, at).unwrap();
    assert_eq!(first, second);
}
