// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * RaySentry - Ray Job API Exposure Scanner
 * Standalone CLI for authorized assessment of Ray dashboards
 *
 * Features:
 * - Unauthenticated job API detection on both API generations
 * - Proof-of-concept job submission with bounded retry
 * - Batch scans with risk score and remediation tracks
 * - Text and JSON reports
 *
 * (c) 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use raysentry_scanner::config::{load_config_with_overrides, AppConfig, ConfigLoader};
use raysentry_scanner::errors::ScannerError;
use raysentry_scanner::orchestrator::ScanOrchestrator;
use raysentry_scanner::reporting::{ReportFormat, ReportGenerator};
use raysentry_scanner::scanners::{build_http_client, EndpointProbe, ExploitExecutor, TargetOperation};
use raysentry_scanner::types::{ExploitResult, ProbeResult, Target};

/// RaySentry - Ray Job API Exposure Scanner
#[derive(Parser)]
#[command(name = "raysentry")]
#[command(author = "Bountyy Oy <info@bountyy.fi>")]
#[command(version)]
#[command(about = "Finds Ray clusters that accept jobs without authentication.", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Quiet mode - only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path (YAML, TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a target exposes the job API without authentication
    Check {
        /// Target hostname or IP address
        host: String,

        /// Target port (defaults to probe.default_port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Use HTTPS
        #[arg(long)]
        ssl: bool,

        /// Request timeout in milliseconds (overrides probe.timeout_ms)
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit a command as a Ray job (AUTHORIZED TARGETS ONLY)
    Exploit {
        /// Target hostname or IP address
        host: String,

        /// Shell entrypoint to submit
        #[arg(long)]
        command: String,

        /// Target port (defaults to probe.default_port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Use HTTPS
        #[arg(long)]
        ssl: bool,

        /// Retries per candidate endpoint (overrides retry.max_retries)
        #[arg(long)]
        max_retries: Option<u32>,

        /// Request timeout in milliseconds (overrides exploit.timeout_ms)
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Confirm written authorization to test this target
        #[arg(long)]
        authorized: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan a batch of targets and produce a risk report
    Scan {
        /// Target hosts
        hosts: Vec<String>,

        /// File with targets (YAML, TOML or JSON)
        #[arg(short, long)]
        targets_file: Option<PathBuf>,

        /// Port for hosts given on the command line
        #[arg(short, long)]
        port: Option<u16>,

        /// Use HTTPS for hosts given on the command line
        #[arg(long)]
        ssl: bool,

        /// Confirm written authorization to scan these targets
        #[arg(long)]
        authorized: bool,

        /// Report format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate sample configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "raysentry.toml")]
        output: PathBuf,
    },

    /// Show scanner version and build info
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config_with_overrides(cli.config.as_deref())?;

    init_logging(&cli, &config);
    match &cli.config {
        Some(path) => debug!("Configuration loaded from {}", path.display()),
        None => debug!("Configuration built from defaults and environment"),
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("raysentry")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli, config))
}

/// Flags win over RUST_LOG, which wins over the configured level
fn init_logging(cli: &Cli, config: &AppConfig) {
    let forced = if cli.debug {
        Some("debug")
    } else if cli.verbose {
        Some("info")
    } else if cli.quiet {
        Some("error")
    } else {
        None
    };

    let filter = match forced {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level)),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    if config.observability.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn async_main(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command {
        Commands::Check {
            host,
            port,
            ssl,
            timeout_ms,
            json,
        } => {
            let target = build_target(&config, host, port, ssl);
            let timeout = request_timeout(config.probe.timeout(), timeout_ms)?;
            run_check(&config, target, timeout, json).await
        }
        Commands::Exploit {
            host,
            command,
            port,
            ssl,
            max_retries,
            timeout_ms,
            authorized,
            json,
        } => {
            if !authorized {
                return Err(ScannerError::AuthorizationNotConfirmed.into());
            }
            let target = build_target(&config, host, port, ssl);
            let timeout = request_timeout(config.exploit.timeout(), timeout_ms)?;
            run_exploit(&config, target, command, max_retries, timeout, json).await
        }
        Commands::Scan {
            hosts,
            targets_file,
            port,
            ssl,
            authorized,
            format,
            output,
        } => {
            let mut targets: Vec<Target> = hosts
                .into_iter()
                .map(|host| build_target(&config, host, port, ssl))
                .collect();

            if let Some(path) = targets_file {
                let loaded = ConfigLoader::new(&path)?
                    .load_targets(config.probe.default_port)
                    .with_context(|| format!("Failed to load targets from {}", path.display()))?;
                info!("Loaded {} targets from {}", loaded.len(), path.display());
                targets.extend(loaded);
            }

            run_scan(&config, targets, authorized, format.into(), output).await
        }
        Commands::Init { output } => generate_config(output),
        Commands::Version => show_version(),
    }
}

fn build_target(config: &AppConfig, host: String, port: Option<u16>, ssl: bool) -> Target {
    Target::new(host)
        .with_port(port.unwrap_or(config.probe.default_port))
        .with_ssl(ssl)
}

/// A per-invocation timeout wins over the configured one
fn request_timeout(configured: Duration, override_ms: Option<u64>) -> Result<Duration> {
    match override_ms {
        Some(0) => {
            Err(ScannerError::Validation("Timeout must be greater than 0".to_string()).into())
        }
        Some(ms) => Ok(Duration::from_millis(ms)),
        None => Ok(configured),
    }
}

async fn run_check(
    config: &AppConfig,
    target: Target,
    timeout: Duration,
    json: bool,
) -> Result<()> {
    let client = build_http_client(config, timeout)?;
    let probe = EndpointProbe::from_config(Arc::new(client), &config.probe);

    info!("[{}] Checking {}", probe.name(), target.base_url());
    let result = probe.run(&target).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_probe(&target, &result);
    }

    Ok(())
}

async fn run_exploit(
    config: &AppConfig,
    target: Target,
    command: String,
    max_retries: Option<u32>,
    timeout: Duration,
    json: bool,
) -> Result<()> {
    let mut policy = config.retry.to_policy();
    if let Some(max_retries) = max_retries {
        policy = policy.with_max_retries(max_retries);
    }

    let client = build_http_client(config, timeout)?;
    let executor = ExploitExecutor::from_config(Arc::new(client), config);
    let operation = executor.with_command(command, policy);

    warn!("[{}] Submitting job to {}", operation.name(), target.base_url());
    let result = operation.run(&target).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_exploit(&result);
    }

    Ok(())
}

async fn run_scan(
    config: &AppConfig,
    targets: Vec<Target>,
    authorized: bool,
    format: ReportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let client = build_http_client(config, config.probe.timeout())?;
    let orchestrator = ScanOrchestrator::from_config(Arc::new(client), config);

    let record = orchestrator.scan(&targets, authorized).await?;
    let report = ReportGenerator::new(format).render(&record)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &report.report_text)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("Report written to: {}", path.display());
        }
        None => println!("{}", report.report_text),
    }

    Ok(())
}

fn print_probe(target: &Target, result: &ProbeResult) {
    println!("Target:     {}", target.base_url());
    println!("Accessible: {}", result.accessible);
    println!("Vulnerable: {}", result.vulnerable);
    println!();
    println!("{:<55} {:>6}  {}", "ENDPOINT", "STATUS", "AVAILABLE");
    for endpoint in &result.endpoints {
        let status = endpoint
            .status_code
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let detail = match &endpoint.error {
            Some(error) => format!("no ({})", error),
            None if endpoint.available => "yes".to_string(),
            None => "no".to_string(),
        };
        println!("{:<55} {:>6}  {}", endpoint.url, status, detail);
    }
    println!();
    println!("{}", result.message);
}

fn print_exploit(result: &ExploitResult) {
    if let Some(warning) = &result.warning {
        println!("{}", warning);
        println!();
    }

    println!("{}", result.message);
    println!("Endpoint:       {}", result.endpoint);
    println!("Retry attempts: {}", result.retry_attempts);

    if let Some(job_id) = &result.job_id {
        println!("Job ID:         {}", job_id);
    }
    if let Some(submission_id) = &result.submission_id {
        println!("Submission ID:  {}", submission_id);
    }
    if let Some(status) = &result.status {
        println!("Status:         {}", status);
    }
    if let Some(kind) = &result.error_kind {
        println!("Error kind:     {}", kind);
    }
    if let Some(error) = &result.error {
        println!("Error:          {}", error);
    }
    if let Some(hint) = &result.hint {
        println!("Hint:           {}", hint);
    }
}

fn generate_config(output: PathBuf) -> Result<()> {
    std::fs::write(&output, AppConfig::sample_toml()?)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Configuration file generated: {}", output.display());
    println!("\nEdit this file and run: raysentry scan --config {}", output.display());

    Ok(())
}

fn show_version() -> Result<()> {
    let current_year = chrono::Utc::now().format("%Y");
    println!("RaySentry v{}", env!("CARGO_PKG_VERSION"));
    println!("Ray job API exposure scanner");
    println!();
    println!("(c) {} Bountyy Oy", current_year);
    println!();
    println!("Build info:");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("Supported outputs: Text, JSON");

    Ok(())
}
