// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! LazyXSS CLI - Reflected XSS Discovery
//!
//! Loads targets and payloads, runs the scan and writes the findings file
//! and report.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::{ArgGroup, Parser};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use lazyxss::payload::{load_payloads, load_targets};
use lazyxss::report::ReportFormat;
use lazyxss::scan::DEFAULT_OUTPUT;
use lazyxss::{
    CancelSignal, FindingSink, ReportWriter, ScanConfig, ScanContext, ScanCoordinator,
    ScanSummary,
};

#[derive(Parser, Debug)]
#[command(
    name = "lazyxss",
    version,
    about = "Reflected XSS discovery with real-browser confirmation"
)]
#[command(group(ArgGroup::new("input").required(true).args(["url", "file"])))]
struct Cli {
    /// Single target URL
    #[arg(short = 'u', long)]
    url: Option<String>,

    /// File with target URLs, one per line
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// Payload file, one per line
    #[arg(short = 'p', long, default_value = "payloads.txt")]
    payloads: PathBuf,

    /// Concurrent HTTP reflection checks
    #[arg(short = 't', long, default_value_t = 20)]
    threads: usize,

    /// Times to percent-encode each payload
    #[arg(short = 'e', long, default_value_t = 0)]
    encoding: u32,

    /// Findings file, one vulnerable URL per line
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Browser page load and dialog timeout in seconds
    #[arg(short = 'T', long = "time-sec", default_value_t = 2)]
    time_sec: u64,

    /// Chrome/Chromium executable
    #[arg(long)]
    chrome_path: Option<PathBuf>,

    /// Concurrent browser instances
    #[arg(long, default_value_t = 5)]
    browser_workers: usize,

    /// Upstream proxy for HTTP checks and browsers
    #[arg(long)]
    proxy: Option<String>,

    /// HTTP connect and read timeout in seconds
    #[arg(long, default_value_t = 20)]
    http_timeout: u64,

    /// Directory for the HTML report and JSON summary
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn scan_config(&self) -> ScanConfig {
        let mut config = ScanConfig::new()
            .encoding_rounds(self.encoding)
            .http_concurrency(self.threads)
            .browser_workers(self.browser_workers)
            .http_timeout(Duration::from_secs(self.http_timeout))
            .dialog_timeout(Duration::from_secs(self.time_sec))
            .output(Some(self.output.clone()));
        if let Some(ref proxy) = self.proxy {
            config = config.proxy(proxy.clone());
        }
        if let Some(ref path) = self.chrome_path {
            config = config.chrome_path(path.clone());
        }
        config
    }

    fn report_writer(&self) -> ReportWriter {
        let base = self
            .output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "lazyxss".to_string());

        match self.report_dir {
            Some(ref dir) => ReportWriter::new(dir, base),
            None => ReportWriter::new(".", base).formats(vec![ReportFormat::Html]),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let directive = if cli.verbose { "lazyxss=debug" } else { "lazyxss=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .init();

    match run(cli).await {
        Ok(summary) if summary.interrupted => ExitCode::from(130),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ScanSummary> {
    let config = cli.scan_config();
    config.validate()?;

    let targets = match (&cli.url, &cli.file) {
        (Some(url), _) => vec![url.trim().to_string()],
        (None, Some(file)) => load_targets(file)?,
        (None, None) => return Err(anyhow!("Provide a target with -u or a target file with -f")),
    };
    let payloads = load_payloads(&cli.payloads)?;

    check_dns(&targets[0]).await?;

    info!("Targets: {}", targets.len());
    info!("Payloads: {}", payloads.len());
    info!("Encoding rounds: {}", config.encoding_rounds);
    info!("HTTP threads: {}, timeout {}s", config.http_concurrency, cli.http_timeout);
    info!("Browser workers: {}, timeout {}s", config.browser_workers, cli.time_sec);
    if let Some(ref proxy) = config.proxy {
        info!("Proxy: {}", proxy);
    }

    let cancel = CancelSignal::new();
    spawn_interrupt_handler(cancel.clone());

    let sink = FindingSink::create(&cli.output)
        .with_context(|| format!("Cannot open output file {}", cli.output.display()))?;
    let context = ScanContext::with_sink(cancel, sink);

    let coordinator = ScanCoordinator::with_chrome(config)?;
    let summary = coordinator
        .run(&targets, &payloads, &context)
        .await
        .context("Browser startup failed; check Chrome/Chromium is installed or pass --chrome-path")?;

    print_summary(&summary, &cli.output);

    let writer = cli.report_writer();
    match writer.write(&summary) {
        Ok(files) => {
            for file in files {
                info!("Wrote {}", file.display());
            }
        }
        Err(e) => warn!("Failed to write report to {}: {}", writer.dir().display(), e),
    }

    Ok(summary)
}

/// Resolve the first target's host so a typo fails before any browser starts
async fn check_dns(target: &str) -> anyhow::Result<()> {
    let url = url::Url::parse(target).with_context(|| format!("Invalid URL: {}", target))?;
    let host = url
        .host_str()
        .ok_or_else(|| anyhow!("URL has no host: {}", target))?;
    let port = url.port_or_known_default().unwrap_or(80);

    tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("Cannot resolve host '{}'; check the URL and your network", host))?
        .next()
        .ok_or_else(|| anyhow!("Host '{}' resolved to no addresses", host))?;
    Ok(())
}

/// First Ctrl-C cancels the run; a second exits immediately
fn spawn_interrupt_handler(cancel: CancelSignal) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupt received, finishing in-flight checks (Ctrl-C again to force exit)");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            error!("Forced exit");
            std::process::exit(130);
        }
    });
}

fn print_summary(summary: &ScanSummary, output: &Path) {
    let stats = &summary.stats;
    let rows = [
        ("Targets", summary.targets.to_string()),
        ("Payloads", summary.payloads.to_string()),
        ("Candidates", stats.candidates.to_string()),
        ("Reflected", stats.reflected.to_string()),
        ("Vulnerable", summary.vulnerable().to_string()),
        ("Already covered", stats.covered.to_string()),
        ("Not vulnerable", summary.not_vulnerable().to_string()),
        ("Network errors", stats.network_errors.to_string()),
        ("Untested", stats.untested().to_string()),
        ("Browsers launched", summary.pool.launched.to_string()),
        ("Duration", format!("{:.2}s", summary.elapsed_secs)),
    ];

    let title = if summary.interrupted {
        "Scan Summary (interrupted)"
    } else {
        "Scan Summary"
    };

    println!("\n=== {} ===", title);
    for (label, value) in rows {
        println!("  {:<18} {}", label, value);
    }
    if summary.vulnerable() > 0 {
        println!("\nFindings written to {}", output.display());
        for finding in &summary.findings {
            println!("  - {}", finding);
        }
    }
}
