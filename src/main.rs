//! URL Scan CLI - Check URLs against a phishing scan service

use clap::{Parser, ValueEnum};
use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use url_scan::{
    HttpScanService, Key, ScanController, ScanService, UiEvent, UiState,
    client::{DEFAULT_SERVICE_URL, DEFAULT_TIMEOUT_SECS},
    output::{OutputFormat, output_page},
};

/// URL phishing scanner - submits URLs to a scan service and shows the risk assessment
#[derive(Parser, Debug)]
#[command(name = "url-scan")]
#[command(version, about, long_about = None)]
struct Args {
    /// URL to scan (reads one URL per line from stdin when omitted)
    url: Option<String>,

    /// Base URL of the scan service
    #[arg(long = "service", env = "URL_SCAN_SERVICE", default_value = DEFAULT_SERVICE_URL)]
    service: String,

    /// Request timeout in seconds
    #[arg(long = "timeout", env = "URL_SCAN_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Output format
    #[arg(short = 'o', long = "output", default_value = "human", value_enum)]
    output_format: OutputFormatArg,

    /// Check the scan service health endpoint and exit
    #[arg(long = "health")]
    health: bool,
}

/// Output format argument
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
    None,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::None => OutputFormat::None,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let result = if args.health {
        run_health(&args).await
    } else {
        run(&args).await
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_service(args: &Args) -> url_scan::Result<HttpScanService> {
    HttpScanService::builder(&args.service)
        .timeout(Duration::from_secs(args.timeout))
        .build()
}

/// Returns whether every scan succeeded
async fn run(args: &Args) -> url_scan::Result<bool> {
    let controller = ScanController::new(build_service(args)?);
    let format = OutputFormat::from(args.output_format);
    let stdout = std::io::stdout();

    if let Some(url) = &args.url {
        return scan_line(&controller, url, format, &mut stdout.lock()).await;
    }

    let stdin = std::io::stdin();
    scan_lines(&controller, stdin.lock(), format, &mut stdout.lock()).await
}

/// Scan one URL per input line; false if any scan failed
async fn scan_lines<S: ScanService, R: BufRead, W: Write>(
    controller: &ScanController<S>,
    reader: R,
    format: OutputFormat,
    writer: &mut W,
) -> url_scan::Result<bool> {
    let mut ok = true;
    for line in reader.lines() {
        let line = line.map_err(url_scan::Error::ReadInput)?;
        // Keep going after a failure, but remember it for the exit code
        ok &= scan_line(controller, &line, format, writer).await?;
    }
    Ok(ok)
}

async fn scan_line<S: ScanService, W: Write>(
    controller: &ScanController<S>,
    line: &str,
    format: OutputFormat,
    writer: &mut W,
) -> url_scan::Result<bool> {
    // Same path as typing into the field and pressing Enter
    controller.handle(UiEvent::Input(line.to_string())).await;
    controller.handle(UiEvent::KeyPress(Key::Enter)).await;

    let page = controller.page();
    output_page(&page, format, writer)?;

    Ok(page.state() == UiState::ResultsShown)
}

async fn run_health(args: &Args) -> url_scan::Result<bool> {
    let service = build_service(args)?;
    let health = service.health().await?;
    println!(
        "{}: {}{}",
        service.base_url(),
        health.status,
        health
            .timestamp
            .as_deref()
            .map(|t| format!(" ({})", t))
            .unwrap_or_default()
    );
    Ok(health.is_healthy())
}
