//! URL Scan - client for a phishing URL scan service
//!
//! Submits a URL to a remote scan service and renders the returned risk
//! assessment (score, risk band, and per-check breakdown) into a page model.
//!
//! # Example
//!
//! ```no_run
//! use url_scan::{HttpScanService, ScanController};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> url_scan::Result<()> {
//!     let service = HttpScanService::new("http://127.0.0.1:5000")?;
//!     let controller = ScanController::new(service);
//!     controller.run_scan("https://example.com").await;
//!     if let Some(results) = controller.page().results() {
//!         println!("{} ({})", results.score_text, results.badge);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod controller;
pub mod error;
pub mod input;
pub mod output;
pub mod page;
pub mod render;
pub mod response;

pub use client::{HealthStatus, HttpScanService, HttpScanServiceBuilder, ScanService};
pub use controller::{Key, ScanController, UiEvent};
pub use error::{Error, ErrorClass, Result};
pub use output::{OutputFormat, output_page};
pub use page::{CheckBlock, CheckStatus, ErrorPanel, ResultsPanel, ScanPage, UiState};
pub use response::{CheckResult, Checks, RiskBand, ScanRequest, ScanResponse, ServiceReply};
