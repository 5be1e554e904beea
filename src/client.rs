//! Scan service client
//!
//! [`ScanService`] is the seam between the controller and the remote scanner.
//! [`HttpScanService`] implements it over HTTP with reqwest.

use crate::error::{Error, Result};
use crate::response::{ScanRequest, ServiceReply};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// User agent for requests
const USER_AGENT: &str = concat!("url-scan/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default scan service location
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";

/// Scan endpoint path
const SCAN_PATH: &str = "/scan";

/// Health endpoint path
const HEALTH_PATH: &str = "/health";

/// Allowed URL schemes
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Remote scanning capability
///
/// Implementations only fail on transport problems. Status codes and bodies are
/// returned as-is for the controller to interpret.
#[async_trait(?Send)]
pub trait ScanService {
    /// Submit one scan request
    async fn submit(&self, request: &ScanRequest) -> Result<ServiceReply>;
}

/// Health endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    /// Reported status, "healthy" when up
    pub status: String,
    /// Server time
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// HTTP scan service client
#[derive(Debug, Clone)]
pub struct HttpScanService {
    client: Client,
    base_url: Url,
}

/// Builder for configuring an HttpScanService
#[derive(Debug)]
pub struct HttpScanServiceBuilder {
    base_url: String,
    timeout: Duration,
}

impl HttpScanServiceBuilder {
    /// Create a new builder for the given service base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Per-request timeout enforced by the transport
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client with the configured options
    pub fn build(self) -> Result<HttpScanService> {
        HttpScanService::build_internal(&self.base_url, self.timeout)
    }
}

impl HttpScanService {
    /// Create a client for the given service base URL with default settings
    pub fn new(base_url: &str) -> Result<Self> {
        Self::build_internal(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a builder for configuring client options
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use url_scan::HttpScanService;
    ///
    /// let service = HttpScanService::builder("http://127.0.0.1:5000")
    ///     .timeout(Duration::from_secs(5))
    ///     .build()?;
    /// # Ok::<(), url_scan::Error>(())
    /// ```
    pub fn builder(base_url: &str) -> HttpScanServiceBuilder {
        HttpScanServiceBuilder::new(base_url)
    }

    fn build_internal(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| Error::InvalidServiceUrl(e.to_string()))?;

        if !ALLOWED_SCHEMES.contains(&base_url.scheme()) {
            return Err(Error::InvalidServiceUrl(format!(
                "scheme '{}' not allowed (use http or https)",
                base_url.scheme()
            )));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Service base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Query the service health endpoint
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .client
            .get(self.endpoint(HEALTH_PATH))
            .send()
            .await
            .map_err(|e| Error::HttpRequest(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::HttpStatus(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(e.to_string()))
    }

    /// Absolute URL for an endpoint path, keeping any base path prefix
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

#[async_trait(?Send)]
impl ScanService for HttpScanService {
    async fn submit(&self, request: &ScanRequest) -> Result<ServiceReply> {
        let endpoint = self.endpoint(SCAN_PATH);
        tracing::debug!(%endpoint, url = %request.url, "submitting scan");

        let response = self
            .client
            .post(&endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::HttpRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::HttpRequest(e.to_string()))?;

        Ok(ServiceReply::new(status, body))
    }
}
