//! Scan service wire types and reply interpretation

use crate::error::{Error, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Highest score the service reports
pub const MAX_RISK_SCORE: f64 = 10.0;

/// Lower bound of the Medium band
const MEDIUM_THRESHOLD: f64 = 4.0;

/// Lower bound of the High band
const HIGH_THRESHOLD: f64 = 7.0;

/// Body of a scan request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    /// Trimmed URL as typed by the user
    pub url: String,
}

impl ScanRequest {
    /// Create a request for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Raw reply from the scan service, before interpretation
#[derive(Debug, Clone)]
pub struct ServiceReply {
    /// HTTP status code
    pub status: u16,
    /// Response body text
    pub body: String,
}

impl ServiceReply {
    /// Create a reply
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Successful scan response
#[derive(Debug, Clone, Deserialize)]
pub struct ScanResponse {
    /// URL the service scanned
    pub url: String,

    /// Risk score, nominally 0 to 10
    pub risk_score: f64,

    /// Named checks in the order the service listed them
    pub checks: Checks,

    /// Overall verdict, if the service gave one
    #[serde(default)]
    pub is_phishing: Option<bool>,

    /// When the scan ran, as reported by the service
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Result of a single check
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawCheckResult")]
pub struct CheckResult {
    /// Whether the check flagged the URL
    pub is_suspicious: bool,
    /// Explanations in narrative order
    pub reasons: Vec<String>,
}

/// Older services report `passed` instead of `is_suspicious`
#[derive(Deserialize)]
struct RawCheckResult {
    #[serde(default)]
    is_suspicious: Option<bool>,
    #[serde(default)]
    passed: Option<bool>,
    reasons: Vec<String>,
}

impl From<RawCheckResult> for CheckResult {
    fn from(raw: RawCheckResult) -> Self {
        let is_suspicious = raw
            .is_suspicious
            .or(raw.passed.map(|passed| !passed))
            .unwrap_or(false);
        Self {
            is_suspicious,
            reasons: raw.reasons,
        }
    }
}

/// Ordered `(name, result)` pairs, preserving the JSON object order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checks(Vec<(String, CheckResult)>);

impl Checks {
    /// Build from pairs
    pub fn new(entries: Vec<(String, CheckResult)>) -> Self {
        Self(entries)
    }

    /// Iterate in source order
    pub fn iter(&self) -> impl Iterator<Item = &(String, CheckResult)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Checks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ChecksVisitor;

        impl<'de> Visitor<'de> for ChecksVisitor {
            type Value = Checks;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of check name to check result")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Checks, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, result)) = map.next_entry::<String, CheckResult>()? {
                    entries.push((name, result));
                }
                Ok(Checks(entries))
            }
        }

        deserializer.deserialize_map(ChecksVisitor)
    }
}

/// Only the `error` field, read before the full shape
#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Turn a raw reply into a scan response or a failure
///
/// A service-reported `error` wins over the HTTP status, which wins over body parsing.
pub fn interpret_reply(reply: &ServiceReply) -> Result<ScanResponse> {
    // Any non-null `error` means the service refused the scan
    if let Ok(ErrorEnvelope { error: Some(error) }) =
        serde_json::from_str::<ErrorEnvelope>(&reply.body)
    {
        match error {
            serde_json::Value::Null => {}
            serde_json::Value::String(message) => return Err(Error::ServiceReported(message)),
            other => return Err(Error::ServiceReported(other.to_string())),
        }
    }

    // Status only matters when the body did not explain itself
    if !reply.is_success() {
        return Err(Error::HttpStatus(reply.status));
    }

    serde_json::from_str(&reply.body).map_err(|e| Error::MalformedResponse(e.to_string()))
}

/// Qualitative risk band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    /// Score in [0, 4)
    Low,
    /// Score in [4, 7)
    Medium,
    /// Score in [7, 10]
    High,
}

impl RiskBand {
    /// Band for a score
    pub fn from_score(score: f64) -> Self {
        if score < MEDIUM_THRESHOLD {
            Self::Low
        } else if score < HIGH_THRESHOLD {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Badge label
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }

    /// Colour treatment for bar and badge
    pub fn color(self) -> Tone {
        match self {
            Self::Low => Tone::Green,
            Self::Medium => Tone::Yellow,
            Self::High => Tone::Red,
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named colour treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Yellow,
    Red,
}

/// Score clamped into [0, 10], remembering whether clamping happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskScore {
    value: f64,
    out_of_range: bool,
}

impl RiskScore {
    /// Clamp a reported score
    pub fn new(reported: f64) -> Self {
        // Adding +0.0 turns -0.0 into 0.0
        let value = reported.clamp(0.0, MAX_RISK_SCORE) + 0.0;
        Self {
            value,
            out_of_range: value != reported,
        }
    }

    pub fn value(self) -> f64 {
        self.value
    }

    /// True when the service sent a score outside [0, 10]
    pub fn out_of_range(self) -> bool {
        self.out_of_range
    }

    pub fn band(self) -> RiskBand {
        RiskBand::from_score(self.value)
    }

    /// Fill of the risk bar in percent
    pub fn percent(self) -> f64 {
        (self.value / MAX_RISK_SCORE) * 100.0
    }
}
