//! Rendering of scan responses and error messages into the page

use crate::page::{CheckBlock, CheckStatus, ErrorPanel, ResultsPanel, RiskBar, ScrollRequest};
use crate::response::{CheckResult, RiskScore, ScanResponse};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// ASCII word character preceded by a non-word character or the start
static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^0-9A-Za-z_])([0-9A-Za-z_])").unwrap());

/// Replace the results panel content with a new response
pub fn render_results(response: &ScanResponse, panel: &mut ResultsPanel) {
    let score = RiskScore::new(response.risk_score);
    if score.out_of_range() {
        tracing::warn!(
            reported = response.risk_score,
            clamped = score.value(),
            "risk score outside 0-10, clamping"
        );
    }
    let band = score.band();

    panel.scanned_url = response.url.clone();
    panel.score_text = format_score(score.value());
    panel.bar = RiskBar {
        percent: score.percent(),
        color: band.color(),
    };
    panel.band = band;
    panel.badge = band.label().to_string();
    panel.score_out_of_range = score.out_of_range();
    panel.is_phishing = response.is_phishing;
    panel.timestamp = response.timestamp.clone();

    panel.checks.clear();
    panel
        .checks
        .extend(response.checks.iter().map(|(name, result)| check_block(name, result)));
}

/// Show a message in the error panel and bring it into view
pub fn present_error(panel: &mut ErrorPanel, message: &str) {
    panel.message = message.to_string();
    panel.scroll = Some(ScrollRequest {
        smooth: true,
        center: true,
    });
}

/// Score as `<score>/10`, shortest decimal form
pub fn format_score(score: f64) -> String {
    format!("{}/10", score)
}

/// `domain_age` -> `Domain Age`
pub fn humanize_check_name(name: &str) -> String {
    let spaced = name.replace('_', " ");
    WORD_START
        .replace_all(&spaced, |caps: &Captures| {
            format!("{}{}", &caps[1], caps[2].to_ascii_uppercase())
        })
        .into_owned()
}

fn check_block(name: &str, result: &CheckResult) -> CheckBlock {
    CheckBlock {
        title: humanize_check_name(name),
        status: if result.is_suspicious {
            CheckStatus::Suspicious
        } else {
            CheckStatus::Safe
        },
        reasons: result.reasons.clone(),
    }
}
