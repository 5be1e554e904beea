//! Page model owned by the scan controller
//!
//! Holds the input field, the trigger control, and the three output regions
//! (loading indicator, results panel, error panel). Region visibility is derived
//! from a single [`UiState`], so results and error can never show at once.

use crate::response::{RiskBand, Tone};
use serde::Serialize;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UiState {
    /// Nothing shown, ready for input
    #[default]
    Idle,
    /// Scan in flight
    Loading,
    /// Last scan rendered
    ResultsShown,
    /// Last attempt failed
    ErrorShown,
}

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    /// Validated request is about to be sent
    Submitted,
    /// Response rendered into the results panel
    Rendered,
    /// An error message was presented
    Failed,
    /// Busy state released at the end of a scan
    Released,
}

impl UiState {
    /// The single transition function
    pub fn next(self, event: StateEvent) -> Self {
        match (self, event) {
            (_, StateEvent::Submitted) => Self::Loading,
            (Self::Loading, StateEvent::Rendered) => Self::ResultsShown,
            (_, StateEvent::Failed) => Self::ErrorShown,
            // Released without an outcome (panic or dropped future)
            (Self::Loading, StateEvent::Released) => Self::Idle,
            (state, _) => state,
        }
    }
}

/// Scan trigger (button) state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trigger {
    /// Accepts clicks
    pub enabled: bool,
    /// Busy styling applied
    pub busy: bool,
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            enabled: true,
            busy: false,
        }
    }
}

/// How a region is brought into view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollRequest {
    /// Animate the scroll
    pub smooth: bool,
    /// Centre the region vertically
    pub center: bool,
}

/// Check badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckStatus {
    Suspicious,
    Safe,
}

impl CheckStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Suspicious => "Suspicious",
            Self::Safe => "Safe",
        }
    }

    pub fn color(self) -> Tone {
        match self {
            Self::Suspicious => Tone::Red,
            Self::Safe => Tone::Green,
        }
    }
}

/// One rendered check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckBlock {
    /// Humanized check name
    pub title: String,
    pub status: CheckStatus,
    /// Bullet entries, in order
    pub reasons: Vec<String>,
}

/// Proportional risk indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskBar {
    /// Fill in percent
    pub percent: f64,
    pub color: Tone,
}

/// Results region content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsPanel {
    pub scanned_url: String,
    pub score_text: String,
    pub bar: RiskBar,
    pub band: RiskBand,
    pub badge: String,
    /// Service sent a score outside [0, 10]
    pub score_out_of_range: bool,
    pub is_phishing: Option<bool>,
    pub timestamp: Option<String>,
    pub checks: Vec<CheckBlock>,
}

impl Default for ResultsPanel {
    fn default() -> Self {
        Self {
            scanned_url: String::new(),
            score_text: String::new(),
            bar: RiskBar {
                percent: 0.0,
                color: RiskBand::Low.color(),
            },
            band: RiskBand::Low,
            badge: String::new(),
            score_out_of_range: false,
            is_phishing: None,
            timestamp: None,
            checks: Vec::new(),
        }
    }
}

/// Error region content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorPanel {
    pub message: String,
    /// Pending request to bring the region into view
    pub scroll: Option<ScrollRequest>,
}

/// The whole page
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanPage {
    pub input: String,
    pub trigger: Trigger,
    state: UiState,
    results: ResultsPanel,
    error: ErrorPanel,
}

impl ScanPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    /// Apply a state event
    pub fn apply(&mut self, event: StateEvent) {
        let next = self.state.next(event);
        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, ?event, "ui state transition");
        }
        self.state = next;
    }

    pub fn loading_visible(&self) -> bool {
        self.state == UiState::Loading
    }

    /// Results region, if visible
    pub fn results(&self) -> Option<&ResultsPanel> {
        (self.state == UiState::ResultsShown).then_some(&self.results)
    }

    /// Error region, if visible
    pub fn error(&self) -> Option<&ErrorPanel> {
        (self.state == UiState::ErrorShown).then_some(&self.error)
    }

    pub(crate) fn results_mut(&mut self) -> &mut ResultsPanel {
        &mut self.results
    }

    pub(crate) fn error_mut(&mut self) -> &mut ErrorPanel {
        &mut self.error
    }
}
