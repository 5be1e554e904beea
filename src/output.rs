//! Terminal presentation of the scan page

use crate::error::{Error, Result};
use crate::page::{CheckBlock, ErrorPanel, ResultsPanel, ScanPage, UiState};
use crate::response::Tone;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL,
};
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable table output
    #[default]
    Human,
    /// JSON output
    Json,
    /// No output (silent mode)
    None,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "none" => Ok(Self::None),
            _ => Err(Error::InvalidOutputFormat(s.to_string())),
        }
    }
}

/// Visible part of the page, as written in JSON mode
#[derive(Serialize)]
struct PageSnapshot<'a> {
    state: UiState,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<&'a ResultsPanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a ErrorPanel>,
}

/// Output the visible page regions
pub fn output_page<W: Write>(page: &ScanPage, format: OutputFormat, writer: &mut W) -> Result<()> {
    match format {
        OutputFormat::Human => output_human(page, writer),
        OutputFormat::Json => output_json(page, writer),
        OutputFormat::None => Ok(()),
    }
}

/// Output JSON format
fn output_json<W: Write>(page: &ScanPage, writer: &mut W) -> Result<()> {
    let snapshot = PageSnapshot {
        state: page.state(),
        results: page.results(),
        error: page.error(),
    };
    serde_json::to_writer_pretty(&mut *writer, &snapshot)?;
    writeln!(writer).map_err(Error::OutputFailed)?;
    Ok(())
}

/// Output human-readable format
fn output_human<W: Write>(page: &ScanPage, writer: &mut W) -> Result<()> {
    if page.loading_visible() {
        writeln!(writer, "Scanning...").map_err(Error::OutputFailed)?;
    }
    if let Some(error) = page.error() {
        writeln!(writer, "Error: {}", error.message).map_err(Error::OutputFailed)?;
    }
    if let Some(results) = page.results() {
        output_results(results, writer)?;
    }
    Ok(())
}

fn output_results<W: Write>(results: &ResultsPanel, writer: &mut W) -> Result<()> {
    let mut summary = Table::new();
    summary
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let score_note = if results.score_out_of_range {
        " (clamped)"
    } else {
        ""
    };
    summary.add_row(vec![
        Cell::new("URL").add_attribute(Attribute::Bold),
        Cell::new(&results.scanned_url),
    ]);
    summary.add_row(vec![
        Cell::new("Risk Score").add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{}{}  {}",
            results.score_text,
            score_note,
            risk_bar(results.bar.percent)
        ))
        .fg(tone_color(results.bar.color)),
    ]);
    summary.add_row(vec![
        Cell::new("Risk Level").add_attribute(Attribute::Bold),
        Cell::new(&results.badge).fg(tone_color(results.band.color())),
    ]);
    if let Some(is_phishing) = results.is_phishing {
        summary.add_row(vec![
            Cell::new("Verdict").add_attribute(Attribute::Bold),
            Cell::new(if is_phishing {
                "Likely phishing"
            } else {
                "Not phishing"
            }),
        ]);
    }
    if let Some(timestamp) = &results.timestamp {
        summary.add_row(vec![
            Cell::new("Scanned At").add_attribute(Attribute::Bold),
            Cell::new(timestamp),
        ]);
    }
    writeln!(writer, "{}", summary).map_err(Error::OutputFailed)?;

    if results.checks.is_empty() {
        return Ok(());
    }

    let mut checks = Table::new();
    checks
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Check").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Reasons").add_attribute(Attribute::Bold),
        ]);
    for block in &results.checks {
        add_check_row(&mut checks, block);
    }
    writeln!(writer, "{}", checks).map_err(Error::OutputFailed)
}

/// Add a row for a check to the table
fn add_check_row(table: &mut Table, block: &CheckBlock) {
    let reasons = block
        .reasons
        .iter()
        .map(|reason| format!("• {}", reason))
        .collect::<Vec<_>>()
        .join("\n");

    table.add_row(vec![
        Cell::new(&block.title),
        Cell::new(block.status.label())
            .fg(tone_color(block.status.color()))
            .set_alignment(CellAlignment::Center),
        Cell::new(reasons),
    ]);
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Green => Color::Green,
        Tone::Yellow => Color::Yellow,
        Tone::Red => Color::Red,
    }
}

/// Twenty-cell text bar for a fill percentage
fn risk_bar(percent: f64) -> String {
    const WIDTH: usize = 20;
    let filled = ((percent / 100.0) * WIDTH as f64).round().clamp(0.0, WIDTH as f64) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(WIDTH - filled))
}
