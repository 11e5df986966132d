//! Report Generator (§4.9): renders a completed run into one of three fixed output formats.
//!
//! Architecture: Anti-Corruption Layer - formatters translate the domain's `ValidationResult`
//! set into external representations; the domain objects stay format-agnostic.
//!
//! Determinism (§4.9, §8): the structured JSON output is byte-identical for identical input,
//! because violation and detail ordering is fixed upstream (the executor sorts `details` and
//! violations by path) and the run's timestamp is captured exactly once, here, rather than
//! re-derived per format.

use crate::model::validation_result::ValidationResult;
use crate::model::violation::Violation;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;

/// The three required report outputs (§4.9). There is no CI-specific or colorized format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Markdown,
    Html,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" | "human" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            _ => Err(format!("unknown report format: {s}")),
        }
    }
}

impl ReportFormat {
    pub fn all() -> &'static [&'static str] {
        &["json", "markdown", "html"]
    }
}

/// Aggregate statistics over a completed run (§4.9).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReportStats {
    pub passed: usize,
    pub failed: usize,
    #[serde(rename = "totalViolations")]
    pub total_violations: usize,
    #[serde(rename = "lowConfidenceCount")]
    pub low_confidence_count: usize,
    #[serde(rename = "overriddenCount")]
    pub overridden_count: usize,
}

/// A completed run's full set of validator results, ready to render (§4.9).
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub profile: String,
    pub timestamp: DateTime<Utc>,
    pub results: Vec<ValidationResult>,
    pub stats: ReportStats,
}

impl Report {
    /// Build a report from a finished set of per-validator results, computing statistics and
    /// capturing the run's single timestamp (§4.9).
    pub fn new(profile: impl Into<String>, results: Vec<ValidationResult>, timestamp: DateTime<Utc>) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = results.len() - passed;
        let total_violations = results.iter().map(|r| r.violations.len()).sum();
        let low_confidence_count = results.iter().map(|r| r.low_confidence_violations.len()).sum();
        let overridden_count = results.iter().map(|r| r.overridden_violations.len()).sum();

        Self {
            profile: profile.into(),
            timestamp,
            results,
            stats: ReportStats { passed, failed, total_violations, low_confidence_count, overridden_count },
        }
    }

    pub fn passed(&self) -> bool {
        self.stats.failed == 0
    }
}

/// Confidence bucket a violation falls into for the HTML report's breakdown (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBucket {
    High,
    Medium,
    Low,
}

impl ConfidenceBucket {
    pub const HIGH_THRESHOLD: f64 = 0.9;
    pub const MEDIUM_THRESHOLD: f64 = 0.7;

    pub fn of(confidence: f64) -> Self {
        if confidence >= Self::HIGH_THRESHOLD {
            Self::High
        } else if confidence >= Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Renders a [`Report`] into one of the three required formats.
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn render(report: &Report, format: ReportFormat) -> crate::error::Result<String> {
        match format {
            ReportFormat::Json => Self::render_json(report),
            ReportFormat::Markdown => Ok(Self::render_markdown(report)),
            ReportFormat::Html => Ok(Self::render_html(report)),
        }
    }

    fn render_json(report: &Report) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn render_markdown(report: &Report) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Validation report: {}", report.profile);
        let _ = writeln!(out);
        let _ = writeln!(out, "Generated: {}", report.timestamp.to_rfc3339());
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "**{}** of **{}** validators passed. {} violation(s), {} low-confidence, {} overridden.",
            report.stats.passed,
            report.results.len(),
            report.stats.total_violations,
            report.stats.low_confidence_count,
            report.stats.overridden_count,
        );
        let _ = writeln!(out);

        for result in &report.results {
            let mark = if result.passed { "✅" } else { "❌" };
            let _ = writeln!(out, "## {mark} {}", result.validator);
            let _ = writeln!(out, "{}", result.message);
            let _ = writeln!(out);

            if !result.violations.is_empty() {
                let _ = writeln!(out, "| File | Line | Message | Confidence |");
                let _ = writeln!(out, "|---|---|---|---|");
                for v in &result.violations {
                    let _ = writeln!(
                        out,
                        "| {} | {} | {} | {:.2} |",
                        v.file_path.as_deref().unwrap_or("-"),
                        v.line.map(|l| l.to_string()).unwrap_or_else(|| "-".to_string()),
                        v.message,
                        v.confidence,
                    );
                }
                let _ = writeln!(out);
            }
        }

        out
    }

    fn render_html(report: &Report) -> String {
        let all_violations: Vec<&Violation> = report.results.iter().flat_map(|r| r.violations.iter()).collect();
        let high = all_violations.iter().filter(|v| ConfidenceBucket::of(v.confidence) == ConfidenceBucket::High).count();
        let medium = all_violations.iter().filter(|v| ConfidenceBucket::of(v.confidence) == ConfidenceBucket::Medium).count();
        let low = all_violations.iter().filter(|v| ConfidenceBucket::of(v.confidence) == ConfidenceBucket::Low).count();

        let mut out = String::new();
        let _ = writeln!(out, "<!DOCTYPE html>");
        let _ = writeln!(out, "<html lang=\"en\"><head><meta charset=\"utf-8\">");
        let _ = writeln!(out, "<title>Validation report: {}</title>", escape_html(&report.profile));
        let _ = writeln!(out, "<style>{}</style>", EMBEDDED_STYLE);
        let _ = writeln!(out, "</head><body>");
        let _ = writeln!(out, "<h1>Validation report: {}</h1>", escape_html(&report.profile));
        let _ = writeln!(out, "<p>Generated: {}</p>", report.timestamp.to_rfc3339());

        let _ = writeln!(out, "<div class=\"summary\">");
        let _ = writeln!(out, "<p>{} passed / {} total</p>", report.stats.passed, report.results.len());
        let _ = writeln!(
            out,
            "<p class=\"buckets\"><span class=\"high\">high: {high}</span> <span class=\"medium\">medium: {medium}</span> <span class=\"low\">low: {low}</span></p>"
        );
        let _ = writeln!(out, "</div>");

        for result in &report.results {
            let status_class = if result.passed { "pass" } else { "fail" };
            let _ = writeln!(out, "<section class=\"validator {status_class}\">");
            let _ = writeln!(out, "<h2>{}</h2>", escape_html(&result.validator));
            let _ = writeln!(out, "<p>{}</p>", escape_html(&result.message));

            if !result.violations.is_empty() {
                let _ = writeln!(out, "<table><thead><tr><th>File</th><th>Line</th><th>Message</th><th>Confidence</th></tr></thead><tbody>");
                for v in &result.violations {
                    let bucket = ConfidenceBucket::of(v.confidence).label();
                    let _ = writeln!(
                        out,
                        "<tr class=\"confidence-{bucket}\"><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>",
                        escape_html(v.file_path.as_deref().unwrap_or("-")),
                        v.line.map(|l| l.to_string()).unwrap_or_else(|| "-".to_string()),
                        escape_html(&v.message),
                        v.confidence,
                    );
                }
                let _ = writeln!(out, "</tbody></table>");
            }
            let _ = writeln!(out, "</section>");
        }

        let _ = writeln!(out, "</body></html>");
        out
    }
}

const EMBEDDED_STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
.pass h2{color:#1a7f37}.fail h2{color:#cf222e}\
table{border-collapse:collapse;width:100%}td,th{border:1px solid #d0d7de;padding:4px 8px;text-align:left}\
.confidence-high{background:#ffebe9}.confidence-medium{background:#fff8c5}.confidence-low{background:#f6f8fa}\
.buckets span{margin-right:1rem;font-weight:bold}";

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
