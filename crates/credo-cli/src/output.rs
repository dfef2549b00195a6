//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use credo_domain::{EpistemicAlert, StabilityState};
use credo_engine::EpochReport;
use credo_graph::ContradictionCluster;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the results of one evaluation epoch.
    pub fn format_report(&self, report: &EpochReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&report_json(report))?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(format_report_quiet(report)),
        }
    }

    /// Format several epochs; JSON output is a single array.
    pub fn format_reports(&self, reports: &[EpochReport]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = reports.iter().map(report_json).collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            _ => {
                let parts = reports
                    .iter()
                    .map(|r| self.format_report(r))
                    .collect::<Result<Vec<_>>>()?;
                Ok(parts.join("\n\n"))
            }
        }
    }

    fn format_report_table(&self, report: &EpochReport) -> String {
        let mut out = self.info(&format!(
            "Epoch {}: {} evaluated, {} skipped, {} cluster(s), tension {:.2}",
            report.epoch,
            report.evaluated,
            report.skipped,
            report.cluster_count,
            report.total_tension
        ));

        if !report.outcomes.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Claim", "Confidence", "Entropy", "State", "Alerts"]);
            for outcome in &report.outcomes {
                let state = if outcome.transitioned() {
                    format!("{} → {}", outcome.from, outcome.state)
                } else {
                    outcome.state.to_string()
                };
                let alerts: Vec<&str> =
                    outcome.alerts.iter().map(|a| a.alert_type.as_str()).collect();
                builder.push_record([
                    outcome.claim_id.to_string(),
                    format!("{:.3}", outcome.confidence),
                    format!("{:.3}", outcome.entropy),
                    self.colorize(&state, state_color(outcome.state)),
                    alerts.join(", "),
                ]);
            }
            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));
            out.push('\n');
            out.push_str(&table.to_string());
        }

        for failure in &report.failures {
            out.push('\n');
            out.push_str(&self.warning(&format!(
                "{} ({}): {}",
                failure.claim_id, failure.kind, failure.message
            )));
        }
        for alert in &report.system_alerts {
            out.push('\n');
            out.push_str(&self.warning(&alert.message));
        }
        out
    }

    /// Format contradiction clusters.
    pub fn format_clusters(&self, clusters: &[ContradictionCluster]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = clusters
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "center": c.center.to_string(),
                            "members": c.members.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
                            "edge_count": c.edge_count,
                            "total_weight": c.total_weight,
                            "tension": c.tension(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Quiet => Ok(clusters
                .iter()
                .map(|c| c.center.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if clusters.is_empty() {
                    return Ok(self.colorize("No contradiction clusters found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Center", "Size", "Edges", "Weight", "Tension"]);
                for c in clusters {
                    builder.push_record([
                        c.center.to_string(),
                        c.size().to_string(),
                        c.edge_count.to_string(),
                        format!("{:.2}", c.total_weight),
                        format!("{:.3}", c.tension()),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn state_color(state: StabilityState) -> &'static str {
    match state {
        StabilityState::Stable => "green",
        StabilityState::Volatile => "yellow",
        StabilityState::Diverging | StabilityState::Critical => "red",
        StabilityState::Converging => "blue",
    }
}

fn alert_json(a: &EpistemicAlert) -> serde_json::Value {
    serde_json::json!({
        "id": a.id.0,
        "claim_id": a.claim_id.map(|c| c.to_string()),
        "type": a.alert_type.as_str(),
        "severity": a.severity.as_str(),
        "timestamp": a.timestamp,
        "value": a.value,
        "threshold": a.threshold,
        "message": a.message,
    })
}

fn report_json(report: &EpochReport) -> serde_json::Value {
    serde_json::json!({
        "epoch": report.epoch,
        "evaluated": report.evaluated,
        "skipped": report.skipped,
        "cluster_count": report.cluster_count,
        "total_tension": report.total_tension,
        "outcomes": report.outcomes.iter().map(|o| serde_json::json!({
            "claim_id": o.claim_id.to_string(),
            "confidence": o.confidence,
            "entropy": o.entropy,
            "from": o.from.as_str(),
            "state": o.state.as_str(),
            "alerts": o.alerts.iter().map(alert_json).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
        "failures": report.failures.iter().map(|f| serde_json::json!({
            "claim_id": f.claim_id.to_string(),
            "kind": f.kind.as_str(),
            "message": f.message,
        })).collect::<Vec<_>>(),
        "system_alerts": report.system_alerts.iter().map(alert_json).collect::<Vec<_>>(),
    })
}

/// One `claim state confidence` line per outcome, failures marked with `!`.
fn format_report_quiet(report: &EpochReport) -> String {
    let mut lines: Vec<String> = report
        .outcomes
        .iter()
        .map(|o| format!("{} {} {:.3}", o.claim_id, o.state, o.confidence))
        .collect();
    lines.extend(
        report
            .failures
            .iter()
            .map(|f| format!("{} !{}", f.claim_id, f.kind)),
    );
    lines.join("\n")
}
