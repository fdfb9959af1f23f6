//! Terminal summaries shared by the commands.

use super::models::ReportSummary;
use crate::ingest::NormalizeReport;
use crate::utils::config::SCHEMA_VERSION;
use colored::*;

/// Render the outcome of a report run for the terminal
pub fn render_report_summary(summary: &ReportSummary) -> String {
    let mut out = String::new();
    out.push_str("\n🗺️  ");
    out.push_str(&"Rental Atlas Report".bold().to_string());
    out.push_str("\n---------------------------------------------------\n");
    out.push_str(&format!("Periods:        {}\n", summary.periods));
    out.push_str(&format!("Latest period:  {}\n", summary.latest_period));
    out.push_str(&format!("History rows:   {}\n", summary.history_rows));
    out.push_str(&format!("Latest rows:    {}\n", summary.latest_rows));
    out.push_str(&format!("Artifacts:      {}\n", summary.artifacts.len()));
    out.push_str("---------------------------------------------------\n");
    out.push_str(&render_district_status(summary.unmapped_rows).to_string());
    out.push('\n');
    out
}

/// Render the normalization findings of a consolidation
pub fn render_normalize_report(report: &NormalizeReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Normalized {} rows ({} never reviewed)\n",
        report.rows, report.never_reviewed
    ));
    if !report.is_clean() {
        out.push_str("Neighbourhoods without a district:\n");
        for (name, count) in &report.unmapped {
            out.push_str(&format!("  ⚠️  {}: {} rows\n", name, count));
        }
    }
    out.push_str(&render_district_status(report.unmapped_rows()).to_string());
    out.push('\n');
    out
}

fn render_district_status(unmapped_rows: usize) -> ColoredString {
    if unmapped_rows == 0 {
        "✅ Every row mapped to a district".green().bold()
    } else {
        format!("⚠️  {} rows without a district", unmapped_rows)
            .yellow()
            .bold()
    }
}

/// Display version information
pub fn display_version() {
    println!("Rental Atlas v{}", env!("CARGO_PKG_VERSION"));
    println!("Metrics Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Maps and charts of short-term rental listings across the Paris districts.");
}
