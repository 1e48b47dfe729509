//! Billing-history commands

use anyhow::{Context, Result};
use colored::Colorize;
use cost_engine::billing::{
    self, BillingFilter, BillingReport, FilterChoices, RecommendationKind, ALL,
};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

use crate::output::{
    color_utilization, format_currency, print_heading, print_info, print_json, print_success,
    print_warning, OutputFormat,
};

/// Row for the daily cost per service table
#[derive(Tabled)]
struct DailyCostRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Cost")]
    cost: String,
}

#[derive(Serialize)]
struct BillingOutput<'a> {
    #[serde(flatten)]
    report: &'a BillingReport,
    #[serde(flatten)]
    choices: &'a FilterChoices,
}

/// Analyze a billing-history file and print summary and recommendations
pub fn show_billing(
    path: &Path,
    filter: BillingFilter,
    daily: bool,
    verbose: bool,
    format: OutputFormat,
) -> Result<()> {
    let records = billing::load_records(path)
        .with_context(|| format!("Failed to load billing records from {}", path.display()))?;
    let report = billing::analyze(&records, &filter);
    let choices = FilterChoices::from_records(&records);

    match format {
        OutputFormat::Json => print_json(&BillingOutput {
            report: &report,
            choices: &choices,
        })?,
        OutputFormat::Table => {
            print_heading("Cost Summary", '=');
            println!(
                "Project:                {}",
                report.filter.project.as_deref().unwrap_or(ALL).cyan()
            );
            println!(
                "Cloud Provider:         {}",
                report.filter.provider.as_deref().unwrap_or(ALL).cyan()
            );
            println!(
                "Records:                {} of {}",
                report.summary.record_count,
                records.len()
            );
            println!(
                "{} {}",
                "Total Spend:           ".bold(),
                format_currency(report.summary.total_spend).green().bold()
            );
            println!(
                "Avg CPU Utilization:    {}",
                report
                    .summary
                    .avg_cpu_utilization
                    .map(color_utilization)
                    .unwrap_or_else(|| "n/a".dimmed().to_string())
            );
            println!();

            if verbose {
                print_info(&format!("Projects:  {}", choices.projects.join(", ")));
                print_info(&format!("Providers: {}", choices.providers.join(", ")));
                println!();
            }

            if daily {
                print_heading("Daily Cost per Service", '-');
                if report.daily_costs.is_empty() {
                    print_warning("No billing records match the filter");
                } else {
                    let rows: Vec<DailyCostRow> = report
                        .daily_costs
                        .iter()
                        .map(|d| DailyCostRow {
                            date: d.date.format("%Y-%m-%d").to_string(),
                            service: d.service.clone(),
                            cost: format_currency(d.cost),
                        })
                        .collect();

                    let table = tabled::Table::new(rows)
                        .with(tabled::settings::Style::rounded())
                        .to_string();
                    println!("{}", table);
                }
                println!();
            }

            print_heading("Optimization Recommendations", '-');
            for recommendation in &report.recommendations {
                match recommendation.kind {
                    RecommendationKind::Efficient => print_success(&recommendation.message),
                    RecommendationKind::Underutilized | RecommendationKind::HighCost => {
                        print_warning(&recommendation.message)
                    }
                }
            }
        }
    }

    Ok(())
}
