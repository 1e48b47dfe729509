//! Cost estimate command

use anyhow::Result;
use colored::Colorize;
use cost_engine::{CostEngine, EstimateReport, RuleId, UsageConfig};
use tabled::Tabled;

use crate::output::{
    format_count, format_currency, print_heading, print_json, print_success, print_warning,
    OutputFormat,
};

/// Row for the component breakdown table
#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Share")]
    share: String,
}

/// Estimate a configuration and print the breakdown with its advisories
pub fn run_estimate(engine: &CostEngine, config: &UsageConfig, format: OutputFormat) -> Result<()> {
    let report = engine.evaluate(config)?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_report(config, &report),
    }

    Ok(())
}

fn print_report(config: &UsageConfig, report: &EstimateReport) {
    let b = &report.breakdown;

    print_heading("Cost Estimate", '=');
    println!("Provider:               {}", config.provider_id.cyan());
    println!("Environment:            {}", config.environment);
    println!(
        "Resources:              {} vCPU, {} GB RAM, {} GB storage",
        config.vcpu_count, config.ram_gb, config.storage_gb
    );
    println!(
        "Duration:               {} days ({} hours)",
        config.duration_days, b.hours
    );
    println!(
        "Requests:               {} ({} users, {})",
        format_count(b.total_requests),
        config.user_count,
        config.request_frequency
    );
    println!();

    let subtotal = b.subtotal();
    let share = |cost: f64| {
        if subtotal > 0.0 {
            format!("{:.1}%", cost / subtotal * 100.0)
        } else {
            "-".to_string()
        }
    };
    let rows: Vec<ComponentRow> = [
        ("CPU", b.cpu_cost),
        ("RAM", b.ram_cost),
        ("Storage", b.storage_cost),
        ("Requests", b.request_cost),
    ]
    .into_iter()
    .map(|(component, cost)| ComponentRow {
        component: component.to_string(),
        cost: format_currency(cost),
        share: share(cost),
    })
    .collect();

    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);

    if b.discount_factor < 1.0 {
        // Component costs above are pre-discount
        println!("Subtotal:               {}", format_currency(subtotal));
        println!(
            "Environment discount:   {} (x{:.2} on total)",
            format_currency(-b.discount_amount()),
            b.discount_factor
        );
    }
    println!(
        "{} {}",
        "Total Cost:            ".bold(),
        format_currency(b.total_cost).green().bold()
    );
    println!();

    print_heading(
        &format!("Recommendations (rules v{})", report.rule_set_version),
        '-',
    );
    for advisory in &report.advisories {
        if advisory.rule == RuleId::Efficient {
            print_success(&advisory.message);
        } else {
            print_warning(&advisory.message);
        }
    }
}
