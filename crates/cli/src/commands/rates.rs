//! Rate table command

use anyhow::Result;
use cost_engine::RateTable;
use tabled::Tabled;

use crate::output::{print_json, OutputFormat};

/// Row for the rate table
#[derive(Tabled)]
struct RateRow {
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "vCPU/hr")]
    cpu_hr: String,
    #[tabled(rename = "RAM GB/hr")]
    ram_hr: String,
    #[tabled(rename = "Storage GB/mo")]
    storage_gb_mo: String,
    #[tabled(rename = "Request")]
    req_cost: String,
}

/// Print the unit costs per provider
pub fn show_rates(rates: &RateTable, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(rates)?,
        OutputFormat::Table => {
            let rows: Vec<RateRow> = rates
                .iter()
                .map(|(provider, rate)| RateRow {
                    provider: provider.to_string(),
                    cpu_hr: format!("${:.4}", rate.cpu_hr),
                    ram_hr: format!("${:.4}", rate.ram_hr),
                    storage_gb_mo: format!("${:.4}", rate.storage_gb_mo),
                    req_cost: format!("${:.4}", rate.req_cost),
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}
