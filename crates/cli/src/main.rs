//! Cloud Cost Optimizer CLI
//!
//! A command-line tool for estimating cloud costs from a resource
//! configuration, analyzing billing history and viewing provider rates.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{billing, estimate, rates};
use cost_engine::{
    billing::BillingFilter, CostEngine, Environment, RequestFrequency, StoragePolicy, UsageConfig,
};
use std::path::PathBuf;

/// Cloud Cost Optimizer CLI
#[derive(Parser)]
#[command(name = "cco")]
#[command(author, version, about = "CLI for the Cloud Cost Optimizer", long_about = None)]
pub struct Cli {
    /// JSON rate table replacing the built-in rates (can also be set via CCO_RATES_FILE env var)
    #[arg(long, env = "CCO_RATES_FILE", global = true)]
    pub rates: Option<String>,

    /// Output format
    #[arg(long, short, global = true)]
    pub format: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate the cost of a resource configuration
    Estimate(EstimateArgs),

    /// Analyze a billing-history JSON file
    Billing {
        /// Path to a JSON array of billing records
        file: PathBuf,

        /// Filter by project ("All" for every project)
        #[arg(long, short)]
        project: Option<String>,

        /// Filter by cloud provider ("All" for every provider)
        #[arg(long)]
        provider: Option<String>,

        /// Show the daily cost per service table
        #[arg(long)]
        daily: bool,
    },

    /// Show the unit costs per provider
    Rates,
}

#[derive(Args)]
pub struct EstimateArgs {
    /// Cloud provider (AWS, GCP, Azure)
    #[arg(long, short)]
    pub provider: Option<String>,

    /// Number of vCPUs
    #[arg(long, default_value_t = 2)]
    pub vcpu: u32,

    /// RAM in GB
    #[arg(long, default_value_t = 8)]
    pub ram: u32,

    /// Storage in GB
    #[arg(long, default_value_t = 100)]
    pub storage: u32,

    /// Number of users
    #[arg(long, default_value_t = 1000)]
    pub users: u32,

    /// Request frequency per user (per-minute, per-hour, per-day)
    #[arg(long, default_value = "per-hour")]
    pub frequency: RequestFrequency,

    /// Deployment environment (production, development)
    #[arg(long, short, default_value = "production")]
    pub environment: Environment,

    /// Duration in days (1-31)
    #[arg(long, default_value_t = 30)]
    pub days: u32,

    /// Storage archival rule (capacity, capacity-and-cost)
    #[arg(long, default_value = "capacity")]
    pub storage_policy: StoragePolicy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::Config::load()?;
    let format = config.output_format(cli.format);

    match cli.command {
        Commands::Estimate(args) => {
            let rates = config.rate_table(cli.rates.as_deref())?;
            let engine = CostEngine::new(rates, args.storage_policy);
            let usage = UsageConfig {
                provider_id: config.provider(args.provider),
                vcpu_count: args.vcpu,
                ram_gb: args.ram,
                storage_gb: args.storage,
                user_count: args.users,
                request_frequency: args.frequency,
                environment: args.environment,
                duration_days: args.days,
            };
            estimate::run_estimate(&engine, &usage, format)?;
        }
        Commands::Billing {
            file,
            project,
            provider,
            daily,
        } => {
            let filter = BillingFilter::new(project, provider);
            billing::show_billing(&file, filter, daily, cli.verbose, format)?;
        }
        Commands::Rates => {
            let rates = config.rate_table(cli.rates.as_deref())?;
            rates::show_rates(&rates, format)?;
        }
    }

    Ok(())
}
