//! Linear cost estimation
//!
//! Maps a [`UsageConfig`] to a [`CostBreakdown`] using the unit costs from a
//! [`RateTable`]. CPU and RAM scale with elapsed hours, storage is a flat
//! monthly charge and requests are billed per unit.

use crate::error::Result;
use crate::models::{CostBreakdown, Environment, UsageConfig};
use crate::rates::RateTable;

/// Multiplier applied to the total for development environments
pub const DEVELOPMENT_DISCOUNT: f64 = 0.7;

/// Discount multiplier for an environment
pub fn discount_factor(environment: Environment) -> f64 {
    match environment {
        Environment::Production => 1.0,
        Environment::Development => DEVELOPMENT_DISCOUNT,
    }
}

/// Computes cost breakdowns against a fixed rate table
#[derive(Debug, Clone, Default)]
pub struct CostEstimator {
    rates: RateTable,
}

impl CostEstimator {
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Estimate the cost of a configuration
    ///
    /// The configuration is validated before anything is computed. The
    /// development discount is applied to `total_cost` only, after summing;
    /// component costs are left undiscounted.
    pub fn estimate(&self, config: &UsageConfig) -> Result<CostBreakdown> {
        config.validate()?;
        let rate = self.rates.lookup(&config.provider_id)?;

        let hours = config.hours();
        let total_requests = config.total_requests();

        let cpu_cost = f64::from(config.vcpu_count) * rate.cpu_hr * hours as f64;
        let ram_cost = f64::from(config.ram_gb) * rate.ram_hr * hours as f64;
        let storage_cost = f64::from(config.storage_gb) * rate.storage_gb_mo;
        let request_cost = total_requests as f64 * rate.req_cost;

        let discount_factor = discount_factor(config.environment);
        let total_cost = (cpu_cost + ram_cost + storage_cost + request_cost) * discount_factor;

        Ok(CostBreakdown {
            cpu_cost,
            ram_cost,
            storage_cost,
            request_cost,
            total_cost,
            total_requests,
            hours,
            discount_factor,
        })
    }
}
