//! Estimator and rule set combined behind one call

use crate::advisor::{Advisory, RuleSet, StoragePolicy};
use crate::error::Result;
use crate::estimator::CostEstimator;
use crate::models::{CostBreakdown, UsageConfig};
use crate::rates::RateTable;
use serde::{Deserialize, Serialize};

/// Breakdown plus the advisories derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    pub breakdown: CostBreakdown,
    pub advisories: Vec<Advisory>,
    pub rule_set_version: String,
}

impl EstimateReport {
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.advisories.iter().map(|a| a.message.as_str())
    }
}

/// Cost estimator paired with the rule set used to advise on its output
#[derive(Debug, Clone, Default)]
pub struct CostEngine {
    estimator: CostEstimator,
    rules: RuleSet,
}

impl CostEngine {
    pub fn new(rates: RateTable, storage_policy: StoragePolicy) -> Self {
        Self {
            estimator: CostEstimator::new(rates),
            rules: RuleSet::new(storage_policy),
        }
    }

    pub fn estimator(&self) -> &CostEstimator {
        &self.estimator
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn rates(&self) -> &RateTable {
        self.estimator.rates()
    }

    /// Same engine with a different storage policy; the rate table is kept
    pub fn with_storage_policy(&self, storage_policy: StoragePolicy) -> Self {
        Self {
            estimator: self.estimator.clone(),
            rules: RuleSet::new(storage_policy),
        }
    }

    /// Estimate a configuration and evaluate the advisory rules on the result
    pub fn evaluate(&self, config: &UsageConfig) -> Result<EstimateReport> {
        let breakdown = self.estimator.estimate(config)?;
        let advisories = self.rules.evaluate(config, &breakdown);
        Ok(EstimateReport {
            breakdown,
            advisories,
            rule_set_version: self.rules.version(),
        })
    }
}
