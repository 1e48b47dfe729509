//! Threshold-based advisory rules for cost estimates
//!
//! Rules are evaluated in a fixed order against the raw configuration and
//! its computed breakdown. They are independent and non-exclusive: any
//! number may fire. When none fires, a single efficiency advisory is
//! returned so that "nothing to improve" is an explicit outcome.

use crate::error::EngineError;
use crate::models::{CostBreakdown, UsageConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version of the built-in rule table
pub const RULESET_VERSION: &str = "1";

pub const CPU_COST_THRESHOLD: f64 = 100.0;
pub const RAM_COST_THRESHOLD: f64 = 50.0;
pub const RAM_PER_VCPU_THRESHOLD: f64 = 4.0;
pub const REQUEST_COST_THRESHOLD: f64 = 200.0;
pub const STORAGE_GB_THRESHOLD: u32 = 1000;
pub const STORAGE_COST_THRESHOLD: f64 = 50.0;

/// Identifier of the rule that produced an advisory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    CpuReduction,
    RamOverallocation,
    RequestCaching,
    StorageArchival,
    Efficient,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::CpuReduction => "cpu_reduction",
            RuleId::RamOverallocation => "ram_overallocation",
            RuleId::RequestCaching => "request_caching",
            RuleId::StorageArchival => "storage_archival",
            RuleId::Efficient => "efficient",
        }
    }
}

/// Which condition triggers the storage archival advisory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoragePolicy {
    /// `storage_gb > 1000`
    #[default]
    Capacity,
    /// `storage_gb > 1000` and `storage_cost > 50`
    CapacityAndCost,
}

impl StoragePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoragePolicy::Capacity => "capacity",
            StoragePolicy::CapacityAndCost => "capacity-and-cost",
        }
    }
}

impl FromStr for StoragePolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "capacity" => Ok(StoragePolicy::Capacity),
            "capacity-and-cost" => Ok(StoragePolicy::CapacityAndCost),
            other => Err(EngineError::invalid_range(
                "storage_policy",
                format!("unknown policy '{}'", other),
            )),
        }
    }
}

impl fmt::Display for StoragePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single advisory message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub rule: RuleId,
    pub message: String,
}

type Predicate = fn(&UsageConfig, &CostBreakdown) -> bool;
type MessageFn = fn(&UsageConfig, &CostBreakdown) -> String;

/// Rule table entry: id, firing condition and message
#[derive(Debug, Clone)]
pub struct AdvisoryRule {
    pub id: RuleId,
    predicate: Predicate,
    message: MessageFn,
}

impl AdvisoryRule {
    pub fn fires(&self, config: &UsageConfig, breakdown: &CostBreakdown) -> bool {
        (self.predicate)(config, breakdown)
    }

    pub fn message(&self, config: &UsageConfig, breakdown: &CostBreakdown) -> String {
        (self.message)(config, breakdown)
    }
}

/// GB of RAM per vCPU; `None` when there are no vCPUs
fn ram_per_vcpu(config: &UsageConfig) -> Option<f64> {
    if config.vcpu_count == 0 {
        return None;
    }
    Some(f64::from(config.ram_gb) / f64::from(config.vcpu_count))
}

fn cpu_rule() -> AdvisoryRule {
    AdvisoryRule {
        id: RuleId::CpuReduction,
        predicate: |_, b| b.cpu_cost > CPU_COST_THRESHOLD,
        message: |c, b| {
            format!(
                "CPU cost is ${:.2} for {} vCPUs. Consider reducing the vCPU count or using reserved or spot capacity.",
                b.cpu_cost, c.vcpu_count
            )
        },
    }
}

fn ram_rule() -> AdvisoryRule {
    AdvisoryRule {
        id: RuleId::RamOverallocation,
        predicate: |c, b| {
            b.ram_cost > RAM_COST_THRESHOLD
                && ram_per_vcpu(c).is_some_and(|ratio| ratio > RAM_PER_VCPU_THRESHOLD)
        },
        message: |c, b| {
            format!(
                "RAM cost is ${:.2} with {:.1} GB per vCPU. Memory looks over-allocated; consider a smaller RAM size.",
                b.ram_cost,
                ram_per_vcpu(c).unwrap_or_default()
            )
        },
    }
}

fn request_rule() -> AdvisoryRule {
    AdvisoryRule {
        id: RuleId::RequestCaching,
        predicate: |_, b| b.request_cost > REQUEST_COST_THRESHOLD,
        message: |_, b| {
            format!(
                "Request cost is ${:.2} for {} requests. Consider caching responses or serving static content from a CDN.",
                b.request_cost, b.total_requests
            )
        },
    }
}

fn storage_rule(policy: StoragePolicy) -> AdvisoryRule {
    let predicate: Predicate = match policy {
        StoragePolicy::Capacity => {
            |c: &UsageConfig, _: &CostBreakdown| c.storage_gb > STORAGE_GB_THRESHOLD
        }
        StoragePolicy::CapacityAndCost => |c: &UsageConfig, b: &CostBreakdown| {
            c.storage_gb > STORAGE_GB_THRESHOLD && b.storage_cost > STORAGE_COST_THRESHOLD
        },
    };
    AdvisoryRule {
        id: RuleId::StorageArchival,
        predicate,
        message: |c, b| {
            format!(
                "{} GB of storage costs ${:.2}/month. Move infrequently accessed data to an archival storage tier.",
                c.storage_gb, b.storage_cost
            )
        },
    }
}

/// Message emitted when no rule fires
pub const EFFICIENT_MESSAGE: &str =
    "Configuration is cost-efficient. No optimizations suggested.";

/// Ordered, versioned table of advisory rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    storage_policy: StoragePolicy,
    rules: Vec<AdvisoryRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(StoragePolicy::default())
    }
}

impl RuleSet {
    pub fn new(storage_policy: StoragePolicy) -> Self {
        Self {
            storage_policy,
            rules: vec![
                cpu_rule(),
                ram_rule(),
                request_rule(),
                storage_rule(storage_policy),
            ],
        }
    }

    /// Version string identifying both the rule table and its storage policy
    pub fn version(&self) -> String {
        format!("{}+{}", RULESET_VERSION, self.storage_policy)
    }

    pub fn storage_policy(&self) -> StoragePolicy {
        self.storage_policy
    }

    pub fn rules(&self) -> &[AdvisoryRule] {
        &self.rules
    }

    /// Evaluate every rule in order
    pub fn evaluate(&self, config: &UsageConfig, breakdown: &CostBreakdown) -> Vec<Advisory> {
        let advisories: Vec<Advisory> = self
            .rules
            .iter()
            .filter(|rule| rule.fires(config, breakdown))
            .map(|rule| Advisory {
                rule: rule.id,
                message: rule.message(config, breakdown),
            })
            .collect();

        if advisories.is_empty() {
            vec![Advisory {
                rule: RuleId::Efficient,
                message: EFFICIENT_MESSAGE.to_string(),
            }]
        } else {
            advisories
        }
    }

    /// Advisory messages only, in rule order
    pub fn advise(&self, config: &UsageConfig, breakdown: &CostBreakdown) -> Vec<String> {
        self.evaluate(config, breakdown)
            .into_iter()
            .map(|a| a.message)
            .collect()
    }
}
