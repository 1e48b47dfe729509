//! Billing-history analysis
//!
//! Works over historical billing records rather than a single estimate:
//! - optional exact-match filtering by project and provider
//! - spend and CPU utilization summary
//! - per-record underutilization and high-cost recommendations
//! - daily cost per service series

use crate::error::{EngineError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// CPU utilization below this fraction is flagged as underutilized
pub const UNDERUTILIZATION_THRESHOLD: f64 = 0.3;

/// Daily cost above this amount raises a high-cost alert
pub const HIGH_COST_THRESHOLD: f64 = 200.0;

/// Filter value that selects every record
pub const ALL: &str = "All";

/// One day of spend for a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    pub date: NaiveDate,
    pub project: String,
    pub service: String,
    pub cloud_provider: String,
    pub cost: f64,
    /// Fraction of provisioned CPU in use (0.0 - 1.0)
    pub cpu_utilization: f64,
}

impl BillingRecord {
    fn validate(&self, index: usize) -> Result<()> {
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(EngineError::BillingData(format!(
                "record {}: cost must be a non-negative number, got {}",
                index, self.cost
            )));
        }
        if !self.cpu_utilization.is_finite() || self.cpu_utilization < 0.0 {
            return Err(EngineError::BillingData(format!(
                "record {}: cpu_utilization must be a non-negative number, got {}",
                index, self.cpu_utilization
            )));
        }
        Ok(())
    }
}

/// Reject records with negative or non-finite figures
pub fn validate_records(records: &[BillingRecord]) -> Result<()> {
    records
        .iter()
        .enumerate()
        .try_for_each(|(index, record)| record.validate(index))
}

/// Parse billing records from a JSON array
pub fn parse_records(json: &str) -> Result<Vec<BillingRecord>> {
    let records: Vec<BillingRecord> = serde_json::from_str(json)
        .map_err(|e| EngineError::BillingData(format!("failed to parse records: {}", e)))?;
    validate_records(&records)?;
    Ok(records)
}

/// Load billing records from a JSON file
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<BillingRecord>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        EngineError::BillingData(format!("failed to read {}: {}", path.display(), e))
    })?;
    parse_records(&content)
}

/// Exact-match filter on project and provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingFilter {
    pub project: Option<String>,
    pub provider: Option<String>,
}

impl BillingFilter {
    /// Build a filter; `None`, empty strings and `"All"` select everything
    pub fn new(project: Option<String>, provider: Option<String>) -> Self {
        Self {
            project: normalize(project),
            provider: normalize(provider),
        }
    }

    pub fn matches(&self, record: &BillingRecord) -> bool {
        let project_ok = self
            .project
            .as_ref()
            .map(|p| record.project == *p)
            .unwrap_or(true);
        let provider_ok = self
            .provider
            .as_ref()
            .map(|p| record.cloud_provider == *p)
            .unwrap_or(true);
        project_ok && provider_ok
    }

    pub fn apply<'a>(&self, records: &'a [BillingRecord]) -> Vec<&'a BillingRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && v != ALL)
}

/// Spend and utilization summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingSummary {
    pub record_count: usize,
    pub total_spend: f64,
    /// Mean CPU utilization; absent when no records match
    pub avg_cpu_utilization: Option<f64>,
}

impl BillingSummary {
    pub fn from_records(records: &[&BillingRecord]) -> Self {
        let record_count = records.len();
        let total_spend = records.iter().map(|r| r.cost).sum();
        let avg_cpu_utilization = if record_count == 0 {
            None
        } else {
            Some(records.iter().map(|r| r.cpu_utilization).sum::<f64>() / record_count as f64)
        };
        Self {
            record_count,
            total_spend,
            avg_cpu_utilization,
        }
    }
}

/// Kind of billing recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Underutilized,
    HighCost,
    Efficient,
}

/// Recommendation raised by a billing record, or the all-clear message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecommendation {
    pub kind: RecommendationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub message: String,
}

/// Message emitted when no record raises a recommendation
pub const ALL_EFFICIENT_MESSAGE: &str = "All services are operating efficiently.";

/// Per-record recommendations in record order
///
/// Both checks run independently, so one record may produce two entries.
pub fn recommend(records: &[&BillingRecord]) -> Vec<BillingRecommendation> {
    let mut recommendations = Vec::new();

    for record in records {
        if record.cpu_utilization < UNDERUTILIZATION_THRESHOLD {
            recommendations.push(BillingRecommendation {
                kind: RecommendationKind::Underutilized,
                project: Some(record.project.clone()),
                service: Some(record.service.clone()),
                message: format!(
                    "{} in {} is underutilized. Consider downscaling or stopping.",
                    record.service, record.project
                ),
            });
        }
        if record.cost > HIGH_COST_THRESHOLD {
            recommendations.push(BillingRecommendation {
                kind: RecommendationKind::HighCost,
                project: Some(record.project.clone()),
                service: Some(record.service.clone()),
                message: format!(
                    "High cost alert: {} in {} is costing ${:.2}/day.",
                    record.service, record.project, record.cost
                ),
            });
        }
    }

    if recommendations.is_empty() {
        recommendations.push(BillingRecommendation {
            kind: RecommendationKind::Efficient,
            project: None,
            service: None,
            message: ALL_EFFICIENT_MESSAGE.to_string(),
        });
    }

    recommendations
}

/// Total cost of one service on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyServiceCost {
    pub date: NaiveDate,
    pub service: String,
    pub cost: f64,
}

/// Group by `(date, service)` and sum cost, ordered by date then service
pub fn daily_service_costs(records: &[&BillingRecord]) -> Vec<DailyServiceCost> {
    let mut grouped: BTreeMap<(NaiveDate, &str), f64> = BTreeMap::new();
    for record in records {
        *grouped
            .entry((record.date, record.service.as_str()))
            .or_insert(0.0) += record.cost;
    }
    grouped
        .into_iter()
        .map(|((date, service), cost)| DailyServiceCost {
            date,
            service: service.to_string(),
            cost,
        })
        .collect()
}

/// Selectable filter values, each list led by `"All"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterChoices {
    pub projects: Vec<String>,
    pub providers: Vec<String>,
}

impl FilterChoices {
    pub fn from_records(records: &[BillingRecord]) -> Self {
        let with_all = |values: BTreeSet<&str>| -> Vec<String> {
            std::iter::once(ALL)
                .chain(values)
                .map(str::to_string)
                .collect()
        };
        Self {
            projects: with_all(records.iter().map(|r| r.project.as_str()).collect()),
            providers: with_all(records.iter().map(|r| r.cloud_provider.as_str()).collect()),
        }
    }
}

/// Everything derived from a filtered record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingReport {
    pub filter: BillingFilter,
    pub summary: BillingSummary,
    pub recommendations: Vec<BillingRecommendation>,
    pub daily_costs: Vec<DailyServiceCost>,
}

/// Filter the records and compute summary, recommendations and daily series
pub fn analyze(records: &[BillingRecord], filter: &BillingFilter) -> BillingReport {
    let filtered = filter.apply(records);
    BillingReport {
        filter: filter.clone(),
        summary: BillingSummary::from_records(&filtered),
        recommendations: recommend(&filtered),
        daily_costs: daily_service_costs(&filtered),
    }
}
