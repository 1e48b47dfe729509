//! Core data models for the cost engine

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest billing window accepted by the estimator
pub const MAX_DURATION_DAYS: u32 = 31;

/// How often each user issues a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum RequestFrequency {
    PerMinute,
    PerHour,
    PerDay,
}

impl RequestFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestFrequency::PerMinute => "per-minute",
            RequestFrequency::PerHour => "per-hour",
            RequestFrequency::PerDay => "per-day",
        }
    }
}

impl FromStr for RequestFrequency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "per-minute" => Ok(RequestFrequency::PerMinute),
            "per-hour" => Ok(RequestFrequency::PerHour),
            "per-day" => Ok(RequestFrequency::PerDay),
            _ => Err(EngineError::InvalidFrequency(s.to_string())),
        }
    }
}

impl TryFrom<String> for RequestFrequency {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for RequestFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment environment; development workloads receive a discount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
        }
    }
}

impl FromStr for Environment {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "development" => Ok(Environment::Development),
            _ => Err(EngineError::InvalidEnvironment(s.to_string())),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource configuration supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageConfig {
    pub provider_id: String,
    pub vcpu_count: u32,
    pub ram_gb: u32,
    pub storage_gb: u32,
    pub user_count: u32,
    pub request_frequency: RequestFrequency,
    pub environment: Environment,
    pub duration_days: u32,
}

impl UsageConfig {
    /// Check every numeric field against its documented domain
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("vcpu_count", self.vcpu_count),
            ("ram_gb", self.ram_gb),
            ("storage_gb", self.storage_gb),
            ("user_count", self.user_count),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(EngineError::invalid_range(field, "must be at least 1"));
            }
        }

        if !(1..=MAX_DURATION_DAYS).contains(&self.duration_days) {
            return Err(EngineError::invalid_range(
                "duration_days",
                format!(
                    "must be between 1 and {}, got {}",
                    MAX_DURATION_DAYS, self.duration_days
                ),
            ));
        }

        if self.provider_id.trim().is_empty() {
            return Err(EngineError::invalid_range("provider_id", "must not be empty"));
        }

        Ok(())
    }

    /// Elapsed hours covered by the estimate
    pub fn hours(&self) -> u64 {
        u64::from(self.duration_days) * 24
    }

    /// Total requests issued over the whole window
    ///
    /// Saturates at `u64::MAX` for configurations far outside the validated
    /// domain.
    pub fn total_requests(&self) -> u64 {
        let users = u64::from(self.user_count);
        match self.request_frequency {
            RequestFrequency::PerMinute => users.saturating_mul(60).saturating_mul(self.hours()),
            RequestFrequency::PerHour => users.saturating_mul(self.hours()),
            RequestFrequency::PerDay => users.saturating_mul(u64::from(self.duration_days)),
        }
    }
}

/// Cost breakdown for a single estimate
///
/// The four component costs are reported before the environment discount;
/// only `total_cost` has `discount_factor` applied. For development
/// environments the components therefore sum to `total_cost / discount_factor`,
/// not to `total_cost`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub cpu_cost: f64,
    pub ram_cost: f64,
    pub storage_cost: f64,
    pub request_cost: f64,
    pub total_cost: f64,
    pub total_requests: u64,
    pub hours: u64,
    pub discount_factor: f64,
}

impl CostBreakdown {
    /// Sum of the pre-discount components
    pub fn subtotal(&self) -> f64 {
        self.cpu_cost + self.ram_cost + self.storage_cost + self.request_cost
    }

    /// Amount removed from the subtotal by the environment discount
    pub fn discount_amount(&self) -> f64 {
        self.subtotal() - self.total_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(frequency: RequestFrequency) -> UsageConfig {
        UsageConfig {
            provider_id: "AWS".to_string(),
            vcpu_count: 2,
            ram_gb: 8,
            storage_gb: 50,
            user_count: 10,
            request_frequency: frequency,
            environment: Environment::Production,
            duration_days: 7,
        }
    }

    #[test]
    fn test_frequency_parsing() {
        assert_eq!(
            "per-minute".parse::<RequestFrequency>().unwrap(),
            RequestFrequency::PerMinute
        );
        assert_eq!(
            "Per Hour".parse::<RequestFrequency>().unwrap(),
            RequestFrequency::PerHour
        );
        assert_eq!(
            "per_day".parse::<RequestFrequency>().unwrap(),
            RequestFrequency::PerDay
        );
        assert!(matches!(
            "per-week".parse::<RequestFrequency>(),
            Err(EngineError::InvalidFrequency(_))
        ));
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            "development".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert_eq!(
            "Production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
        assert!(matches!(
            "dev".parse::<Environment>(),
            Err(EngineError::InvalidEnvironment(_))
        ));
        assert!("prod".parse::<Environment>().is_err());
    }

    #[test]
    fn test_volume_of_unvalidated_config_does_not_overflow() {
        let mut huge = config(RequestFrequency::PerMinute);
        huge.user_count = u32::MAX;
        huge.duration_days = u32::MAX;

        assert_eq!(huge.hours(), u64::from(u32::MAX) * 24);
        assert_eq!(huge.total_requests(), u64::MAX);
        assert!(huge.validate().is_err());

        huge.request_frequency = RequestFrequency::PerDay;
        assert_eq!(
            huge.total_requests(),
            u64::from(u32::MAX) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn test_usage_config_json() {
        let json = r#"{
            "provider_id": "GCP",
            "vcpu_count": 4,
            "ram_gb": 16,
            "storage_gb": 100,
            "user_count": 500,
            "request_frequency": "per-hour",
            "environment": "development",
            "duration_days": 30
        }"#;
        let config: UsageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.request_frequency, RequestFrequency::PerHour);
        assert_eq!(config.environment, Environment::Development);

        let out = serde_json::to_value(&config).unwrap();
        assert_eq!(out["request_frequency"], "per-hour");
        assert_eq!(out["environment"], "development");
    }

    #[test]
    fn test_usage_config_rejects_unknown_frequency() {
        let json = r#"{
            "provider_id": "AWS", "vcpu_count": 1, "ram_gb": 1, "storage_gb": 1,
            "user_count": 1, "request_frequency": "per-fortnight",
            "environment": "production", "duration_days": 1
        }"#;
        let err = serde_json::from_str::<UsageConfig>(json).unwrap_err();
        assert!(err.to_string().contains("Invalid request frequency"));
    }

    #[test]
    fn test_validate_ranges() {
        assert!(config(RequestFrequency::PerDay).validate().is_ok());

        let mut zero_cpu = config(RequestFrequency::PerDay);
        zero_cpu.vcpu_count = 0;
        assert_eq!(
            zero_cpu.validate(),
            Err(EngineError::invalid_range("vcpu_count", "must be at least 1"))
        );

        let mut long = config(RequestFrequency::PerDay);
        long.duration_days = 32;
        assert!(matches!(
            long.validate(),
            Err(EngineError::InvalidRange {
                field: "duration_days",
                ..
            })
        ));

        let mut none = config(RequestFrequency::PerDay);
        none.duration_days = 0;
        assert!(none.validate().is_err());
    }

    #[test]
    fn test_total_requests_ratios() {
        let minute = config(RequestFrequency::PerMinute).total_requests();
        let hour = config(RequestFrequency::PerHour).total_requests();
        let day = config(RequestFrequency::PerDay).total_requests();

        assert_eq!(day, 10 * 7);
        assert_eq!(hour, 10 * 7 * 24);
        assert_eq!(minute, 60 * hour);
        assert_eq!(hour, 24 * day);
    }
}
