//! Provider rate table
//!
//! Unit costs per provider. The table is a plain immutable value handed to
//! the estimator at call time; there is no process-wide instance. The
//! built-in defaults can be replaced by a JSON file with the same shape:
//!
//! ```json
//! { "AWS": { "cpu_hr": 0.01, "ram_hr": 0.005, "storage_gb_mo": 0.10, "req_cost": 0.001 } }
//! ```

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Unit costs for a single provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateVector {
    /// Cost per vCPU-hour
    pub cpu_hr: f64,
    /// Cost per GB of RAM per hour
    pub ram_hr: f64,
    /// Cost per GB of storage per month (flat, not hour-scaled)
    pub storage_gb_mo: f64,
    /// Cost per request
    pub req_cost: f64,
}

impl RateVector {
    fn validate(&self, provider: &str) -> Result<()> {
        let fields = [
            ("cpu_hr", self.cpu_hr),
            ("ram_hr", self.ram_hr),
            ("storage_gb_mo", self.storage_gb_mo),
            ("req_cost", self.req_cost),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::invalid_range(
                    "rate",
                    format!("{}.{} must be a non-negative number, got {}", provider, name, value),
                ));
            }
        }
        Ok(())
    }
}

/// Mapping from provider identifier to its unit costs
///
/// Deserialization goes through [`RateTable::new`], so a table can never hold
/// an empty provider set or a negative rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, RateVector>",
    into = "BTreeMap<String, RateVector>"
)]
pub struct RateTable {
    rates: BTreeMap<String, RateVector>,
}

impl TryFrom<BTreeMap<String, RateVector>> for RateTable {
    type Error = EngineError;

    fn try_from(rates: BTreeMap<String, RateVector>) -> Result<Self> {
        Self::new(rates)
    }
}

impl From<RateTable> for BTreeMap<String, RateVector> {
    fn from(table: RateTable) -> Self {
        table.rates
    }
}

impl Default for RateTable {
    fn default() -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(
            "AWS".to_string(),
            RateVector {
                cpu_hr: 0.01,
                ram_hr: 0.005,
                storage_gb_mo: 0.10,
                req_cost: 0.001,
            },
        );
        rates.insert(
            "GCP".to_string(),
            RateVector {
                cpu_hr: 0.009,
                ram_hr: 0.0045,
                storage_gb_mo: 0.08,
                req_cost: 0.0008,
            },
        );
        rates.insert(
            "Azure".to_string(),
            RateVector {
                cpu_hr: 0.011,
                ram_hr: 0.0055,
                storage_gb_mo: 0.12,
                req_cost: 0.0012,
            },
        );
        Self { rates }
    }
}

impl RateTable {
    /// Build a table from explicit entries, validating every rate
    pub fn new(entries: impl IntoIterator<Item = (String, RateVector)>) -> Result<Self> {
        let rates: BTreeMap<String, RateVector> = entries.into_iter().collect();
        if rates.is_empty() {
            return Err(EngineError::RateTable(
                "rate table must contain at least one provider".to_string(),
            ));
        }
        for (provider, rate) in &rates {
            rate.validate(provider)?;
        }
        Ok(Self { rates })
    }

    /// Parse a table from its JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        let rates: BTreeMap<String, RateVector> = serde_json::from_str(json)
            .map_err(|e| EngineError::RateTable(format!("failed to parse rates: {}", e)))?;
        Self::new(rates)
    }

    /// Load a table from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::RateTable(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Look up the rates for a provider (ASCII case-insensitive)
    pub fn lookup(&self, provider_id: &str) -> Result<&RateVector> {
        let provider_id = provider_id.trim();
        self.rates
            .get(provider_id)
            .or_else(|| {
                self.rates
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(provider_id))
                    .map(|(_, rate)| rate)
            })
            .ok_or_else(|| EngineError::UnknownProvider(provider_id.to_string()))
    }

    /// Supported provider identifiers, sorted
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    /// Iterate over all entries in provider order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RateVector)> {
        self.rates.iter().map(|(name, rate)| (name.as_str(), rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_lookup() {
        let table = RateTable::default();
        let aws = table.lookup("AWS").unwrap();
        assert_eq!(aws.cpu_hr, 0.01);
        assert_eq!(aws.ram_hr, 0.005);
        assert_eq!(aws.storage_gb_mo, 0.10);
        assert_eq!(aws.req_cost, 0.001);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = RateTable::default();
        assert_eq!(table.lookup("azure").unwrap(), table.lookup("Azure").unwrap());
        assert!(table.lookup(" gcp ").is_ok());
    }

    #[test]
    fn test_unknown_provider() {
        let table = RateTable::default();
        assert_eq!(
            table.lookup("OCI"),
            Err(EngineError::UnknownProvider("OCI".to_string()))
        );
    }

    #[test]
    fn test_providers_sorted() {
        let table = RateTable::default();
        let providers: Vec<_> = table.providers().collect();
        assert_eq!(providers, vec!["AWS", "Azure", "GCP"]);
    }

    #[test]
    fn test_from_json_round_trips_defaults() {
        let json = serde_json::to_string(&RateTable::default()).unwrap();
        assert_eq!(RateTable::from_json(&json).unwrap(), RateTable::default());
    }

    #[test]
    fn test_from_json_rejects_negative_rate() {
        let json = r#"{"AWS": {"cpu_hr": -0.01, "ram_hr": 0.005, "storage_gb_mo": 0.1, "req_cost": 0.001}}"#;
        let err = RateTable::from_json(json).unwrap_err();
        assert_eq!(err.kind(), "invalid_range");
    }

    #[test]
    fn test_from_json_rejects_empty_table() {
        assert!(matches!(
            RateTable::from_json("{}"),
            Err(EngineError::RateTable(_))
        ));
    }

    #[test]
    fn test_deserialize_validates_rates() {
        let negative = r#"{"AWS": {"cpu_hr": -1.0, "ram_hr": 0.005, "storage_gb_mo": 0.1, "req_cost": 0.001}}"#;
        let err = serde_json::from_str::<RateTable>(negative).unwrap_err();
        assert!(err.to_string().contains("AWS.cpu_hr must be a non-negative number"));

        let err = serde_json::from_str::<RateTable>("{}").unwrap_err();
        assert!(err.to_string().contains("at least one provider"));

        let table: RateTable =
            serde_json::from_value(serde_json::to_value(RateTable::default()).unwrap()).unwrap();
        assert_eq!(table, RateTable::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"OnPrem": {{"cpu_hr": 0.002, "ram_hr": 0.001, "storage_gb_mo": 0.02, "req_cost": 0.0}}}}"#
        )
        .unwrap();

        let table = RateTable::from_file(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("onprem").unwrap().req_cost, 0.0);
    }

    #[test]
    fn test_from_missing_file() {
        let err = RateTable::from_file("/nonexistent/rates.json").unwrap_err();
        assert!(matches!(err, EngineError::RateTable(_)));
    }
}
