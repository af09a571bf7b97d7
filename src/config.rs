use crate::error::{Result, RiskFlagError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MIN_ISCR: f64 = 2.0;
/// 5 crore.
pub const DEFAULT_MIN_REVENUE: f64 = 50_000_000.0;
pub const DEFAULT_MAX_BORROWING_TO_REVENUE: f64 = 0.25;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct RuleThresholds {
    #[schemars(description = "Interest service coverage ratio at or above which the ISCR flag is GREEN")]
    pub min_iscr: f64,

    #[schemars(description = "Net revenue at or above which the revenue flag is GREEN")]
    pub min_revenue: f64,

    #[schemars(
        description = "Borrowing to revenue ratio at or below which the borrowing flag is GREEN; above it the flag is AMBER"
    )]
    pub max_borrowing_to_revenue: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            min_iscr: DEFAULT_MIN_ISCR,
            min_revenue: DEFAULT_MIN_REVENUE,
            max_borrowing_to_revenue: DEFAULT_MAX_BORROWING_TO_REVENUE,
        }
    }
}

impl RuleThresholds {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_iscr", self.min_iscr),
            ("min_revenue", self.min_revenue),
            ("max_borrowing_to_revenue", self.max_borrowing_to_revenue),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RiskFlagError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingDataPolicy {
    /// Missing required inputs are treated as zero. A missing net revenue
    /// therefore flags RED and a missing profit before tax is an error.
    #[default]
    DefaultToZero,

    /// Any flag whose required input is missing is reported as WHITE.
    FlagWhite,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct RuleConfig {
    pub thresholds: RuleThresholds,

    #[schemars(description = "How flags behave when a required input field is missing")]
    pub missing_data: MissingDataPolicy,
}

impl RuleConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RuleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()
    }

    pub fn flags_missing_as_white(&self) -> bool {
        self.missing_data == MissingDataPolicy::FlagWhite
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(RuleConfig);
        serde_json::to_string_pretty(&schema)
    }
}
