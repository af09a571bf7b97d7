use chrono::{Datelike, Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementNature {
    #[schemars(description = "Financials of the reporting company on its own, excluding subsidiaries")]
    Standalone,

    #[schemars(description = "Group financials combining the company and its subsidiaries")]
    Consolidated,

    #[schemars(description = "Any other statement nature; never selected as the canonical entry")]
    #[serde(other)]
    Other,
}

/// Profit & loss line items. Every field is optional in the upload;
/// which absences matter is decided by the metric calculators.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct PnlLineItems {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Net revenue from operations for the period")]
    pub net_revenue: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Profit before tax for the period")]
    pub profit_before_tax: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Depreciation and amortisation expense (treated as 0 when absent)")]
    pub depreciation: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Interest / finance cost for the period (treated as 0 when absent)")]
    pub interest: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ProfitAndLoss {
    #[serde(rename = "lineItems", default)]
    pub line_items: PnlLineItems,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Liabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Long-term borrowings (treated as 0 when absent)")]
    pub long_term_borrowings: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Short-term borrowings (treated as 0 when absent)")]
    pub short_term_borrowings: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct BalanceSheet {
    #[serde(default)]
    pub liabilities: Liabilities,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct FinancialEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Whether this entry reports standalone or consolidated figures")]
    pub nature: Option<StatementNature>,

    #[serde(
        default,
        deserialize_with = "lenient_label",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(description = "Reporting period label, usually the period end date in YYYY-MM-DD format")]
    pub year: Option<String>,

    #[serde(default)]
    pub pnl: ProfitAndLoss,

    #[serde(default)]
    pub bs: BalanceSheet,
}

impl FinancialEntry {
    pub fn is_standalone(&self) -> bool {
        self.nature == Some(StatementNature::Standalone)
    }

    /// Parses `year` as `YYYY-MM-DD`, `YYYY-MM` (month end) or `YYYY` (Dec 31).
    /// Labels in any other format yield `None`.
    pub fn period_end(&self) -> Option<NaiveDate> {
        let label = self.year.as_deref()?.trim();

        if let Ok(date) = NaiveDate::parse_from_str(label, "%Y-%m-%d") {
            return Some(date);
        }

        if let Ok(first) = NaiveDate::parse_from_str(&format!("{}-01", label), "%Y-%m-%d") {
            return last_day_of_month(first.year(), first.month());
        }

        label
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 12, 31))
    }
}

/// Accepts a string or an integral number; any other JSON type reads as absent.
fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let label = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => match number.as_i64() {
            Some(year) => Some(year.to_string()),
            None => number
                .as_f64()
                .filter(|value| value.fract() == 0.0)
                .map(|value| format!("{}", value as i64)),
        },
        _ => None,
    };
    Ok(label)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.checked_sub_days(Days::new(1))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct FinancialDocument {
    #[schemars(
        description = "Financial statement entries, e.g. standalone and consolidated figures across periods. The first STANDALONE entry is evaluated."
    )]
    pub financials: Vec<FinancialEntry>,
}

impl FinancialDocument {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(FinancialDocument)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// Upload wrapper: the document travels under a top-level `data` key.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UploadEnvelope {
    pub data: FinancialDocument,
}
