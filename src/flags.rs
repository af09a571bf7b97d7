use crate::config::{RuleConfig, RuleThresholds};
use crate::error::{Result, RiskFlagError};
use crate::metrics::{self, Metric};
use crate::schema::FinancialDocument;
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Flag {
    /// Risk, including a zero revenue denominator
    Red,
    /// Healthy
    Green,
    /// Caution
    Amber,
    /// Presentation only; the rules never produce it
    MediumRisk,
    /// Required data is missing
    White,
}

impl Flag {
    /// Integer code shown by the original front-end.
    pub fn legacy_code(self) -> u8 {
        match self {
            Flag::Red => 0,
            Flag::Green => 1,
            Flag::Amber => 2,
            Flag::MediumRisk => 3,
            Flag::White => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Flag::Red => "RED",
            Flag::Green => "GREEN",
            Flag::Amber => "AMBER",
            Flag::MediumRisk => "MEDIUM_RISK",
            Flag::White => "WHITE",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn coverage_flag(iscr: f64, thresholds: &RuleThresholds) -> Flag {
    if iscr >= thresholds.min_iscr {
        Flag::Green
    } else {
        Flag::Red
    }
}

pub fn revenue_flag(revenue: &Metric, config: &RuleConfig) -> Flag {
    if !revenue.is_complete() && config.flags_missing_as_white() {
        return Flag::White;
    }

    if revenue.value >= config.thresholds.min_revenue {
        Flag::Green
    } else {
        Flag::Red
    }
}

pub fn borrowing_flag(borrowing: &Metric, revenue: &Metric, config: &RuleConfig) -> Flag {
    if !(borrowing.is_complete() && revenue.is_complete()) && config.flags_missing_as_white() {
        return Flag::White;
    }

    match metrics::ratio(borrowing.value, revenue.value) {
        None => {
            warn!("Total revenue is zero, cannot calculate borrowing to revenue ratio");
            Flag::Red
        }
        Some(ratio) if ratio <= config.thresholds.max_borrowing_to_revenue => Flag::Green,
        Some(_) => Flag::Amber,
    }
}

pub fn iscr_flag(document: &FinancialDocument, index: usize) -> Result<Flag> {
    iscr_flag_with(document, index, &RuleConfig::default())
}

pub fn iscr_flag_with(
    document: &FinancialDocument,
    index: usize,
    config: &RuleConfig,
) -> Result<Flag> {
    match metrics::iscr(document, index) {
        Ok(iscr) => {
            let flag = coverage_flag(iscr.value, &config.thresholds);
            debug!("ISCR {:.4} for entry #{} -> {}", iscr.value, index, flag);
            Ok(flag)
        }
        Err(RiskFlagError::MissingField { field, .. }) if config.flags_missing_as_white() => {
            warn!("{} missing for entry #{}, ISCR flag is WHITE", field, index);
            Ok(Flag::White)
        }
        Err(e) => Err(e),
    }
}

pub fn total_revenue_5cr_flag(document: &FinancialDocument, index: usize) -> Result<Flag> {
    total_revenue_5cr_flag_with(document, index, &RuleConfig::default())
}

pub fn total_revenue_5cr_flag_with(
    document: &FinancialDocument,
    index: usize,
    config: &RuleConfig,
) -> Result<Flag> {
    let revenue = metrics::total_revenue(document, index)?;
    Ok(revenue_flag(&revenue, config))
}

pub fn borrowing_to_revenue_flag(document: &FinancialDocument, index: usize) -> Result<Flag> {
    borrowing_to_revenue_flag_with(document, index, &RuleConfig::default())
}

pub fn borrowing_to_revenue_flag_with(
    document: &FinancialDocument,
    index: usize,
    config: &RuleConfig,
) -> Result<Flag> {
    let borrowing = metrics::total_borrowing(document, index)?;
    let revenue = metrics::total_revenue(document, index)?;
    Ok(borrowing_flag(&borrowing, &revenue, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingDataPolicy;
    use crate::schema::{FinancialEntry, Liabilities, PnlLineItems};

    fn single_entry(line_items: PnlLineItems, liabilities: Liabilities) -> FinancialDocument {
        let mut entry = FinancialEntry::default();
        entry.pnl.line_items = line_items;
        entry.bs.liabilities = liabilities;
        FinancialDocument {
            financials: vec![entry],
        }
    }

    fn with_revenue(revenue: f64) -> FinancialDocument {
        single_entry(
            PnlLineItems {
                net_revenue: Some(revenue),
                ..Default::default()
            },
            Liabilities::default(),
        )
    }

    fn with_coverage(profit_before_tax: f64, depreciation: f64, interest: f64) -> FinancialDocument {
        single_entry(
            PnlLineItems {
                profit_before_tax: Some(profit_before_tax),
                depreciation: Some(depreciation),
                interest: Some(interest),
                ..Default::default()
            },
            Liabilities::default(),
        )
    }

    fn with_leverage(revenue: f64, long_term: f64) -> FinancialDocument {
        single_entry(
            PnlLineItems {
                net_revenue: Some(revenue),
                ..Default::default()
            },
            Liabilities {
                long_term_borrowings: Some(long_term),
                short_term_borrowings: None,
            },
        )
    }

    fn white_config() -> RuleConfig {
        RuleConfig {
            missing_data: MissingDataPolicy::FlagWhite,
            ..Default::default()
        }
    }

    #[test]
    fn test_legacy_codes_and_names() {
        assert_eq!(Flag::Red.legacy_code(), 0);
        assert_eq!(Flag::Green.legacy_code(), 1);
        assert_eq!(Flag::Amber.legacy_code(), 2);
        assert_eq!(Flag::MediumRisk.legacy_code(), 3);
        assert_eq!(Flag::White.legacy_code(), 4);

        assert_eq!(Flag::MediumRisk.to_string(), "MEDIUM_RISK");
        assert_eq!(serde_json::to_string(&Flag::Amber).unwrap(), "\"AMBER\"");
        assert_eq!(
            serde_json::from_str::<Flag>("\"MEDIUM_RISK\"").unwrap(),
            Flag::MediumRisk
        );
    }

    #[test]
    fn test_revenue_flag_boundary() {
        assert_eq!(
            total_revenue_5cr_flag(&with_revenue(50_000_000.0), 0).unwrap(),
            Flag::Green
        );
        assert_eq!(
            total_revenue_5cr_flag(&with_revenue(75_000_000.0), 0).unwrap(),
            Flag::Green
        );
        assert_eq!(
            total_revenue_5cr_flag(&with_revenue(49_999_999.0), 0).unwrap(),
            Flag::Red
        );
        assert_eq!(
            total_revenue_5cr_flag(&with_revenue(0.0), 0).unwrap(),
            Flag::Red
        );
    }

    #[test]
    fn test_iscr_flag_boundary() {
        // (9 + 0 + 1) / (4 + 1) == 2
        assert_eq!(iscr_flag(&with_coverage(9.0, 0.0, 4.0), 0).unwrap(), Flag::Green);
        // (8 + 0 + 1) / (4 + 1) == 1.8
        assert_eq!(iscr_flag(&with_coverage(8.0, 0.0, 4.0), 0).unwrap(), Flag::Red);
        // depreciation counts toward coverage
        assert_eq!(iscr_flag(&with_coverage(8.0, 1.0, 4.0), 0).unwrap(), Flag::Green);
    }

    #[test]
    fn test_iscr_flag_zero_interest() {
        assert_eq!(iscr_flag(&with_coverage(1.0, 0.0, 0.0), 0).unwrap(), Flag::Green);
        assert_eq!(iscr_flag(&with_coverage(0.0, 0.0, 0.0), 0).unwrap(), Flag::Red);
    }

    #[test]
    fn test_borrowing_flag_rules() {
        assert_eq!(
            borrowing_to_revenue_flag(&with_leverage(0.0, 0.0), 0).unwrap(),
            Flag::Red
        );
        assert_eq!(
            borrowing_to_revenue_flag(&with_leverage(0.0, 500.0), 0).unwrap(),
            Flag::Red
        );
        assert_eq!(
            borrowing_to_revenue_flag(&with_leverage(100.0, 25.0), 0).unwrap(),
            Flag::Green
        );
        assert_eq!(
            borrowing_to_revenue_flag(&with_leverage(10_000_000.0, 2_500_001.0), 0).unwrap(),
            Flag::Amber
        );
        assert_eq!(
            borrowing_to_revenue_flag(&with_leverage(100.0, 0.0), 0).unwrap(),
            Flag::Green
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let config = RuleConfig {
            thresholds: RuleThresholds {
                min_iscr: 3.0,
                min_revenue: 10.0,
                max_borrowing_to_revenue: 0.5,
            },
            ..Default::default()
        };

        assert_eq!(
            iscr_flag_with(&with_coverage(9.0, 0.0, 4.0), 0, &config).unwrap(),
            Flag::Red
        );
        assert_eq!(
            total_revenue_5cr_flag_with(&with_revenue(10.0), 0, &config).unwrap(),
            Flag::Green
        );
        assert_eq!(
            borrowing_to_revenue_flag_with(&with_leverage(100.0, 40.0), 0, &config).unwrap(),
            Flag::Green
        );
    }

    #[test]
    fn test_missing_revenue_policies() {
        let document = single_entry(PnlLineItems::default(), Liabilities::default());

        assert_eq!(total_revenue_5cr_flag(&document, 0).unwrap(), Flag::Red);
        assert_eq!(borrowing_to_revenue_flag(&document, 0).unwrap(), Flag::Red);

        let config = white_config();
        assert_eq!(
            total_revenue_5cr_flag_with(&document, 0, &config).unwrap(),
            Flag::White
        );
        assert_eq!(
            borrowing_to_revenue_flag_with(&document, 0, &config).unwrap(),
            Flag::White
        );
    }

    #[test]
    fn test_missing_profit_before_tax_policies() {
        let document = single_entry(
            PnlLineItems {
                net_revenue: Some(1.0),
                interest: Some(3.0),
                ..Default::default()
            },
            Liabilities::default(),
        );

        assert!(matches!(
            iscr_flag(&document, 0),
            Err(RiskFlagError::MissingField { .. })
        ));
        assert_eq!(
            iscr_flag_with(&document, 0, &white_config()).unwrap(),
            Flag::White
        );
    }

    #[test]
    fn test_out_of_range_is_not_whitewashed() {
        let document = with_revenue(1.0);
        assert!(matches!(
            iscr_flag_with(&document, 5, &white_config()),
            Err(RiskFlagError::EntryOutOfRange { .. })
        ));
    }

    #[test]
    fn test_flags_are_deterministic() {
        let document = with_leverage(60_000_000.0, 20_000_000.0);
        let first = borrowing_to_revenue_flag(&document, 0).unwrap();
        for _ in 0..10 {
            assert_eq!(borrowing_to_revenue_flag(&document, 0).unwrap(), first);
        }
        assert_eq!(first, Flag::Amber);
    }
}
