//! Metric calculators over one financial entry.
//!
//! Absent optional inputs (depreciation, interest, either borrowing) count as
//! zero and are not reported. Absent required inputs are listed in
//! [`Metric::missing`] so callers can tell a real zero from a defaulted one.

use crate::error::{Result, RiskFlagError};
use crate::selector::entry_at;
use crate::schema::FinancialDocument;
use log::{debug, warn};
use serde::Serialize;

pub const NET_REVENUE_FIELD: &str = "pnl.lineItems.net_revenue";
pub const PROFIT_BEFORE_TAX_FIELD: &str = "pnl.lineItems.profit_before_tax";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub value: f64,
    /// Required inputs that were absent and substituted with zero
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<&'static str>,
}

impl Metric {
    pub fn complete(value: f64) -> Self {
        Self {
            value,
            missing: Vec::new(),
        }
    }

    pub fn defaulted(field: &'static str) -> Self {
        Self {
            value: 0.0,
            missing: vec![field],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn total_revenue(document: &FinancialDocument, index: usize) -> Result<Metric> {
    let entry = entry_at(document, index)?;

    match entry.pnl.line_items.net_revenue {
        Some(revenue) => Ok(Metric::complete(revenue)),
        None => {
            warn!(
                "{} not found in financial entry #{}, using 0",
                NET_REVENUE_FIELD, index
            );
            Ok(Metric::defaulted(NET_REVENUE_FIELD))
        }
    }
}

pub fn total_borrowing(document: &FinancialDocument, index: usize) -> Result<Metric> {
    let liabilities = &entry_at(document, index)?.bs.liabilities;

    let long_term = liabilities.long_term_borrowings.unwrap_or(0.0);
    let short_term = liabilities.short_term_borrowings.unwrap_or(0.0);

    Ok(Metric::complete(long_term + short_term))
}

/// Interest service coverage ratio:
/// `(profit_before_tax + depreciation + 1) / (interest + 1)`.
///
/// The `+ 1` on both sides keeps the ratio defined when interest is zero and
/// damps it when interest is tiny. Unlike revenue, a missing profit before
/// tax is not defaulted: it returns [`RiskFlagError::MissingField`]. An
/// interest of exactly -1 zeroes the denominator and returns
/// [`RiskFlagError::NonFiniteMetric`].
pub fn iscr(document: &FinancialDocument, index: usize) -> Result<Metric> {
    let line_items = &entry_at(document, index)?.pnl.line_items;

    let profit_before_tax =
        line_items
            .profit_before_tax
            .ok_or(RiskFlagError::MissingField {
                field: PROFIT_BEFORE_TAX_FIELD,
                index,
            })?;

    if line_items.depreciation.is_none() || line_items.interest.is_none() {
        debug!(
            "Financial entry #{} lacks depreciation or interest, treating as 0",
            index
        );
    }

    let depreciation = line_items.depreciation.unwrap_or(0.0);
    let interest = line_items.interest.unwrap_or(0.0);

    let ratio = (profit_before_tax + depreciation + 1.0) / (interest + 1.0);
    if !ratio.is_finite() {
        return Err(RiskFlagError::NonFiniteMetric {
            metric: "iscr",
            index,
        });
    }

    Ok(Metric::complete(ratio))
}

/// Ratio of borrowings to revenue, or `None` when revenue is zero.
pub fn borrowing_to_revenue(document: &FinancialDocument, index: usize) -> Result<Option<f64>> {
    let borrowing = total_borrowing(document, index)?;
    let revenue = total_revenue(document, index)?;
    Ok(ratio(borrowing.value, revenue.value))
}

pub(crate) fn ratio(borrowing: f64, revenue: f64) -> Option<f64> {
    if revenue == 0.0 {
        None
    } else {
        Some(borrowing / revenue)
    }
}
