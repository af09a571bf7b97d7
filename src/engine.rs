use crate::config::RuleConfig;
use crate::error::{Result, RiskFlagError};
use crate::flags::{borrowing_flag, coverage_flag, revenue_flag, Flag};
use crate::metrics::{self, Metric};
use crate::schema::{FinancialDocument, StatementNature};
use crate::selector::{entry_at, select_index};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub total_revenue: f64,
    pub total_borrowing: f64,
    /// `None` only when profit before tax is missing and the policy flags WHITE
    pub iscr: Option<f64>,
    /// `None` when revenue is zero
    pub borrowing_to_revenue: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlagSummary {
    #[serde(rename = "TOTAL_REVENUE_5CR_FLAG")]
    pub total_revenue_5cr_flag: Flag,
    #[serde(rename = "BORROWING_TO_REVENUE_FLAG")]
    pub borrowing_to_revenue_flag: Flag,
    #[serde(rename = "ISCR_FLAG")]
    pub iscr_flag: Flag,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub entry_index: usize,
    pub nature: Option<StatementNature>,
    pub period_end: Option<NaiveDate>,
    pub metrics: MetricSummary,
    pub flags: FlagSummary,
    pub warnings: Vec<String>,
}

impl EvaluationReport {
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RiskEvaluator {
    config: RuleConfig,
}

impl RiskEvaluator {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Evaluates the canonical (first STANDALONE) entry of the document.
    pub fn evaluate(&self, document: &FinancialDocument) -> Result<EvaluationReport> {
        if document.financials.is_empty() {
            return Err(RiskFlagError::EmptyDocument);
        }

        let index = select_index(document);
        self.evaluate_at(document, index)
    }

    pub fn evaluate_at(
        &self,
        document: &FinancialDocument,
        index: usize,
    ) -> Result<EvaluationReport> {
        let entry = entry_at(document, index)?;
        let mut warnings = Vec::new();

        let revenue = metrics::total_revenue(document, index)?;
        let borrowing = metrics::total_borrowing(document, index)?;
        record_missing(&revenue, &mut warnings);
        record_missing(&borrowing, &mut warnings);

        let (iscr, iscr_flag) = match metrics::iscr(document, index) {
            Ok(iscr) => (
                Some(iscr.value),
                coverage_flag(iscr.value, &self.config.thresholds),
            ),
            Err(RiskFlagError::MissingField { field, .. })
                if self.config.flags_missing_as_white() =>
            {
                warnings.push(missing_warning(field));
                (None, Flag::White)
            }
            Err(e) => return Err(e),
        };

        let flags = FlagSummary {
            total_revenue_5cr_flag: revenue_flag(&revenue, &self.config),
            borrowing_to_revenue_flag: borrowing_flag(&borrowing, &revenue, &self.config),
            iscr_flag,
        };

        info!(
            "Evaluated financial entry #{}: revenue {}, borrowing {}, iscr {}",
            index, flags.total_revenue_5cr_flag, flags.borrowing_to_revenue_flag, flags.iscr_flag
        );

        for warning in &warnings {
            warn!("Entry #{}: {}", index, warning);
        }

        Ok(EvaluationReport {
            entry_index: index,
            nature: entry.nature,
            period_end: entry.period_end(),
            metrics: MetricSummary {
                total_revenue: revenue.value,
                total_borrowing: borrowing.value,
                iscr,
                borrowing_to_revenue: metrics::ratio(borrowing.value, revenue.value),
            },
            flags,
            warnings,
        })
    }
}

fn record_missing(metric: &Metric, warnings: &mut Vec<String>) {
    warnings.extend(metric.missing.iter().map(|field| missing_warning(field)));
}

fn missing_warning(field: &str) -> String {
    format!(
        "{} is missing; dependent metrics were computed with 0 and their flags may be misleading",
        field
    )
}
