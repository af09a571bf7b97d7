//! # Credit Risk Flags
//!
//! A rule engine that turns an uploaded financial-statement document into a
//! small set of credit metrics and categorical risk flags.
//!
//! ## Core Concepts
//!
//! - **Financial Document**: a JSON upload holding several statement entries
//!   (standalone vs consolidated, across periods) under `financials`
//! - **Entry Selection**: the first `STANDALONE` entry is evaluated; without
//!   one, the first entry is used
//! - **Metrics**: net revenue, total borrowings and the interest service
//!   coverage ratio (ISCR) of the selected entry
//! - **Flags**: each metric maps to GREEN / AMBER / RED (or WHITE when data is
//!   missing and the rule config asks for it) through fixed thresholds
//!
//! ## Example
//!
//! ```rust
//! use credit_risk_flags::*;
//!
//! let document = parse_document_str(r#"{
//!     "data": {
//!         "financials": [{
//!             "nature": "STANDALONE",
//!             "pnl": { "lineItems": {
//!                 "net_revenue": 60000000,
//!                 "profit_before_tax": 10000000,
//!                 "depreciation": 1000000,
//!                 "interest": 2000000
//!             } },
//!             "bs": { "liabilities": {
//!                 "long_term_borrowings": 5000000,
//!                 "short_term_borrowings": 1000000
//!             } }
//!         }]
//!     }
//! }"#).unwrap();
//!
//! let report = evaluate_document(&document).unwrap();
//! assert_eq!(report.flags.total_revenue_5cr_flag, Flag::Green);
//! assert_eq!(report.flags.borrowing_to_revenue_flag, Flag::Green);
//! assert_eq!(report.flags.iscr_flag, Flag::Green);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod flags;
pub mod ingestion;
pub mod metrics;
pub mod schema;
pub mod selector;

#[cfg(feature = "server")]
pub mod server;

pub use config::{MissingDataPolicy, RuleConfig, RuleThresholds};
pub use engine::{EvaluationReport, FlagSummary, MetricSummary, RiskEvaluator};
pub use error::{Result, RiskFlagError};
pub use flags::{
    borrowing_to_revenue_flag, borrowing_to_revenue_flag_with, iscr_flag, iscr_flag_with,
    total_revenue_5cr_flag, total_revenue_5cr_flag_with, Flag,
};
pub use ingestion::{load_document, parse_document, parse_document_str};
pub use metrics::{borrowing_to_revenue, iscr, total_borrowing, total_revenue, Metric};
pub use schema::*;
pub use selector::{entry_at, select_index};

/// Evaluates a document with the default business thresholds.
pub fn evaluate_document(document: &FinancialDocument) -> Result<EvaluationReport> {
    RiskEvaluator::default().evaluate(document)
}

/// Evaluates a document against an alternate rule config, validating it first.
pub fn evaluate_with_config(
    document: &FinancialDocument,
    config: &RuleConfig,
) -> Result<EvaluationReport> {
    config.validate()?;
    RiskEvaluator::new(config.clone()).evaluate(document)
}
