use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskFlagError {
    #[error("Document contains no financial entries")]
    EmptyDocument,

    #[error("Financial entry index {index} is out of range for {len} entries")]
    EntryOutOfRange { index: usize, len: usize },

    #[error("Required field '{field}' is missing from financial entry #{index}")]
    MissingField { field: &'static str, index: usize },

    #[error("Metric '{metric}' is not a finite number for financial entry #{index}")]
    NonFiniteMetric { metric: &'static str, index: usize },

    #[error("Invalid financial document: {0}")]
    InvalidDocument(String),

    #[error("Invalid threshold {name} = {value}: must be finite and non-negative")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RiskFlagError>;
