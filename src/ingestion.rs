use crate::error::{Result, RiskFlagError};
use crate::schema::FinancialDocument;
use log::debug;
use serde_json::Value;
use std::path::Path;

/// Decodes an uploaded JSON payload into a [`FinancialDocument`].
///
/// Accepts either the upload envelope (`{"data": {"financials": [...]}}`)
/// or a bare document (`{"financials": [...]}`).
pub fn parse_document(bytes: &[u8]) -> Result<FinancialDocument> {
    let value: Value = serde_json::from_slice(bytes)?;
    document_from_value(value)
}

pub fn parse_document_str(json: &str) -> Result<FinancialDocument> {
    parse_document(json.as_bytes())
}

pub fn load_document(path: impl AsRef<Path>) -> Result<FinancialDocument> {
    let bytes = std::fs::read(path.as_ref())?;
    debug!(
        "Read {} bytes of financial data from {}",
        bytes.len(),
        path.as_ref().display()
    );
    parse_document(&bytes)
}

fn document_from_value(value: Value) -> Result<FinancialDocument> {
    let document = match value {
        Value::Object(mut map) if !map.contains_key("financials") => match map.remove("data") {
            Some(inner) => inner,
            None => {
                return Err(RiskFlagError::InvalidDocument(
                    "expected a 'financials' array, optionally wrapped in a 'data' object"
                        .to_string(),
                ))
            }
        },
        Value::Object(map) => Value::Object(map),
        other => {
            return Err(RiskFlagError::InvalidDocument(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )))
        }
    };

    serde_json::from_value(document).map_err(|e| RiskFlagError::InvalidDocument(e.to_string()))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
