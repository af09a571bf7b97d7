use crate::error::{Result, RiskFlagError};
use crate::schema::{FinancialDocument, FinancialEntry};
use log::debug;

/// Index of the first STANDALONE entry, or 0 when the document has none.
pub fn select_index(document: &FinancialDocument) -> usize {
    match document
        .financials
        .iter()
        .position(FinancialEntry::is_standalone)
    {
        Some(index) => index,
        None => {
            debug!(
                "No STANDALONE entry among {} financial entries, falling back to index 0",
                document.financials.len()
            );
            0
        }
    }
}

pub fn entry_at(document: &FinancialDocument, index: usize) -> Result<&FinancialEntry> {
    document
        .financials
        .get(index)
        .ok_or(RiskFlagError::EntryOutOfRange {
            index,
            len: document.financials.len(),
        })
}
