use std::path::PathBuf;
use thiserror::Error;

/// Failure to load or persist the backing document
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No document found at {0}")]
    Missing(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors surfaced by ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Missing or malformed caller input; nothing was changed
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No sheet exists for the date yet
    #[error("Sheet not found for date: {0}")]
    SheetNotFound(String),

    /// No header cell in row 1 matches the company
    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    /// The document has no sheet to clone from
    #[error("Template sheet missing: document has no sheets")]
    TemplateMissing,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl LedgerError {
    pub(crate) fn missing(field: &str) -> Self {
        LedgerError::Validation(format!("{field} is required"))
    }
}
