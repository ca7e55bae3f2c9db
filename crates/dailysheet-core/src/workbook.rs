use serde::{Deserialize, Serialize};

use crate::error::WorkbookError;
use crate::sheet::Sheet;

/// Longest sheet name a spreadsheet application accepts
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Metadata about the workbook
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkbookMetadata {
    /// ISO 8601 timestamp of creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// ISO 8601 timestamp of last modification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
    /// Author name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Application version that created/modified the workbook
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
}

/// A workbook containing multiple sheets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// Workbook name (usually the file name)
    pub name: String,
    /// Sheets in tab order
    #[serde(default)]
    pub sheets: Vec<Sheet>,
    /// Workbook metadata
    #[serde(default)]
    pub metadata: WorkbookMetadata,
    /// Ask the opening application to recalculate every formula, since cached
    /// results may have been written without evaluation.
    #[serde(default)]
    pub full_calc_on_load: bool,
}

impl Workbook {
    /// Create a new workbook without sheets
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Get a sheet by index
    pub fn get_sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Get a sheet by name (case-sensitive)
    pub fn get_sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Get a mutable sheet by name (case-sensitive)
    pub fn get_sheet_by_name_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    /// Get the index of a sheet by name
    pub fn get_sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name == name)
    }

    /// Append a sheet after the last tab
    pub fn add_sheet(&mut self, sheet: Sheet) -> Result<usize, WorkbookError> {
        if sheet.name.trim().is_empty() {
            return Err(WorkbookError::InvalidSheetName(
                "Name cannot be empty".to_string(),
            ));
        }

        if sheet.name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(WorkbookError::InvalidSheetName(format!(
                "Name longer than {} characters: {}",
                MAX_SHEET_NAME_LEN, sheet.name
            )));
        }

        if self.get_sheet_by_name(&sheet.name).is_some() {
            return Err(WorkbookError::SheetNameExists(sheet.name));
        }

        let index = self.sheets.len();
        self.sheets.push(sheet);
        Ok(index)
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get all sheet names
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Flag the workbook for full recalculation when next opened
    pub fn mark_full_recalc(&mut self) {
        self.full_calc_on_load = true;
    }

    /// Serialize the workbook to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize the workbook to pretty JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a workbook from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Deserialize a workbook from raw JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
