use serde::{Deserialize, Serialize};

use crate::cell::{CellContent, CellValue};
use crate::range::{CellCoord, CellRange};

/// Default row height in points
pub const DEFAULT_ROW_HEIGHT: f64 = 15.0;

fn default_row_height() -> f64 {
    DEFAULT_ROW_HEIGHT
}

/// One row of a sheet: its cells in column order (index 0 is column A)
/// and an explicit height when the document sets one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<CellContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row from its cells, starting at column A
    pub fn from_cells(cells: impl IntoIterator<Item = CellContent>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            height: None,
        }
    }

    /// Get the cell in a 1-based column
    pub fn get(&self, col: u32) -> Option<&CellContent> {
        let index = (col as usize).checked_sub(1)?;
        self.cells.get(index)
    }

    /// Get a mutable cell in a 1-based column, padding the row with empty cells
    pub fn get_mut(&mut self, col: u32) -> &mut CellContent {
        let index = (col.max(1) - 1) as usize;
        if self.cells.len() <= index {
            self.cells.resize(index + 1, CellContent::default());
        }
        &mut self.cells[index]
    }

    /// Check if every cell in the row is empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(CellContent::is_empty)
    }
}

/// A single sheet: dense rows in document order plus merged regions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    /// Sheet name (displayed in tab)
    pub name: String,
    /// Rows in order; index 0 is row 1. Empty rows are kept so row numbers line up.
    #[serde(default)]
    rows: Vec<Row>,
    /// Merged-cell regions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    merges: Vec<CellRange>,
    /// Height for rows without an explicit height
    #[serde(default = "default_row_height")]
    pub default_row_height: f64,
}

impl Sheet {
    /// Create a new empty sheet with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            merges: Vec::new(),
            default_row_height: DEFAULT_ROW_HEIGHT,
        }
    }

    /// Number of rows present in the sheet, including empty ones
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Iterate rows with their 1-based row numbers
    pub fn rows(&self) -> impl Iterator<Item = (u32, &Row)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| (index as u32 + 1, row))
    }

    /// Get a row by its 1-based number
    pub fn row(&self, row: u32) -> Option<&Row> {
        let index = (row as usize).checked_sub(1)?;
        self.rows.get(index)
    }

    /// Get a mutable row, growing the sheet with empty rows as needed
    pub fn row_mut(&mut self, row: u32) -> &mut Row {
        let index = (row.max(1) - 1) as usize;
        if self.rows.len() <= index {
            self.rows.resize_with(index + 1, Row::new);
        }
        &mut self.rows[index]
    }

    /// Append a row after the last one
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Get a reference to a cell at the given coordinate
    pub fn get_cell(&self, coord: CellCoord) -> Option<&CellContent> {
        self.row(coord.row)?.get(coord.col)
    }

    /// Get a mutable reference to a cell, creating it if it doesn't exist
    pub fn get_cell_mut(&mut self, coord: CellCoord) -> &mut CellContent {
        self.row_mut(coord.row).get_mut(coord.col)
    }

    /// Set a cell at the given coordinate
    pub fn set_cell(&mut self, coord: CellCoord, content: CellContent) {
        *self.get_cell_mut(coord) = content;
    }

    /// Get the computed value of a cell (returns Empty for non-existent cells)
    pub fn get_cell_value(&self, coord: CellCoord) -> &CellValue {
        self.get_cell(coord)
            .map(|c| c.computed_value())
            .unwrap_or(&CellValue::Empty)
    }

    /// Get the row height for a specific row
    pub fn get_row_height(&self, row: u32) -> f64 {
        self.row(row)
            .and_then(|r| r.height)
            .unwrap_or(self.default_row_height)
    }

    /// Set an explicit height for a specific row
    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.row_mut(row).height = Some(height);
    }

    /// Merged-cell regions in insertion order
    pub fn merges(&self) -> &[CellRange] {
        &self.merges
    }

    /// Record a merged region. Returns false (and records nothing) when it
    /// overlaps an existing merge.
    pub fn add_merge(&mut self, range: CellRange) -> bool {
        if self.merges.iter().any(|m| m.intersects(&range)) {
            return false;
        }
        self.merges.push(range);
        true
    }

    /// Replace the merged regions as given, overlaps included
    pub fn set_merges(&mut self, merges: Vec<CellRange>) {
        self.merges = merges;
    }

    /// Get the number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .filter(|c| !c.is_empty())
            .count()
    }
}
