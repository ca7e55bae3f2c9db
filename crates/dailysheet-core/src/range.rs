use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell coordinate, 1-based like the document it addresses (A1 = row 1, col 1)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    pub const fn new(row: u32, col: u32) -> Self {
        CellCoord { row, col }
    }

    /// Create from A1 notation (e.g., "A1" -> (1, 1), "B3" -> (3, 2))
    pub fn from_a1(notation: &str) -> Option<Self> {
        let notation = notation.trim().to_uppercase();
        let split = notation.find(|c: char| c.is_ascii_digit())?;
        let (col_str, row_str) = notation.split_at(split);

        if col_str.is_empty() || !row_str.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let col = col_from_label(col_str)?;
        let row: u32 = row_str.parse().ok()?;

        if row == 0 {
            return None;
        }

        Some(CellCoord { row, col })
    }

    /// Convert to A1 notation (e.g., (1, 1) -> "A1")
    pub fn to_a1(&self) -> String {
        format!("{}{}", col_to_label(self.col), self.row)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

/// Convert a 1-based column index to its label (1 -> A, 27 -> AA)
pub fn col_to_label(col: u32) -> String {
    let mut label = String::new();
    let mut n = col;

    while n > 0 {
        n -= 1;
        label.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }

    label
}

/// Convert a column label to its 1-based index (A -> 1, AA -> 27)
pub fn col_from_label(label: &str) -> Option<u32> {
    let mut col: u32 = 0;

    for c in label.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        col = col
            .checked_mul(26)?
            .checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)?;
    }

    if col == 0 {
        None
    } else {
        Some(col)
    }
}

/// A rectangular block of cells (e.g., a merged region "A1:C1").
///
/// Serialized in A1 notation so stored merge lists stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRange {
    pub start: CellCoord,
    pub end: CellCoord,
}

impl CellRange {
    pub fn new(start: CellCoord, end: CellCoord) -> Self {
        // Normalize so start is top-left and end is bottom-right
        CellRange {
            start: CellCoord::new(start.row.min(end.row), start.col.min(end.col)),
            end: CellCoord::new(start.row.max(end.row), start.col.max(end.col)),
        }
    }

    /// Create from A1:B1 notation
    pub fn from_a1(notation: &str) -> Option<Self> {
        match notation.split_once(':') {
            None => {
                let coord = CellCoord::from_a1(notation)?;
                Some(CellRange::new(coord, coord))
            }
            Some((start, end)) => {
                let start = CellCoord::from_a1(start)?;
                let end = CellCoord::from_a1(end)?;
                Some(CellRange::new(start, end))
            }
        }
    }

    /// Convert to A1:B1 notation
    pub fn to_a1(&self) -> String {
        if self.start == self.end {
            self.start.to_a1()
        } else {
            format!("{}:{}", self.start.to_a1(), self.end.to_a1())
        }
    }

    /// Check if a coordinate is within this range
    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.row >= self.start.row
            && coord.row <= self.end.row
            && coord.col >= self.start.col
            && coord.col <= self.end.col
    }

    /// Check if this range intersects with another range
    pub fn intersects(&self, other: &CellRange) -> bool {
        !(self.end.row < other.start.row
            || self.start.row > other.end.row
            || self.end.col < other.start.col
            || self.start.col > other.end.col)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

impl TryFrom<String> for CellRange {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CellRange::from_a1(&value).ok_or_else(|| format!("invalid cell range: {value}"))
    }
}

impl From<CellRange> for String {
    fn from(range: CellRange) -> Self {
        range.to_a1()
    }
}
