use serde::{Deserialize, Serialize};

use crate::error::CellError;

/// A scalar stored in a cell, or left behind as a formula's cached result
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(CellError),
}

impl CellValue {
    /// Check if the value is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Text(s) => s.trim().parse().ok(),
            CellValue::Empty | CellValue::Error(_) => None,
        }
    }

    /// Render the value as text (numbers without a fraction drop the ".0")
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Error(e) => e.to_string(),
        }
    }
}

/// The content of a cell - either a scalar or a formula with its cached result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CellContent {
    #[serde(rename = "Value")]
    Value {
        #[serde(rename = "value")]
        value: CellValue,
    },
    #[serde(rename = "Formula")]
    Formula {
        #[serde(rename = "expression")]
        /// Formula text as stored in the document (e.g., "=SUM(C2:C9)")
        expression: String,
        #[serde(rename = "cachedValue", default)]
        /// Last computed result
        cached_value: CellValue,
    },
}

impl Default for CellContent {
    fn default() -> Self {
        CellContent::Value {
            value: CellValue::Empty,
        }
    }
}

impl From<CellValue> for CellContent {
    fn from(value: CellValue) -> Self {
        CellContent::Value { value }
    }
}

impl CellContent {
    pub fn number(value: f64) -> Self {
        CellValue::Number(value).into()
    }

    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into()).into()
    }

    /// Create a formula with a known cached result
    pub fn formula(expression: impl Into<String>, cached_value: CellValue) -> Self {
        CellContent::Formula {
            expression: expression.into(),
            cached_value,
        }
    }

    /// Get the computed value (for both value and formula)
    pub fn computed_value(&self) -> &CellValue {
        match self {
            CellContent::Value { value } => value,
            CellContent::Formula { cached_value, .. } => cached_value,
        }
    }

    /// Check if this is a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula { .. })
    }

    /// Get the formula expression if this is a formula
    pub fn formula_expression(&self) -> Option<&str> {
        match self {
            CellContent::Formula { expression, .. } => Some(expression),
            CellContent::Value { .. } => None,
        }
    }

    /// Replace the stored value. Formulas keep their expression and only
    /// take `value` as the new cached result.
    pub fn overwrite(&mut self, value: CellValue) {
        match self {
            CellContent::Formula { cached_value, .. } => *cached_value = value,
            CellContent::Value { value: current } => *current = value,
        }
    }

    /// Get the display value as a string
    pub fn display_value(&self) -> String {
        self.computed_value().as_text()
    }

    /// Check if this content is empty (empty value, not a formula)
    pub fn is_empty(&self) -> bool {
        matches!(
            self,
            CellContent::Value {
                value: CellValue::Empty
            }
        )
    }
}
