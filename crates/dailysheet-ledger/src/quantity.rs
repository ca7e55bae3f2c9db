use std::fmt;

use dailysheet_core::CellValue;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// A quantity as exchanged with callers: a number or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl Quantity {
    /// The value an empty cell projects to
    pub fn empty() -> Self {
        Quantity::Text(String::new())
    }

    /// Project a cell's computed value. Empty cells become an empty string so
    /// every item still has an entry.
    pub fn from_cell_value(value: &CellValue) -> Self {
        match value {
            CellValue::Number(n) => Quantity::Number(*n),
            CellValue::Text(s) => Quantity::Text(s.clone()),
            CellValue::Empty => Quantity::empty(),
            CellValue::Boolean(_) | CellValue::Error(_) => Quantity::Text(value.as_text()),
        }
    }

    /// Normalize an update into the value to store.
    ///
    /// `None` and blank text clear the value. Anything else must be a finite
    /// number; the error carries the offending input.
    pub fn normalize(input: Option<&Quantity>) -> Result<CellValue, String> {
        match input {
            None => Ok(CellValue::Empty),
            Some(Quantity::Number(n)) if n.is_finite() => Ok(CellValue::Number(*n)),
            Some(Quantity::Number(n)) => Err(n.to_string()),
            Some(Quantity::Text(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(CellValue::Empty);
                }
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(CellValue::Number(n)),
                    _ => Err(s.clone()),
                }
            }
        }
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Quantity::Number(value)
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Quantity::Text(value.to_string())
    }
}

/// Item name to quantity for one company column, in sheet row order.
///
/// Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyQuantities {
    entries: Vec<(String, Quantity)>,
}

impl CompanyQuantities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item. A repeated name keeps its first position
    /// and takes the latest value.
    pub fn insert(&mut self, item: String, quantity: Quantity) {
        match self.entries.iter_mut().find(|(name, _)| *name == item) {
            Some((_, existing)) => *existing = quantity,
            None => self.entries.push((item, quantity)),
        }
    }

    pub fn get(&self, item: &str) -> Option<&Quantity> {
        self.entries
            .iter()
            .find(|(name, _)| name == item)
            .map(|(_, q)| q)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Quantity)> + '_ {
        self.entries.iter().map(|(name, q)| (name.as_str(), q))
    }
}

impl Serialize for CompanyQuantities {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, quantity) in &self.entries {
            map.serialize_entry(name, quantity)?;
        }
        map.end()
    }
}

/// A batch of quantity updates in caller order. `None` clears the cell.
///
/// Deserializes from a JSON object, keeping key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuantityUpdates(Vec<(String, Option<Quantity>)>);

impl QuantityUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    pub fn with(mut self, item: impl Into<String>, quantity: Option<Quantity>) -> Self {
        self.0.push((item.into(), quantity));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Quantity>)> + '_ {
        self.0.iter().map(|(name, q)| (name.as_str(), q.as_ref()))
    }
}

impl<'de> Deserialize<'de> for QuantityUpdates {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct UpdatesVisitor;

        impl<'de> Visitor<'de> for UpdatesVisitor {
            type Value = QuantityUpdates;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of item names to quantities")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut updates = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, quantity)) = map.next_entry::<String, Option<Quantity>>()? {
                    updates.push((name, quantity));
                }
                Ok(QuantityUpdates(updates))
            }
        }

        deserializer.deserialize_map(UpdatesVisitor)
    }
}
