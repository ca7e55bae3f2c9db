use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use dailysheet_core::{CellCoord, CellError, CellValue, Row, Sheet, Workbook};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::layout::{self, find_company_column, item_rows, normalize_key};
use crate::quantity::{CompanyQuantities, Quantity, QuantityUpdates};
use crate::store::DocumentStore;

/// Whether `ensure_daily_sheet` found or made the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetStatus {
    Exists,
    Created,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsureOutcome {
    pub status: SheetStatus,
    pub sheet_name: String,
}

/// Per-item outcome of a quantity update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateStatus {
    Updated,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdate {
    /// Item name as the caller sent it
    pub veg: String,
    pub status: UpdateStatus,
}

/// The daily order ledger.
///
/// Stateless between calls: each operation loads the document from the store,
/// works on it, and persists it again when something changed. Clones share a
/// write gate, so mutating operations are serialized from load through persist
/// and concurrent writers cannot drop each other's changes.
#[derive(Clone)]
pub struct SheetLedger {
    store: Arc<dyn DocumentStore>,
    write_gate: Arc<Mutex<()>>,
}

impl SheetLedger {
    pub fn new(store: impl DocumentStore + 'static) -> Self {
        Self::from_shared(Arc::new(store))
    }

    pub fn from_shared(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Make sure a sheet exists for `date`, cloning the template on first use
    pub fn ensure_daily_sheet(&self, date: &str) -> Result<EnsureOutcome, LedgerError> {
        let sheet_name = required(date, "date").map(layout::sheet_name_for)?;

        let _guard = self.write_gate.lock().unwrap_or_else(PoisonError::into_inner);
        let mut workbook = self.store.load()?;

        if workbook.get_sheet_by_name(&sheet_name).is_some() {
            tracing::debug!("Sheet {} already exists", sheet_name);
            return Ok(EnsureOutcome {
                status: SheetStatus::Exists,
                sheet_name,
            });
        }

        let template = layout::resolve_template(&workbook).ok_or(LedgerError::TemplateMissing)?;
        let template_name = template.name.clone();
        let sheet = clone_template(template, &sheet_name);

        workbook
            .add_sheet(sheet)
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        self.persist(&mut workbook)?;

        tracing::info!("Created sheet {} from template {}", sheet_name, template_name);
        Ok(EnsureOutcome {
            status: SheetStatus::Created,
            sheet_name,
        })
    }

    /// Read one company's column as item name -> quantity.
    ///
    /// A company without a header column yields an empty mapping.
    pub fn read_company_quantities(
        &self,
        date: &str,
        company: &str,
    ) -> Result<CompanyQuantities, LedgerError> {
        let sheet_name = required(date, "date").map(layout::sheet_name_for)?;
        let company = required(company, "company")?;

        let workbook = self.store.load()?;
        let sheet = dated_sheet(&workbook, &sheet_name)?;

        let mut quantities = CompanyQuantities::new();
        let Some(col) = find_company_column(sheet, company) else {
            tracing::debug!("No column for {} in sheet {}", company, sheet_name);
            return Ok(quantities);
        };

        for (row, item) in item_rows(sheet) {
            let value = sheet.get_cell_value(CellCoord::new(row, col));
            quantities.insert(item, Quantity::from_cell_value(value));
        }

        Ok(quantities)
    }

    /// Merge `updates` into one company's column.
    ///
    /// Formula cells keep their expression and only take the new value as
    /// their cached result. Unknown items are reported as not found without
    /// failing the rest of the batch. A quantity that is not a number is
    /// stored as `#NUM!`.
    pub fn write_company_quantities(
        &self,
        date: &str,
        company: &str,
        updates: &QuantityUpdates,
    ) -> Result<Vec<ItemUpdate>, LedgerError> {
        let sheet_name = required(date, "date").map(layout::sheet_name_for)?;
        let company = required(company, "company")?;

        let _guard = self.write_gate.lock().unwrap_or_else(PoisonError::into_inner);
        let mut workbook = self.store.load()?;
        let sheet = dated_sheet_mut(&mut workbook, &sheet_name)?;

        let col = find_company_column(sheet, company)
            .ok_or_else(|| LedgerError::CompanyNotFound(company.to_string()))?;

        // Later duplicates win, matching a plain map insert
        let rows: HashMap<String, u32> = item_rows(sheet)
            .map(|(row, item)| (normalize_key(&item), row))
            .collect();

        let mut results = Vec::with_capacity(updates.len());
        for (item, qty) in updates.iter() {
            let status = match rows.get(&normalize_key(item)) {
                Some(&row) => {
                    let value = Quantity::normalize(qty).unwrap_or_else(|raw| {
                        tracing::warn!("Quantity {:?} for {} is not a number", raw, item);
                        CellValue::Error(CellError::NumError)
                    });
                    sheet.get_cell_mut(CellCoord::new(row, col)).overwrite(value);
                    UpdateStatus::Updated
                }
                None => {
                    tracing::warn!("Item {} not found in sheet {}", item, sheet_name);
                    UpdateStatus::NotFound
                }
            };
            results.push(ItemUpdate {
                veg: item.to_string(),
                status,
            });
        }

        self.persist(&mut workbook)?;

        tracing::info!(
            "Updated {} of {} items for {} in sheet {}",
            results
                .iter()
                .filter(|r| r.status == UpdateStatus::Updated)
                .count(),
            results.len(),
            company,
            sheet_name
        );
        Ok(results)
    }

    /// Raw bytes of the persisted document, `None` if nothing is stored
    pub fn download_document(&self) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.store.raw_bytes()?)
    }

    fn persist(&self, workbook: &mut Workbook) -> Result<(), LedgerError> {
        workbook.mark_full_recalc();
        workbook.metadata.modified_at = Some(chrono::Utc::now().to_rfc3339());
        self.store.persist(workbook)?;
        Ok(())
    }
}

/// Trimmed input, or a validation error naming the field
fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, LedgerError> {
    let value = value.trim();
    if value.is_empty() {
        Err(LedgerError::missing(field))
    } else {
        Ok(value)
    }
}

fn dated_sheet<'a>(workbook: &'a Workbook, name: &str) -> Result<&'a Sheet, LedgerError> {
    workbook
        .get_sheet_by_name(name)
        .ok_or_else(|| LedgerError::SheetNotFound(name.to_string()))
}

fn dated_sheet_mut<'a>(
    workbook: &'a mut Workbook,
    name: &str,
) -> Result<&'a mut Sheet, LedgerError> {
    workbook
        .get_sheet_by_name_mut(name)
        .ok_or_else(|| LedgerError::SheetNotFound(name.to_string()))
}

/// Copy the template row by row (empty rows included, so row numbers line up),
/// with explicit heights and merged regions.
fn clone_template(template: &Sheet, name: &str) -> Sheet {
    let mut sheet = Sheet::new(name);
    sheet.default_row_height = template.default_row_height;

    for (_, row) in template.rows() {
        sheet.push_row(Row {
            cells: row.cells.clone(),
            height: row.height,
        });
    }

    sheet.set_merges(template.merges().to_vec());

    sheet
}
