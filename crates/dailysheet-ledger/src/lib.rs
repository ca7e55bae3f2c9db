//! Daily order ledger backed by a single workbook document.
//!
//! Each date gets its own sheet, cloned from the template sheet on first use.
//! Row 1 of a dated sheet holds company names and column B holds item names;
//! quantities live at their intersection.

pub mod error;
pub mod layout;
pub mod ledger;
pub mod quantity;
pub mod store;

pub use error::{LedgerError, StoreError};
pub use ledger::{EnsureOutcome, ItemUpdate, SheetLedger, SheetStatus, UpdateStatus};
pub use quantity::{CompanyQuantities, Quantity, QuantityUpdates};
pub use store::{DocumentStore, JsonFileStore, MemoryStore};
