pub mod cell;
pub mod error;
pub mod range;
pub mod sheet;
pub mod workbook;

pub use cell::{CellContent, CellValue};
pub use error::{CellError, WorkbookError};
pub use range::{col_from_label, col_to_label, CellCoord, CellRange};
pub use sheet::{Row, Sheet, DEFAULT_ROW_HEIGHT};
pub use workbook::{Workbook, WorkbookMetadata, MAX_SHEET_NAME_LEN};
