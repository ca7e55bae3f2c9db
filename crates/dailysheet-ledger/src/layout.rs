//! Where things live in a dated sheet: company names across row 1, item names
//! down column B starting at row 2.

use dailysheet_core::{CellCoord, Sheet, Workbook, MAX_SHEET_NAME_LEN};

/// Row holding company names
pub const HEADER_ROW: u32 = 1;
/// Column holding item names
pub const ITEM_COL: u32 = 2;
/// First row with an item
pub const FIRST_ITEM_ROW: u32 = 2;
/// Sheet names probed, in order, for the template
pub const TEMPLATE_NAMES: [&str; 3] = ["MASTER", "Master", "Template"];

/// Sheet name for a date key: trimmed, then cut to the sheet-name limit
pub fn sheet_name_for(date: &str) -> String {
    date.trim().chars().take(MAX_SHEET_NAME_LEN).collect()
}

/// Lookup key for headers and item names
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// The first template candidate present, else the first sheet
pub fn resolve_template(workbook: &Workbook) -> Option<&Sheet> {
    TEMPLATE_NAMES
        .iter()
        .find_map(|name| workbook.get_sheet_by_name(name))
        .or_else(|| workbook.get_sheet(0))
}

/// 1-based column of the first header cell matching `company`, ignoring
/// case and surrounding whitespace
pub fn find_company_column(sheet: &Sheet, company: &str) -> Option<u32> {
    let wanted = normalize_key(company);
    let header = sheet.row(HEADER_ROW)?;

    header
        .cells
        .iter()
        .position(|cell| normalize_key(&cell.display_value()) == wanted)
        .map(|index| index as u32 + 1)
}

/// Item rows as `(row, trimmed name)`, stopping at the first blank item cell.
/// Anything below that blank is not part of the list.
pub fn item_rows(sheet: &Sheet) -> impl Iterator<Item = (u32, String)> + '_ {
    (FIRST_ITEM_ROW..=sheet.row_count())
        .map(move |row| {
            let name = sheet.get_cell_value(CellCoord::new(row, ITEM_COL)).as_text();
            (row, name.trim().to_string())
        })
        .take_while(|(_, name)| !name.is_empty())
}
