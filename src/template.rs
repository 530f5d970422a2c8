//! Writes the Hebrew cost-item workbook that `importer` reads back.

use std::path::Path;

use rust_xlsxwriter::{Color, DataValidation, Format, FormatAlign, Workbook};

use crate::error::Result;
use crate::importer::{COLUMNS, EXAMPLE_ROW_MARKER};

/// Default file name used when the caller does not pick one.
pub const TEMPLATE_FILE_NAME: &str = "cost-items-template.xlsx";

/// Sheet name shown in the spreadsheet tab.
pub const TEMPLATE_SHEET_NAME: &str = "תבנית פריטי עלות";

/// Options offered by the category dropdown, one per category label.
pub const CATEGORY_OPTIONS: &[&str] = &["יועץ", "ספק", "קבלן", "אגרה"];

/// Options offered by the VAT dropdown.
pub const VAT_OPTIONS: &[&str] = &["כן", "לא"];

// last dropdown row; rows below it accept free text
const DROPDOWN_LAST_ROW: u32 = 99;

/// Writes the import template: a right-to-left sheet with one styled header
/// row, one greyed example row, and dropdowns for category and VAT.
pub fn write_template(path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name(TEMPLATE_SHEET_NAME)?;
    sheet.set_right_to_left(true);

    let header_format = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_background_color(Color::RGB(0xE2E8F0))
        .set_align(FormatAlign::Right);
    let example_format = Format::new()
        .set_italic()
        .set_font_color(Color::RGB(0x999999));

    for (col, column) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, column.width)?;
        sheet.write_string_with_format(0, col, column.header, &header_format)?;
    }

    // example row; blank cells parse the same as missing ones
    sheet.write_string_with_format(1, 0, format!("{EXAMPLE_ROW_MARKER} חשמל"), &example_format)?;
    sheet.write_string_with_format(1, 1, "עבודות חשמל כלליות", &example_format)?;
    sheet.write_string_with_format(1, 2, "קבלן", &example_format)?;
    sheet.write_number_with_format(1, 3, 50000, &example_format)?;
    sheet.write_string_with_format(1, 5, "כן", &example_format)?;

    let category_list = DataValidation::new().allow_list_strings(CATEGORY_OPTIONS)?;
    sheet.add_data_validation(1, 2, DROPDOWN_LAST_ROW, 2, &category_list)?;
    let vat_list = DataValidation::new().allow_list_strings(VAT_OPTIONS)?;
    sheet.add_data_validation(1, 5, DROPDOWN_LAST_ROW, 5, &vat_list)?;

    workbook.save(path)?;
    Ok(())
}
