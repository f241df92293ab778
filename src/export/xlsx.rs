// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{LEADING, ReportTable};
use crate::export::notify_export_success;
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const SHEET_NAME: &str = "Weekly report";

/// Report sheet: title line, styled header, banded rows and a totals line.
pub(crate) fn export_xlsx(table: &ReportTable, title: &str, path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(to_export_error)?;

    let title_format = Format::new().set_bold().set_font_size(14);
    worksheet
        .write_with_format(0, 0, title, &title_format)
        .map_err(to_export_error)?;

    // ---------------------------
    // Header
    // ---------------------------
    let header_row = 2;
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_with_format(header_row, col as u16, header.as_str(), &header_format)
            .map_err(to_export_error)?;
    }

    worksheet.set_freeze_panes(header_row + 1, 0).ok();

    let mut col_widths: Vec<usize> = table
        .headers
        .iter()
        .map(|h| UnicodeWidthStr::width(h.as_str()))
        .collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    // ---------------------------
    // Rows
    // ---------------------------
    for (row_index, values) in table.rows.iter().enumerate() {
        let row = header_row + 1 + row_index as u32;
        let band_color = if row_index % 2 == 0 { band1 } else { band2 };
        let base = Format::new()
            .set_background_color(band_color)
            .set_pattern(FormatPattern::Solid)
            .set_border(FormatBorder::Thin);

        for (col, value) in values.iter().enumerate() {
            write_cell(worksheet, row, col as u16, value, &base)?;
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    // ---------------------------
    // Totals
    // ---------------------------
    let totals_row = header_row + 1 + table.rows.len() as u32;
    let totals_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD9E1F2))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
        .set_border_top(FormatBorder::Double);

    for (col, value) in table.totals.iter().enumerate() {
        write_cell(worksheet, totals_row, col as u16, value, &totals_format)?;
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_export_error)?;
    }

    workbook.save(path).map_err(to_export_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

/// Hour columns go in as numbers, labels always as text.
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    s: &str,
    base: &Format,
) -> AppResult<()> {
    let numeric = (col as usize) >= LEADING.len();
    if let Some(num) = s.parse::<f64>().ok().filter(|_| numeric) {
        let fmt = base.clone().set_align(FormatAlign::Right).set_num_format("0.00");
        worksheet
            .write_with_format(row, col, num, &fmt)
            .map_err(to_export_error)?;
    } else {
        worksheet
            .write_with_format(row, col, s, base)
            .map_err(to_export_error)?;
    }
    Ok(())
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
