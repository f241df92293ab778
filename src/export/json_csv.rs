// src/export/json_csv.rs

use crate::core::report::ReportRow;
use crate::errors::{AppError, AppResult};
use crate::export::model::ReportTable;
use crate::export::notify_export_success;
use crate::ui::messages::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Rows as pretty JSON, week breakdown kept as a `{ "YYYY-MM-DD": hours }` map.
pub(crate) fn export_json(rows: &[ReportRow], path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(rows)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success("JSON", path);
    Ok(())
}

/// Header line, one record per row, then the totals line. Week columns vary
/// with the period, so records are written positionally.
pub(crate) fn export_csv(table: &ReportTable, path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    wtr.write_record(&table.headers)
        .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;

    for row in &table.rows {
        wtr.write_record(row)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.write_record(&table.totals)
        .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;

    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
