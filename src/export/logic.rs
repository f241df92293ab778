// src/export/logic.rs

use crate::core::report::ReportRow;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::build_table;
use crate::export::pdf_export::export_pdf;
use crate::export::xlsx::export_xlsx;
use crate::utils::date::{month_bounds, month_name, weeks_in_range};
use chrono::{Datelike, NaiveDate};
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Write aggregated report rows for `[start, end]` to `file`.
    ///
    /// `file` must be an absolute path; an existing file is replaced only
    /// with `force` or after confirmation.
    pub fn export_report(
        rows: &[ReportRow],
        start: NaiveDate,
        end: NaiveDate,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let weeks = weeks_in_range(start, end);
        let title = build_title(start, end);

        match format {
            ExportFormat::Csv => export_csv(&build_table(rows, &weeks, "0"), path)?,
            ExportFormat::Json => export_json(rows, path)?,
            ExportFormat::Xlsx => export_xlsx(&build_table(rows, &weeks, "0"), &title, path)?,
            ExportFormat::Pdf => {
                let subtitle = format!("{} to {}, {} row(s)", start, end, rows.len());
                export_pdf(&build_table(rows, &weeks, "-"), path, &title, &subtitle)?
            }
        }

        Ok(())
    }
}

/// Report title for the selected period.
pub(crate) fn build_title(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        return format!("Weekly report for {}", start);
    }

    let whole_year = start.month() == 1
        && start.day() == 1
        && end.month() == 12
        && end.day() == 31
        && start.year() == end.year();
    if whole_year {
        return format!("Weekly report for year {}", start.year());
    }

    if month_bounds(start.year(), start.month()) == Some((start, end)) {
        return format!(
            "Weekly report for {} {}",
            month_name(start.month()),
            start.year()
        );
    }

    format!("Weekly report from {} to {}", start, end)
}
