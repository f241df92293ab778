// src/export/pdf_export.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{LEADING, ReportTable};
use crate::export::notify_export_success;
use crate::export::pdf::PdfManager;
use crate::ui::messages::info;
use std::path::Path;

/// More week columns than this switch the page to landscape.
const PORTRAIT_WEEKS: usize = 3;

pub(crate) fn export_pdf(
    table: &ReportTable,
    path: &Path,
    title: &str,
    subtitle: &str,
) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    // leading labels + weeks + total + submitted
    let weeks = table.headers.len().saturating_sub(LEADING.len() + 2);

    let mut pdf = PdfManager::new(weeks > PORTRAIT_WEEKS);
    pdf.write_report(
        title,
        subtitle,
        &table.headers,
        &table.rows,
        &table.totals,
        LEADING.len(),
    );

    pdf.save(path)
        .map_err(|e| AppError::Export(format!("PDF export error: {e}")))?;

    notify_export_success("PDF", path);
    Ok(())
}
