// src/export/model.rs

use crate::core::report::ReportRow;
use crate::models::hours::Hours;
use crate::utils::formatting::yes_no;
use chrono::NaiveDate;

/// Flat string table shared by the CSV, XLSX and PDF writers.
pub(crate) struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Column sums, first cell is the label.
    pub totals: Vec<String>,
}

/// Fixed text columns before the week columns.
pub(crate) const LEADING: [&str; 5] = [
    "project",
    "project_code",
    "sub_project",
    "sub_project_description",
    "user",
];

pub(crate) fn week_header(monday: NaiveDate) -> String {
    monday.format("%Y-%m-%d").to_string()
}

/// One column per week in `weeks`. `empty` is written for weeks without
/// hours (`0` for spreadsheets, `-` for print).
pub(crate) fn build_table(rows: &[ReportRow], weeks: &[NaiveDate], empty: &str) -> ReportTable {
    let mut headers: Vec<String> = LEADING.iter().map(|h| h.to_string()).collect();
    headers.extend(weeks.iter().map(|w| week_header(*w)));
    headers.push("total".into());
    headers.push("submitted".into());

    let cell = |h: Hours| {
        if h.is_zero() {
            empty.to_string()
        } else {
            h.to_string()
        }
    };

    let body = rows
        .iter()
        .map(|r| {
            let mut line = vec![
                r.project_name.clone(),
                r.project_code.clone().unwrap_or_default(),
                r.sub_project_code.clone(),
                r.sub_project_description.clone().unwrap_or_default(),
                r.user_name.clone(),
            ];
            line.extend(weeks.iter().map(|w| cell(r.hours_for_week(*w))));
            line.push(r.total_hours.to_string());
            line.push(yes_no(r.is_submitted).to_string());
            line
        })
        .collect();

    let mut totals = vec!["TOTAL".to_string()];
    totals.extend(std::iter::repeat_n(String::new(), LEADING.len() - 1));
    totals.extend(weeks.iter().map(|w| {
        let sum: Hours = rows.iter().map(|r| r.hours_for_week(*w)).sum();
        cell(sum)
    }));
    let grand: Hours = rows.iter().map(|r| r.total_hours).sum();
    totals.push(grand.to_string());
    totals.push(String::new());

    ReportTable {
        headers,
        rows: body,
        totals,
    }
}
