pub mod entries;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod projects;
pub mod stats;
pub mod users;

use crate::errors::AppError;
use chrono::NaiveDate;
use rusqlite::{ErrorCode, Row};

/// Dates are stored as TEXT "YYYY-MM-DD".
pub(crate) fn date_param(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Read a TEXT date column, mapping bad values to a conversion failure.
pub(crate) fn date_col(row: &Row, name: &str) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(name)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(raw.clone())),
        )
    })
}

/// SQLite booleans are stored as INTEGER 0/1.
pub(crate) fn bool_col(row: &Row, name: &str) -> rusqlite::Result<bool> {
    Ok(row.get::<_, i64>(name)? != 0)
}

/// True when the error is a UNIQUE / PRIMARY KEY violation.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}
