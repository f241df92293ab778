pub mod backup;
pub mod config;
pub mod db;
pub mod init;
pub mod log;
pub mod login;
pub mod project;
pub mod report;
pub mod set;
pub mod stats;
pub mod sub;
pub mod user;
pub mod week;

use crate::errors::AppResult;
use crate::utils::date::{require_date, today};
use chrono::NaiveDate;

/// `--date`/`--week` value, today when missing.
pub(crate) fn date_or_today(value: &Option<String>) -> AppResult<NaiveDate> {
    match value {
        Some(s) => require_date(s),
        None => Ok(today()),
    }
}
