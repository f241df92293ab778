//! Unified application error type.
//! All modules (db, core, cli, export) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid hours value: {0} (expected a number between 0 and 24)")]
    InvalidHours(String),

    #[error("Invalid role: {0} (expected 'admin' or 'employee')")]
    InvalidRole(String),

    // ---------------------------
    // Session / authorization
    // ---------------------------
    #[error("No active session: run `rtimesheet login <username>` or pass --user")]
    Unauthenticated,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("You are not assigned to project '{0}'")]
    NotAssigned(String),

    #[error("Sub-project '{0}' is not active")]
    InactiveSubProject(String),

    #[error("Week starting {0} is already submitted and cannot be changed")]
    WeekLocked(String),

    #[error("Week starting {0} has already been submitted")]
    AlreadySubmitted(String),

    #[error("No entries in the week starting {0}: nothing to copy")]
    NothingToCopy(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),

    #[error("Failed to save configuration: {0}")]
    ConfigSave(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

pub type AppResult<T> = Result<T, AppError>;
