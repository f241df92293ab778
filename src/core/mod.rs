pub mod backup;
pub mod config;
pub mod log;
pub mod project;
pub mod report;
pub mod session;
pub mod stats;
pub mod timesheet;
pub mod user;
