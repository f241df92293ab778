use super::hours::Hours;
use chrono::NaiveDate;
use serde::Serialize;

/// One cell of a weekly grid: hours of a user on a sub-project for a day.
#[derive(Debug, Clone, Serialize)]
pub struct TimeEntry {
    pub id: i64,
    pub user_id: i64,
    pub sub_project_id: i64,
    pub work_date: NaiveDate, // ⇔ timesheet_entries.work_date (TEXT "YYYY-MM-DD")
    pub hours: Hours,         // ⇔ timesheet_entries.hours (TEXT decimal)
}

/// Lock/approval marker for one user's hours on one sub-project for one week.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub id: i64,
    pub user_id: i64,
    pub sub_project_id: i64,
    pub week_start: NaiveDate, // always a Monday
    pub status: String,
    pub created_at: String,
}

pub const STATUS_SUBMITTED: &str = "submitted";
