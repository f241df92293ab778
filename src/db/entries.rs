use crate::core::report::{ReportEntry, SubmissionKey};
use crate::db::{date_col, date_param, is_unique_violation};
use crate::errors::{AppError, AppResult};
use crate::models::entry::{STATUS_SUBMITTED, Submission, TimeEntry};
use crate::models::hours::Hours;
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, Row, params};
use std::collections::HashSet;

pub fn map_entry(row: &Row) -> rusqlite::Result<TimeEntry> {
    Ok(TimeEntry {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        sub_project_id: row.get("sub_project_id")?,
        work_date: date_col(row, "work_date")?,
        hours: row.get("hours")?,
    })
}

pub fn map_submission(row: &Row) -> rusqlite::Result<Submission> {
    Ok(Submission {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        sub_project_id: row.get("sub_project_id")?,
        week_start: date_col(row, "week_start")?,
        status: row.get("status")?,
        created_at: row.get("created_at")?,
    })
}

// ---------------------------
// Entries
// ---------------------------

/// Insert or overwrite the cell for (user, sub-project, date).
pub fn upsert_entry(
    conn: &Connection,
    user_id: i64,
    sub_project_id: i64,
    work_date: NaiveDate,
    hours: Hours,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO timesheet_entries (user_id, sub_project_id, work_date, hours)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id, sub_project_id, work_date)
         DO UPDATE SET hours = excluded.hours",
        params![user_id, sub_project_id, date_param(work_date), hours],
    )?;
    Ok(())
}

pub fn delete_entry(
    conn: &Connection,
    user_id: i64,
    sub_project_id: i64,
    work_date: NaiveDate,
) -> AppResult<usize> {
    Ok(conn.execute(
        "DELETE FROM timesheet_entries
         WHERE user_id = ?1 AND sub_project_id = ?2 AND work_date = ?3",
        params![user_id, sub_project_id, date_param(work_date)],
    )?)
}

/// Returns false when the cell already had a value.
pub fn insert_entry_if_absent(
    conn: &Connection,
    user_id: i64,
    sub_project_id: i64,
    work_date: NaiveDate,
    hours: Hours,
) -> AppResult<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO timesheet_entries (user_id, sub_project_id, work_date, hours)
         VALUES (?1, ?2, ?3, ?4)",
        params![user_id, sub_project_id, date_param(work_date), hours],
    )?;
    Ok(n > 0)
}

pub fn entries_for_user_between(
    conn: &Connection,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<TimeEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM timesheet_entries
         WHERE user_id = ?1 AND work_date BETWEEN ?2 AND ?3
         ORDER BY work_date ASC, sub_project_id ASC",
    )?;
    let rows = stmt.query_map(
        params![user_id, date_param(start), date_param(end)],
        map_entry,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Entries in `[start, end]` with their labels.
///
/// LEFT JOINs keep entries whose profile or sub-project no longer exists;
/// their labels come back as NULL.
pub fn report_entries(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<ReportEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT e.id, e.work_date, e.hours, e.user_id, e.sub_project_id,
                COALESCE(NULLIF(TRIM(u.full_name), ''), u.username) AS user_name,
                s.code        AS sub_project_code,
                s.description AS sub_project_description,
                p.name        AS project_name,
                p.project_code
         FROM timesheet_entries e
         LEFT JOIN profiles u     ON u.id = e.user_id
         LEFT JOIN sub_projects s ON s.id = e.sub_project_id
         LEFT JOIN projects p     ON p.id = s.project_id
         WHERE e.work_date BETWEEN ?1 AND ?2
         ORDER BY e.work_date ASC, e.id ASC",
    )?;

    let rows = stmt.query_map(params![date_param(start), date_param(end)], |row| {
        Ok(ReportEntry {
            id: row.get("id")?,
            work_date: date_col(row, "work_date")?,
            hours: row.get("hours")?,
            user_id: row.get("user_id")?,
            sub_project_id: row.get("sub_project_id")?,
            user_name: row.get("user_name")?,
            sub_project_code: row.get("sub_project_code")?,
            sub_project_description: row.get("sub_project_description")?,
            project_name: row.get("project_name")?,
            project_code: row.get("project_code")?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Submissions
// ---------------------------

pub fn insert_submission(
    conn: &Connection,
    user_id: i64,
    sub_project_id: i64,
    week_start: NaiveDate,
) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO timesheet_submissions (user_id, sub_project_id, week_start, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            sub_project_id,
            date_param(week_start),
            STATUS_SUBMITTED,
            Local::now().to_rfc3339()
        ],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::AlreadySubmitted(date_param(week_start)))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn is_week_submitted(
    conn: &Connection,
    user_id: i64,
    sub_project_id: i64,
    week_start: NaiveDate,
) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM timesheet_submissions
         WHERE user_id = ?1 AND sub_project_id = ?2 AND week_start = ?3",
    )?;
    Ok(stmt.exists(params![user_id, sub_project_id, date_param(week_start)])?)
}

/// Submissions of one user for one week.
pub fn submissions_for_week(
    conn: &Connection,
    user_id: i64,
    week_start: NaiveDate,
) -> AppResult<Vec<Submission>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM timesheet_submissions
         WHERE user_id = ?1 AND week_start = ?2
         ORDER BY sub_project_id ASC",
    )?;
    let rows = stmt.query_map(params![user_id, date_param(week_start)], map_submission)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Membership set of submissions whose week starts in `[start, end]`.
pub fn submission_keys_between(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<HashSet<SubmissionKey>> {
    let mut stmt = conn.prepare_cached(
        "SELECT user_id, sub_project_id, week_start FROM timesheet_submissions
         WHERE week_start BETWEEN ?1 AND ?2",
    )?;
    let rows = stmt.query_map(params![date_param(start), date_param(end)], |row| {
        Ok(SubmissionKey {
            user_id: row.get("user_id")?,
            sub_project_id: row.get("sub_project_id")?,
            week_start: date_col(row, "week_start")?,
        })
    })?;

    let mut out = HashSet::new();
    for r in rows {
        out.insert(r?);
    }
    Ok(out)
}
