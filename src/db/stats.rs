use crate::db::date_param;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::hours::Hours;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use std::fs;

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROW COUNTS
    //
    for (label, table) in [
        ("Users", "profiles"),
        ("Projects", "projects"),
        ("Sub-projects", "sub_projects"),
        ("Entries", "timesheet_entries"),
        ("Submissions", "timesheet_submissions"),
    ] {
        let count = count_rows(&pool.conn, table)?;
        println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, count, RESET);
    }

    //
    // 3) DATE RANGE
    //
    let (first, last): (Option<String>, Option<String>) = pool.conn.query_row(
        "SELECT MIN(work_date), MAX(work_date) FROM timesheet_entries",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let dash = || format!("{GREY}--{RESET}");
    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", first.unwrap_or_else(dash));
    println!("    to:   {}", last.unwrap_or_else(dash));

    println!();
    Ok(())
}

fn count_rows(conn: &Connection, table: &str) -> AppResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

pub fn count_projects(conn: &Connection) -> AppResult<i64> {
    count_rows(conn, "projects")
}

/// Every entry of the month with the name of its project, if any.
pub fn entries_with_project(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<(Option<String>, Hours)>> {
    let mut stmt = conn.prepare_cached(
        "SELECT p.name, e.hours
         FROM timesheet_entries e
         LEFT JOIN sub_projects s ON s.id = e.sub_project_id
         LEFT JOIN projects p     ON p.id = s.project_id
         WHERE e.work_date BETWEEN ?1 AND ?2",
    )?;
    let rows = stmt.query_map(params![date_param(start), date_param(end)], |row| {
        Ok((row.get(0)?, row.get(1)?))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_submissions_between(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM timesheet_submissions WHERE week_start BETWEEN ?1 AND ?2",
        params![date_param(start), date_param(end)],
        |row| row.get(0),
    )?)
}
