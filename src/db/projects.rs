use crate::db::{bool_col, is_unique_violation};
use crate::errors::{AppError, AppResult};
use crate::models::project::{Project, SubProject};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

pub fn map_project(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        code: row.get("project_code")?,
        description: row.get("description")?,
        is_active: bool_col(row, "is_active")?,
        created_at: row.get("created_at")?,
    })
}

pub fn map_sub_project(row: &Row) -> rusqlite::Result<SubProject> {
    Ok(SubProject {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        code: row.get("code")?,
        description: row.get("description")?,
        is_active: bool_col(row, "is_active")?,
    })
}

fn collect<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> AppResult<Vec<T>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Projects
// ---------------------------

pub fn insert_project(
    conn: &Connection,
    name: &str,
    code: Option<&str>,
    description: Option<&str>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO projects (name, project_code, description, is_active, created_at)
         VALUES (?1, ?2, ?3, 1, ?4)",
        params![name, code, description, Local::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Newest first.
pub fn list_projects(conn: &Connection) -> AppResult<Vec<Project>> {
    let mut stmt = conn.prepare("SELECT * FROM projects ORDER BY created_at DESC, id DESC")?;
    let rows = stmt.query_map([], map_project)?;
    collect(rows)
}

pub fn find_project(conn: &Connection, id: i64) -> AppResult<Option<Project>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM projects WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_project).optional()?)
}

pub fn require_project(conn: &Connection, id: i64) -> AppResult<Project> {
    find_project(conn, id)?.ok_or_else(|| AppError::NotFound(format!("project #{}", id)))
}

pub fn update_project(conn: &Connection, p: &Project) -> AppResult<()> {
    conn.execute(
        "UPDATE projects
         SET name = ?1, project_code = ?2, description = ?3, is_active = ?4
         WHERE id = ?5",
        params![p.name, p.code, p.description, p.is_active as i64, p.id],
    )?;
    Ok(())
}

pub fn delete_project(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM projects WHERE id = ?1", [id])?)
}

/// Timesheet entries booked on any sub-project of the project.
pub fn count_entries_for_project(conn: &Connection, project_id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM timesheet_entries e
         JOIN sub_projects s ON s.id = e.sub_project_id
         WHERE s.project_id = ?1",
        [project_id],
        |row| row.get(0),
    )?)
}

// ---------------------------
// Assignments
// ---------------------------

/// Returns false when the assignment already existed.
pub fn assign(conn: &Connection, user_id: i64, project_id: i64) -> AppResult<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO project_assignments (user_id, project_id) VALUES (?1, ?2)",
        params![user_id, project_id],
    )?;
    Ok(n > 0)
}

/// Returns false when there was nothing to remove.
pub fn unassign(conn: &Connection, user_id: i64, project_id: i64) -> AppResult<bool> {
    let n = conn.execute(
        "DELETE FROM project_assignments WHERE user_id = ?1 AND project_id = ?2",
        params![user_id, project_id],
    )?;
    Ok(n > 0)
}

pub fn unassign_all(conn: &Connection, user_id: i64) -> AppResult<usize> {
    Ok(conn.execute(
        "DELETE FROM project_assignments WHERE user_id = ?1",
        [user_id],
    )?)
}

pub fn is_assigned(conn: &Connection, user_id: i64, project_id: i64) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM project_assignments WHERE user_id = ?1 AND project_id = ?2",
    )?;
    Ok(stmt.exists(params![user_id, project_id])?)
}

/// Projects assigned to a user, by name.
pub fn assigned_projects(
    conn: &Connection,
    user_id: i64,
    only_active: bool,
) -> AppResult<Vec<Project>> {
    let mut stmt = conn.prepare(
        "SELECT p.* FROM projects p
         JOIN project_assignments a ON a.project_id = p.id
         WHERE a.user_id = ?1 AND (?2 = 0 OR p.is_active = 1)
         ORDER BY p.name ASC, p.id ASC",
    )?;
    let rows = stmt.query_map(params![user_id, only_active as i64], map_project)?;
    collect(rows)
}

// ---------------------------
// Sub-projects
// ---------------------------

pub fn insert_sub_project(
    conn: &Connection,
    project_id: i64,
    code: &str,
    description: Option<&str>,
) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO sub_projects (project_id, code, description, is_active)
         VALUES (?1, ?2, ?3, 1)",
        params![project_id, code, description],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_unique_violation(&e) => Err(AppError::AlreadyExists(format!(
            "sub-project '{}' in project #{}",
            code, project_id
        ))),
        Err(e) => Err(e.into()),
    }
}

pub fn list_sub_projects(conn: &Connection, project_id: i64) -> AppResult<Vec<SubProject>> {
    let mut stmt =
        conn.prepare("SELECT * FROM sub_projects WHERE project_id = ?1 ORDER BY code ASC, id ASC")?;
    let rows = stmt.query_map([project_id], map_sub_project)?;
    collect(rows)
}

/// Active sub-projects of the given projects.
pub fn active_sub_projects_for(
    conn: &Connection,
    project_ids: &[i64],
) -> AppResult<Vec<SubProject>> {
    if project_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; project_ids.len()].join(",");
    let sql = format!(
        "SELECT * FROM sub_projects
         WHERE project_id IN ({}) AND is_active = 1
         ORDER BY code ASC, id ASC",
        placeholders
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(project_ids.iter()), map_sub_project)?;
    collect(rows)
}

pub fn find_sub_project(conn: &Connection, id: i64) -> AppResult<Option<SubProject>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM sub_projects WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_sub_project).optional()?)
}

pub fn require_sub_project(conn: &Connection, id: i64) -> AppResult<SubProject> {
    find_sub_project(conn, id)?.ok_or_else(|| AppError::NotFound(format!("sub-project #{}", id)))
}

pub fn set_sub_project_active(conn: &Connection, id: i64, active: bool) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE sub_projects SET is_active = ?1 WHERE id = ?2",
        params![active as i64, id],
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;

    #[test]
    fn sub_project_codes_are_unique_per_project_ignoring_case() {
        let pool = DbPool::in_memory().unwrap();
        let apollo = insert_project(&pool.conn, "Apollo", None, None).unwrap();
        let zeus = insert_project(&pool.conn, "Zeus", None, None).unwrap();

        insert_sub_project(&pool.conn, apollo, "DEV", None).unwrap();

        let err = insert_sub_project(&pool.conn, apollo, "dev", None).unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));

        // same code in another project is fine
        insert_sub_project(&pool.conn, zeus, "dev", None).unwrap();
        assert_eq!(list_sub_projects(&pool.conn, apollo).unwrap().len(), 1);
    }
}
