use crate::db::is_unique_violation;
use crate::errors::{AppError, AppResult};
use crate::models::profile::Profile;
use crate::models::role::Role;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_profile(row: &Row) -> rusqlite::Result<Profile> {
    let role_str: String = row.get("role")?;
    let role = Role::from_db_str(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidRole(role_str.clone())),
        )
    })?;

    Ok(Profile {
        id: row.get("id")?,
        username: row.get("username")?,
        full_name: row.get("full_name")?,
        role,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_profile(
    conn: &Connection,
    username: &str,
    full_name: Option<&str>,
    role: Role,
) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO profiles (username, full_name, role, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![username, full_name, role.to_db_str(), Local::now().to_rfc3339()],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::AlreadyExists(format!("user '{}'", username)))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn count_profiles(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))?)
}

pub fn find_by_username(conn: &Connection, username: &str) -> AppResult<Option<Profile>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM profiles WHERE username = ?1")?;
    Ok(stmt.query_row([username], map_profile).optional()?)
}

/// Like [`find_by_username`] but a missing user is an error.
pub fn require_by_username(conn: &Connection, username: &str) -> AppResult<Profile> {
    find_by_username(conn, username)?
        .ok_or_else(|| AppError::NotFound(format!("user '{}'", username)))
}

pub fn list_profiles(conn: &Connection) -> AppResult<Vec<Profile>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM profiles
         ORDER BY COALESCE(full_name, username) ASC, username ASC",
    )?;
    let rows = stmt.query_map([], map_profile)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn update_role(conn: &Connection, user_id: i64, role: Role) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE profiles SET role = ?1 WHERE id = ?2",
        params![role.to_db_str(), user_id],
    )?)
}

/// Profiles assigned to a project, by display name.
pub fn assigned_users(conn: &Connection, project_id: i64) -> AppResult<Vec<Profile>> {
    let mut stmt = conn.prepare(
        "SELECT p.* FROM profiles p
         JOIN project_assignments a ON a.user_id = p.id
         WHERE a.project_id = ?1
         ORDER BY COALESCE(p.full_name, p.username) ASC",
    )?;
    let rows = stmt.query_map([project_id], map_profile)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
