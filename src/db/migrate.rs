use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result, params};

/// Ensure that the `log` table exists with the modern schema.
/// Applied migrations are tracked in it, so it must come first.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Profiles, projects, sub-projects and project assignments.
const CORE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS profiles (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        username    TEXT NOT NULL UNIQUE,
        full_name   TEXT,
        role        TEXT NOT NULL DEFAULT 'employee' CHECK(role IN ('admin','employee')),
        created_at  TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS projects (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        name          TEXT NOT NULL,
        project_code  TEXT,
        is_active     INTEGER NOT NULL DEFAULT 1,
        created_at    TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS sub_projects (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id  INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        code        TEXT NOT NULL,
        description TEXT,
        is_active   INTEGER NOT NULL DEFAULT 1
    );

    CREATE INDEX IF NOT EXISTS idx_sub_projects_project ON sub_projects(project_id);

    CREATE TABLE IF NOT EXISTS project_assignments (
        user_id     INTEGER NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
        project_id  INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        PRIMARY KEY (user_id, project_id)
    );
"#;

/// Weekly grid cells and week submissions.
///
/// No foreign keys here: entries must survive a deleted profile or
/// sub-project so that report totals never lose hours.
const TIMESHEET_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS timesheet_entries (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id         INTEGER NOT NULL,
        sub_project_id  INTEGER NOT NULL,
        work_date       TEXT NOT NULL,
        hours           TEXT NOT NULL,
        UNIQUE (user_id, sub_project_id, work_date)
    );

    CREATE INDEX IF NOT EXISTS idx_entries_work_date ON timesheet_entries(work_date);

    CREATE TABLE IF NOT EXISTS timesheet_submissions (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id         INTEGER NOT NULL,
        sub_project_id  INTEGER NOT NULL,
        week_start      TEXT NOT NULL,
        status          TEXT NOT NULL DEFAULT 'submitted',
        created_at      TEXT NOT NULL,
        UNIQUE (user_id, sub_project_id, week_start)
    );

    CREATE INDEX IF NOT EXISTS idx_submissions_week ON timesheet_submissions(week_start);
"#;

const PROJECT_DESCRIPTION: &str = r#"
    ALTER TABLE projects ADD COLUMN description TEXT;
"#;

const SUB_PROJECT_CODE_UNIQUE: &str = r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_sub_projects_code
        ON sub_projects(project_id, code COLLATE NOCASE);
"#;

/// Ordered list of (version, description, SQL).
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20250301_0001_core_schema",
        "Created profiles, projects, sub_projects and project_assignments",
        CORE_SCHEMA,
    ),
    (
        "20250301_0002_timesheet_schema",
        "Created timesheet_entries and timesheet_submissions",
        TIMESHEET_SCHEMA,
    ),
    (
        "20250412_0003_project_description",
        "Added description to projects",
        PROJECT_DESCRIPTION,
    ),
    (
        "20250520_0004_sub_project_code_unique",
        "Sub-project codes unique per project",
        SUB_PROJECT_CODE_UNIQUE,
    ),
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Run one migration and mark it as applied, atomically.
fn apply(conn: &Connection, version: &str, message: &str, sql: &str) -> Result<bool> {
    if is_applied(conn, version)? {
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        params![version, message],
    )?;
    tx.commit()?;

    Ok(true)
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db() and `db --migrate`. Idempotent.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for (version, message, sql) in MIGRATIONS {
        if apply(conn, version, message, sql)? {
            success(format!("Migration applied: {} → {}", version, message));
        }
    }

    Ok(())
}

/// Versions already recorded in the `log` table.
pub fn applied_versions(conn: &Connection) -> Result<Vec<String>> {
    ensure_log_table(conn)?;
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
