use crate::core::session::Session;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::{projects, users};
use crate::errors::{AppError, AppResult};
use crate::models::profile::Profile;
use crate::models::project::{Project, SubProject};
use crate::ui::messages::warning;

/// Fields changed by `project edit`. `Some("")` clears an optional field.
#[derive(Debug, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Entries reference the project: it was only deactivated.
    Deactivated,
    Deleted,
}

/// Project with its sub-projects and assigned users.
pub struct ProjectDetails {
    pub project: Project,
    pub sub_projects: Vec<SubProject>,
    pub users: Vec<Profile>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub struct ProjectLogic;

impl ProjectLogic {
    pub fn add(
        pool: &DbPool,
        session: Option<&Session>,
        name: &str,
        code: Option<&str>,
        description: Option<&str>,
        assign_to: &[String],
    ) -> AppResult<i64> {
        Session::require_admin(session, "project add")?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("project name is required".into()));
        }

        let id = projects::insert_project(&pool.conn, name, non_empty(code), non_empty(description))?;
        audit(&pool.conn, "add", &format!("project #{}", id), &format!("Created project '{}'", name));

        for username in assign_to {
            if let Err(e) = Self::assign(pool, session, id, username) {
                warning(format!("Could not assign '{}': {}", username, e));
            }
        }

        Ok(id)
    }

    pub fn list(pool: &DbPool, session: Option<&Session>) -> AppResult<Vec<Project>> {
        Session::require_admin(session, "project list")?;
        projects::list_projects(&pool.conn)
    }

    pub fn show(pool: &DbPool, session: Option<&Session>, id: i64) -> AppResult<ProjectDetails> {
        Session::require_admin(session, "project show")?;
        let project = projects::require_project(&pool.conn, id)?;
        Ok(ProjectDetails {
            sub_projects: projects::list_sub_projects(&pool.conn, id)?,
            users: users::assigned_users(&pool.conn, id)?,
            project,
        })
    }

    pub fn edit(
        pool: &DbPool,
        session: Option<&Session>,
        id: i64,
        changes: ProjectChanges,
    ) -> AppResult<Project> {
        Session::require_admin(session, "project edit")?;
        let mut project = projects::require_project(&pool.conn, id)?;

        if let Some(name) = changes.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("project name cannot be empty".into()));
            }
            project.name = name.to_string();
        }
        if let Some(code) = changes.code {
            project.code = non_empty(Some(&code)).map(str::to_string);
        }
        if let Some(description) = changes.description {
            project.description = non_empty(Some(&description)).map(str::to_string);
        }
        if let Some(active) = changes.active {
            project.is_active = active;
        }

        projects::update_project(&pool.conn, &project)?;
        audit(
            &pool.conn,
            "edit",
            &format!("project #{}", id),
            &format!("Updated project '{}'", project.name),
        );
        Ok(project)
    }

    /// Hard delete, unless timesheet entries still point at the project.
    pub fn delete(pool: &DbPool, session: Option<&Session>, id: i64) -> AppResult<DeleteOutcome> {
        Session::require_admin(session, "project delete")?;
        let mut project = projects::require_project(&pool.conn, id)?;
        let target = format!("project #{}", id);

        if projects::count_entries_for_project(&pool.conn, id)? > 0 {
            project.is_active = false;
            projects::update_project(&pool.conn, &project)?;
            audit(
                &pool.conn,
                "edit",
                &target,
                &format!("Deactivated project '{}' (has entries)", project.name),
            );
            return Ok(DeleteOutcome::Deactivated);
        }

        projects::delete_project(&pool.conn, id)?;
        audit(&pool.conn, "del", &target, &format!("Deleted project '{}'", project.name));
        Ok(DeleteOutcome::Deleted)
    }

    /// Returns false when the user was already assigned.
    pub fn assign(
        pool: &DbPool,
        session: Option<&Session>,
        project_id: i64,
        username: &str,
    ) -> AppResult<bool> {
        Session::require_admin(session, "project assign")?;
        let project = projects::require_project(&pool.conn, project_id)?;
        let user = users::require_by_username(&pool.conn, username)?;

        let added = projects::assign(&pool.conn, user.id, project.id)?;
        if added {
            audit(
                &pool.conn,
                "assign",
                &format!("project #{}", project.id),
                &format!("Assigned {} to '{}'", user.username, project.name),
            );
        }
        Ok(added)
    }

    /// Returns false when the user was not assigned.
    pub fn unassign(
        pool: &DbPool,
        session: Option<&Session>,
        project_id: i64,
        username: &str,
    ) -> AppResult<bool> {
        Session::require_admin(session, "project unassign")?;
        let project = projects::require_project(&pool.conn, project_id)?;
        let user = users::require_by_username(&pool.conn, username)?;

        let removed = projects::unassign(&pool.conn, user.id, project.id)?;
        if removed {
            audit(
                &pool.conn,
                "unassign",
                &format!("project #{}", project.id),
                &format!("Removed {} from '{}'", user.username, project.name),
            );
        }
        Ok(removed)
    }

    // ---------------------------
    // Sub-projects
    // ---------------------------

    pub fn add_sub(
        pool: &DbPool,
        session: Option<&Session>,
        project_id: i64,
        code: &str,
        description: Option<&str>,
    ) -> AppResult<i64> {
        Session::require_admin(session, "sub add")?;
        let project = projects::require_project(&pool.conn, project_id)?;

        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::Validation("sub-project code is required".into()));
        }
        if projects::list_sub_projects(&pool.conn, project.id)?
            .iter()
            .any(|s| s.code.to_lowercase() == code.to_lowercase())
        {
            return Err(AppError::AlreadyExists(format!(
                "sub-project '{}' in '{}'",
                code, project.name
            )));
        }

        let id = projects::insert_sub_project(&pool.conn, project.id, code, non_empty(description))?;
        audit(
            &pool.conn,
            "add",
            &format!("sub-project #{}", id),
            &format!("Created sub-project '{}' in '{}'", code, project.name),
        );
        Ok(id)
    }

    pub fn list_subs(
        pool: &DbPool,
        session: Option<&Session>,
        project_id: i64,
    ) -> AppResult<(Project, Vec<SubProject>)> {
        Session::require_admin(session, "sub list")?;
        let project = projects::require_project(&pool.conn, project_id)?;
        let subs = projects::list_sub_projects(&pool.conn, project.id)?;
        Ok((project, subs))
    }

    pub fn toggle_sub(
        pool: &DbPool,
        session: Option<&Session>,
        sub_project_id: i64,
        active: bool,
    ) -> AppResult<SubProject> {
        Session::require_admin(session, "sub toggle")?;
        let mut sub = projects::require_sub_project(&pool.conn, sub_project_id)?;

        projects::set_sub_project_active(&pool.conn, sub.id, active)?;
        sub.is_active = active;
        audit(
            &pool.conn,
            "edit",
            &format!("sub-project #{}", sub.id),
            &format!(
                "Sub-project '{}' is now {}",
                sub.code,
                if active { "active" } else { "inactive" }
            ),
        );
        Ok(sub)
    }
}
