use crate::config::Config;
use crate::core::session::Session;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::{projects, users};
use crate::errors::{AppError, AppResult};
use crate::models::profile::Profile;
use crate::models::project::Project;
use crate::models::role::Role;
use crate::ui::messages::info;

pub struct UserLogic;

impl UserLogic {
    /// Create a profile.
    ///
    /// While the database has no profile at all, no session is needed and
    /// the new profile is always an admin.
    pub fn add(
        pool: &DbPool,
        session: Option<&Session>,
        username: &str,
        full_name: Option<&str>,
        role: Option<Role>,
    ) -> AppResult<Profile> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::Validation("username is required".into()));
        }
        if username.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(format!(
                "username '{}' must not contain spaces",
                username
            )));
        }

        let bootstrap = users::count_profiles(&pool.conn)? == 0;
        let role = if bootstrap {
            if role == Some(Role::Employee) {
                info("First user: creating it as admin.");
            }
            Role::Admin
        } else {
            Session::require_admin(session, "user add")?;
            role.unwrap_or(Role::Employee)
        };

        let full_name = full_name.map(str::trim).filter(|n| !n.is_empty());
        users::insert_profile(&pool.conn, username, full_name, role)?;
        audit(
            &pool.conn,
            "add",
            &format!("user {}", username),
            &format!("Created user '{}' ({})", username, role),
        );

        users::require_by_username(&pool.conn, username)
    }

    pub fn list(pool: &DbPool, session: Option<&Session>) -> AppResult<Vec<Profile>> {
        Session::require_admin(session, "user list")?;
        users::list_profiles(&pool.conn)
    }

    /// Profile and every project it is assigned to.
    pub fn show(
        pool: &DbPool,
        session: Option<&Session>,
        username: &str,
    ) -> AppResult<(Profile, Vec<Project>)> {
        Session::require_admin(session, "user show")?;
        let profile = users::require_by_username(&pool.conn, username)?;
        let assigned = projects::assigned_projects(&pool.conn, profile.id, false)?;
        Ok((profile, assigned))
    }

    pub fn set_role(
        pool: &DbPool,
        session: Option<&Session>,
        username: &str,
        role: Role,
    ) -> AppResult<Profile> {
        let me = Session::require_admin(session, "user role")?;
        let mut profile = users::require_by_username(&pool.conn, username)?;

        if profile.id == me.user_id() && !role.is_admin() {
            return Err(AppError::Validation(
                "you cannot remove the admin role from yourself".into(),
            ));
        }

        users::update_role(&pool.conn, profile.id, role)?;
        audit(
            &pool.conn,
            "edit",
            &format!("user {}", profile.username),
            &format!("Role changed from {} to {}", profile.role, role),
        );
        profile.role = role;
        Ok(profile)
    }

    /// Drop every project assignment of the user. Returns how many were removed.
    pub fn deactivate(pool: &DbPool, session: Option<&Session>, username: &str) -> AppResult<usize> {
        Session::require_admin(session, "user deactivate")?;
        let profile = users::require_by_username(&pool.conn, username)?;

        let removed = projects::unassign_all(&pool.conn, profile.id)?;
        audit(
            &pool.conn,
            "deactivate",
            &format!("user {}", profile.username),
            &format!("Removed {} project assignment(s)", removed),
        );
        Ok(removed)
    }

    /// Remember `username` as the current user in the configuration file.
    pub fn login(pool: &DbPool, username: &str, is_test: bool) -> AppResult<Profile> {
        let profile = users::require_by_username(&pool.conn, username.trim())?;

        if !is_test {
            let mut stored = Config::load()?;
            stored.current_user = Some(profile.username.clone());
            stored.save()?;
        }

        audit(
            &pool.conn,
            "login",
            &format!("user {}", profile.username),
            "Session started",
        );
        Ok(profile)
    }

    /// Forget the current user. Returns the name that was logged in, if any.
    pub fn logout(is_test: bool) -> AppResult<Option<String>> {
        let mut stored = Config::load()?;
        let previous = stored.current_user.take();

        if !is_test && previous.is_some() {
            stored.save()?;
        }
        Ok(previous)
    }
}
