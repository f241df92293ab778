//! The profile acting in the current invocation.

use crate::db::users;
use crate::errors::{AppError, AppResult};
use crate::models::profile::Profile;
use rusqlite::Connection;

#[derive(Debug, Clone)]
pub struct Session {
    pub profile: Profile,
}

impl Session {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }

    /// Resolve a username into a session. Unknown or missing names give `None`.
    pub fn resolve(conn: &Connection, username: Option<&str>) -> AppResult<Option<Session>> {
        let Some(name) = username.map(str::trim).filter(|n| !n.is_empty()) else {
            return Ok(None);
        };
        Ok(users::find_by_username(conn, name)?.map(Session::new))
    }

    pub fn user_id(&self) -> i64 {
        self.profile.id
    }

    pub fn is_admin(&self) -> bool {
        self.profile.role.is_admin()
    }

    /// Any logged-in profile.
    pub fn require(session: Option<&Session>) -> AppResult<&Session> {
        session.ok_or(AppError::Unauthenticated)
    }

    /// A logged-in admin profile.
    pub fn require_admin<'a>(session: Option<&'a Session>, action: &str) -> AppResult<&'a Session> {
        let s = Self::require(session)?;
        if s.is_admin() {
            Ok(s)
        } else {
            Err(AppError::Forbidden(format!(
                "'{}' requires the admin role ({} is {})",
                action, s.profile.username, s.profile.role
            )))
        }
    }
}
