use crate::core::report::UNKNOWN_PROJECT;
use crate::core::session::Session;
use crate::db::pool::DbPool;
use crate::db::{stats, users};
use crate::errors::AppResult;
use crate::models::hours::Hours;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Admin dashboard figures for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub project_count: i64,
    pub user_count: i64,
    pub total_hours: Hours,
    pub submissions: i64,
    /// Highest first.
    pub hours_by_project: Vec<(String, Hours)>,
}

pub struct StatsLogic;

impl StatsLogic {
    pub fn dashboard(
        pool: &DbPool,
        session: Option<&Session>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Dashboard> {
        Session::require_admin(session, "stats")?;

        let rows = stats::entries_with_project(&pool.conn, start, end)?;
        let total_hours: Hours = rows.iter().map(|(_, h)| *h).sum();

        let mut per_project: HashMap<String, Hours> = HashMap::new();
        for (name, hours) in rows {
            let name = name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_PROJECT.to_string());
            *per_project.entry(name).or_insert(Hours::ZERO) += hours;
        }

        let mut hours_by_project: Vec<(String, Hours)> = per_project.into_iter().collect();
        hours_by_project.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(Dashboard {
            start,
            end,
            project_count: stats::count_projects(&pool.conn)?,
            user_count: users::count_profiles(&pool.conn)?,
            total_hours,
            submissions: stats::count_submissions_between(&pool.conn, start, end)?,
            hours_by_project,
        })
    }
}
