//! Weekly timesheet of the session user: the grid, single cell edits,
//! week submission and copying the previous week.

use crate::core::session::Session;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::{date_param, entries, projects};
use crate::errors::{AppError, AppResult};
use crate::models::hours::Hours;
use crate::models::project::{Project, SubProject};
use crate::utils::date::{week_days, week_start};
use chrono::{Duration, NaiveDate};
use std::collections::{HashMap, HashSet};

/// One sub-project line of the grid.
#[derive(Debug, Clone)]
pub struct GridRow {
    pub sub_project: SubProject,
    /// Monday..Sunday
    pub hours: Vec<Hours>,
    pub submitted: bool,
}

impl GridRow {
    pub fn total(&self) -> Hours {
        self.hours.iter().sum()
    }
}

#[derive(Debug, Clone)]
pub struct ProjectBlock {
    pub project: Project,
    pub rows: Vec<GridRow>,
}

impl ProjectBlock {
    pub fn daily_totals(&self) -> Vec<Hours> {
        column_sums(self.rows.iter())
    }

    pub fn total(&self) -> Hours {
        self.rows.iter().map(GridRow::total).sum()
    }
}

#[derive(Debug, Clone)]
pub struct WeekGrid {
    pub monday: NaiveDate,
    pub days: Vec<NaiveDate>,
    pub projects: Vec<ProjectBlock>,
}

impl WeekGrid {
    pub fn daily_totals(&self) -> Vec<Hours> {
        column_sums(self.projects.iter().flat_map(|p| p.rows.iter()))
    }

    pub fn total(&self) -> Hours {
        self.projects.iter().map(ProjectBlock::total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.iter().all(|p| p.rows.is_empty())
    }
}

fn column_sums<'a>(rows: impl Iterator<Item = &'a GridRow>) -> Vec<Hours> {
    rows.fold(vec![Hours::ZERO; 7], |mut acc, row| {
        for (slot, h) in acc.iter_mut().zip(&row.hours) {
            *slot += *h;
        }
        acc
    })
}

/// Result of a single cell edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Deleted,
    Unchanged,
}

pub struct TimesheetLogic;

impl TimesheetLogic {
    /// Grid for the week containing `date`: active assigned projects and
    /// their active sub-projects.
    pub fn week(pool: &DbPool, session: Option<&Session>, date: NaiveDate) -> AppResult<WeekGrid> {
        let session = Session::require(session)?;
        let monday = week_start(date);
        let days = week_days(monday);
        let sunday = days[6];

        let assigned = projects::assigned_projects(&pool.conn, session.user_id(), true)?;
        let ids: Vec<i64> = assigned.iter().map(|p| p.id).collect();
        let subs = projects::active_sub_projects_for(&pool.conn, &ids)?;

        let cells: HashMap<(i64, NaiveDate), Hours> =
            entries::entries_for_user_between(&pool.conn, session.user_id(), monday, sunday)?
                .into_iter()
                .map(|e| ((e.sub_project_id, e.work_date), e.hours))
                .collect();

        let submitted: HashSet<i64> = entries::submissions_for_week(&pool.conn, session.user_id(), monday)?
            .into_iter()
            .map(|s| s.sub_project_id)
            .collect();

        let projects = assigned
            .into_iter()
            .map(|project| {
                let rows = subs
                    .iter()
                    .filter(|s| s.project_id == project.id)
                    .map(|s| GridRow {
                        sub_project: s.clone(),
                        hours: days
                            .iter()
                            .map(|d| cells.get(&(s.id, *d)).copied().unwrap_or(Hours::ZERO))
                            .collect(),
                        submitted: submitted.contains(&s.id),
                    })
                    .collect();
                ProjectBlock { project, rows }
            })
            .collect();

        Ok(WeekGrid {
            monday,
            days,
            projects,
        })
    }

    /// Write one cell. Zero hours remove it.
    pub fn save_entry(
        pool: &DbPool,
        session: Option<&Session>,
        sub_project_id: i64,
        date: NaiveDate,
        hours: Hours,
    ) -> AppResult<SaveOutcome> {
        let session = Session::require(session)?;
        let (project, sub) = Self::writable_sub_project(pool, session, sub_project_id)?;

        let monday = week_start(date);
        if entries::is_week_submitted(&pool.conn, session.user_id(), sub.id, monday)? {
            return Err(AppError::WeekLocked(date_param(monday)));
        }

        let target = format!("{}/{}", project.name, sub.code);

        if hours.is_zero() {
            let removed = entries::delete_entry(&pool.conn, session.user_id(), sub.id, date)?;
            if removed == 0 {
                return Ok(SaveOutcome::Unchanged);
            }
            audit(
                &pool.conn,
                "del",
                &target,
                &format!("{} removed entry on {}", session.profile.username, date),
            );
            return Ok(SaveOutcome::Deleted);
        }

        entries::upsert_entry(&pool.conn, session.user_id(), sub.id, date, hours)?;
        audit(
            &pool.conn,
            "set",
            &target,
            &format!("{} logged {}h on {}", session.profile.username, hours, date),
        );
        Ok(SaveOutcome::Saved)
    }

    /// Lock the week containing `date` for one sub-project.
    pub fn submit_week(
        pool: &DbPool,
        session: Option<&Session>,
        sub_project_id: i64,
        date: NaiveDate,
    ) -> AppResult<NaiveDate> {
        let session = Session::require(session)?;
        let (project, sub) = Self::writable_sub_project(pool, session, sub_project_id)?;
        let monday = week_start(date);

        entries::insert_submission(&pool.conn, session.user_id(), sub.id, monday)?;
        audit(
            &pool.conn,
            "submit",
            &format!("{}/{}", project.name, sub.code),
            &format!("{} submitted week {}", session.profile.username, monday),
        );
        Ok(monday)
    }

    /// Copy last week's entries into the week containing `date`.
    ///
    /// Existing cells and submitted rows of the target week are left alone.
    /// Returns the number of cells written.
    pub fn copy_week(pool: &DbPool, session: Option<&Session>, date: NaiveDate) -> AppResult<usize> {
        let session = Session::require(session)?;
        let monday = week_start(date);
        let prev_monday = monday - Duration::days(7);

        let previous = entries::entries_for_user_between(
            &pool.conn,
            session.user_id(),
            prev_monday,
            prev_monday + Duration::days(6),
        )?;
        if previous.is_empty() {
            return Err(AppError::NothingToCopy(date_param(prev_monday)));
        }

        let locked: HashSet<i64> = entries::submissions_for_week(&pool.conn, session.user_id(), monday)?
            .into_iter()
            .map(|s| s.sub_project_id)
            .collect();

        let tx = pool.conn.unchecked_transaction()?;
        let mut copied = 0;
        for e in previous.iter().filter(|e| !locked.contains(&e.sub_project_id)) {
            if entries::insert_entry_if_absent(
                &tx,
                session.user_id(),
                e.sub_project_id,
                e.work_date + Duration::days(7),
                e.hours,
            )? {
                copied += 1;
            }
        }
        tx.commit()?;

        audit(
            &pool.conn,
            "copy_week",
            &date_param(monday),
            &format!(
                "{} copied {} entries from week {}",
                session.profile.username, copied, prev_monday
            ),
        );
        Ok(copied)
    }

    /// The sub-project and its project, if the session user may book on it.
    fn writable_sub_project(
        pool: &DbPool,
        session: &Session,
        sub_project_id: i64,
    ) -> AppResult<(Project, SubProject)> {
        let sub = projects::require_sub_project(&pool.conn, sub_project_id)?;
        let project = projects::require_project(&pool.conn, sub.project_id)?;

        if !projects::is_assigned(&pool.conn, session.user_id(), project.id)? {
            return Err(AppError::NotAssigned(project.name));
        }
        if !sub.is_active || !project.is_active {
            return Err(AppError::InactiveSubProject(sub.code));
        }

        Ok((project, sub))
    }
}
