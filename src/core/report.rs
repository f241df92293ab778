//! Weekly report aggregation.
//!
//! Entries in a date range are grouped by (project name, sub-project code,
//! user name). Every group carries its total, a per-week breakdown keyed by
//! the Monday of each week and a submitted flag. [`aggregate`] is a pure
//! fold; [`ReportLogic`] does the fetching around it.

use crate::core::session::Session;
use crate::db::entries;
use crate::db::pool::DbPool;
use crate::models::hours::Hours;
use crate::ui::messages::warning;
use crate::utils::date::week_start;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

pub const UNKNOWN_PROJECT: &str = "Unknown project";
pub const UNKNOWN_SUB_PROJECT: &str = "?";
pub const UNKNOWN_USER: &str = "Unknown user";

/// One timesheet entry joined with its labels. Labels are `None` when the
/// referenced profile, sub-project or project no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub id: i64,
    pub work_date: NaiveDate,
    pub hours: Hours,
    pub user_id: i64,
    pub sub_project_id: i64,
    pub user_name: Option<String>,
    pub sub_project_code: Option<String>,
    pub sub_project_description: Option<String>,
    pub project_name: Option<String>,
    pub project_code: Option<String>,
}

impl ReportEntry {
    pub fn week_start(&self) -> NaiveDate {
        week_start(self.work_date)
    }

    pub fn project_label(&self) -> &str {
        label_or(&self.project_name, UNKNOWN_PROJECT)
    }

    pub fn sub_project_label(&self) -> &str {
        label_or(&self.sub_project_code, UNKNOWN_SUB_PROJECT)
    }

    pub fn user_label(&self) -> &str {
        label_or(&self.user_name, UNKNOWN_USER)
    }

    fn submission_key(&self) -> SubmissionKey {
        SubmissionKey {
            user_id: self.user_id,
            sub_project_id: self.sub_project_id,
            week_start: self.week_start(),
        }
    }
}

fn label_or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(fallback)
}

/// (user, sub-project, Monday) of a submitted week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionKey {
    pub user_id: i64,
    pub sub_project_id: i64,
    pub week_start: NaiveDate,
}

/// Exact-match filters; `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct ReportFilters {
    pub user_name: Option<String>,
    pub sub_project_code: Option<String>,
    pub project_name: Option<String>,
}

impl ReportFilters {
    pub fn matches(&self, row: &ReportRow) -> bool {
        fn ok(filter: &Option<String>, value: &str) -> bool {
            filter.as_deref().is_none_or(|f| f == value)
        }

        ok(&self.user_name, &row.user_name)
            && ok(&self.sub_project_code, &row.sub_project_code)
            && ok(&self.project_name, &row.project_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub project_name: String,
    pub project_code: Option<String>,
    pub sub_project_code: String,
    pub sub_project_description: Option<String>,
    pub user_name: String,
    pub total_hours: Hours,
    pub week_breakdown: BTreeMap<NaiveDate, Hours>,
    pub is_submitted: bool,
}

type GroupKey = (String, String, String);

impl ReportRow {
    fn empty(key: &GroupKey) -> Self {
        Self {
            project_name: key.0.clone(),
            project_code: None,
            sub_project_code: key.1.clone(),
            sub_project_description: None,
            user_name: key.2.clone(),
            total_hours: Hours::ZERO,
            week_breakdown: BTreeMap::new(),
            is_submitted: false,
        }
    }

    fn absorb(&mut self, entry: &ReportEntry, submitted: bool) {
        self.total_hours += entry.hours;
        *self
            .week_breakdown
            .entry(entry.week_start())
            .or_insert(Hours::ZERO) += entry.hours;
        self.is_submitted |= submitted;

        merge_label(&mut self.project_code, &entry.project_code);
        merge_label(&mut self.sub_project_description, &entry.sub_project_description);
    }

    /// Hours for one week bucket, zero when the group has none.
    pub fn hours_for_week(&self, monday: NaiveDate) -> Hours {
        self.week_breakdown.get(&monday).copied().unwrap_or(Hours::ZERO)
    }
}

/// Two entries of one group may disagree on a secondary label (e.g. two
/// projects sharing a name). Keep the smallest so scan order never matters.
fn merge_label(slot: &mut Option<String>, candidate: &Option<String>) {
    let Some(c) = candidate.as_ref().filter(|c| !c.trim().is_empty()) else {
        return;
    };
    match slot {
        Some(current) if current.as_str() <= c.as_str() => {}
        _ => *slot = Some(c.clone()),
    }
}

/// Group, sum, mark submitted, sort and filter.
pub fn aggregate(
    entries: &[ReportEntry],
    submissions: &HashSet<SubmissionKey>,
    filters: &ReportFilters,
) -> Vec<ReportRow> {
    let groups = entries.iter().fold(
        BTreeMap::<GroupKey, ReportRow>::new(),
        |mut groups, entry| {
            let key = (
                entry.project_label().to_string(),
                entry.sub_project_label().to_string(),
                entry.user_label().to_string(),
            );
            let submitted = submissions.contains(&entry.submission_key());

            groups
                .entry(key)
                .or_insert_with_key(ReportRow::empty)
                .absorb(entry, submitted);
            groups
        },
    );

    // BTreeMap iteration is already ordered by the group key
    groups
        .into_values()
        .filter(|row| filters.matches(row))
        .collect()
}

/// Distinct labels usable as filters, sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub users: Vec<String>,
    pub sub_project_codes: Vec<String>,
    pub projects: Vec<String>,
}

pub fn filter_options(entries: &[ReportEntry]) -> FilterOptions {
    fn collect<'a>(values: impl Iterator<Item = &'a Option<String>>) -> Vec<String> {
        values
            .filter_map(|v| v.as_deref())
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    FilterOptions {
        users: collect(entries.iter().map(|e| &e.user_name)),
        sub_project_codes: collect(entries.iter().map(|e| &e.sub_project_code)),
        projects: collect(entries.iter().map(|e| &e.project_name)),
    }
}

/// Inclusive date range plus filters.
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub filters: ReportFilters,
}

impl ReportQuery {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            filters: ReportFilters::default(),
        }
    }

    pub fn with_filters(mut self, filters: ReportFilters) -> Self {
        self.filters = filters;
        self
    }
}

pub struct ReportLogic;

impl ReportLogic {
    /// The weekly report for `query`.
    ///
    /// Without a session the result is empty. A failed entries fetch also
    /// gives an empty result; a failed submissions fetch leaves every row
    /// unsubmitted. Both print a warning.
    pub fn grouped_report(
        pool: &DbPool,
        session: Option<&Session>,
        query: &ReportQuery,
    ) -> Vec<ReportRow> {
        if session.is_none() || query.end < query.start {
            return Vec::new();
        }

        let Some(entries) = Self::fetch_entries(pool, query) else {
            return Vec::new();
        };

        // An entry at the start of the range may belong to a week that
        // began before it.
        let submissions =
            match entries::submission_keys_between(&pool.conn, week_start(query.start), query.end)
            {
                Ok(keys) => keys,
                Err(e) => {
                    warning(format!("Could not load submissions: {}", e));
                    HashSet::new()
                }
            };

        aggregate(&entries, &submissions, &query.filters)
    }

    /// Filter values available in the range of `query` (its filters are ignored).
    pub fn options(pool: &DbPool, session: Option<&Session>, query: &ReportQuery) -> FilterOptions {
        if session.is_none() || query.end < query.start {
            return FilterOptions::default();
        }

        Self::fetch_entries(pool, query)
            .map(|entries| filter_options(&entries))
            .unwrap_or_default()
    }

    fn fetch_entries(pool: &DbPool, query: &ReportQuery) -> Option<Vec<ReportEntry>> {
        match entries::report_entries(&pool.conn, query.start, query.end) {
            Ok(list) => Some(list),
            Err(e) => {
                warning(format!("Could not load timesheet entries: {}", e));
                None
            }
        }
    }
}
