use chrono::NaiveDate;
use rtimesheet::core::report::{
    FilterOptions, ReportEntry, ReportFilters, ReportLogic, ReportQuery, SubmissionKey, UNKNOWN_SUB_PROJECT,
    UNKNOWN_USER, aggregate,
};
use rtimesheet::core::session::Session;
use rtimesheet::db::pool::DbPool;
use rtimesheet::db::{entries, projects, users};
use rtimesheet::models::hours::Hours;
use rtimesheet::models::role::Role;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashSet};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn h(v: rust_decimal::Decimal) -> Hours {
    Hours::new(v)
}

/// Alice on Apollo/DEV unless changed by the caller.
fn entry(id: i64, date: &str, hours: Hours) -> ReportEntry {
    ReportEntry {
        id,
        work_date: d(date),
        hours,
        user_id: 1,
        sub_project_id: 10,
        user_name: Some("Alice".into()),
        sub_project_code: Some("DEV".into()),
        sub_project_description: Some("Development".into()),
        project_name: Some("Apollo".into()),
        project_code: Some("APO".into()),
    }
}

fn on(mut e: ReportEntry, user: (i64, &str), sub: (i64, &str), project: &str) -> ReportEntry {
    e.user_id = user.0;
    e.user_name = Some(user.1.into());
    e.sub_project_id = sub.0;
    e.sub_project_code = Some(sub.1.into());
    e.project_name = Some(project.into());
    e
}

fn no_filters() -> ReportFilters {
    ReportFilters::default()
}

/// A mixed data set: three users, two projects, several weeks.
fn sample() -> Vec<ReportEntry> {
    vec![
        entry(1, "2024-06-03", h(dec!(4))),
        entry(2, "2024-06-04", h(dec!(3.25))),
        entry(3, "2024-06-11", h(dec!(0.1))),
        on(entry(4, "2024-06-05", h(dec!(8))), (2, "Bob"), (10, "DEV"), "Apollo"),
        on(entry(5, "2024-06-16", h(dec!(2.2))), (2, "Bob"), (11, "OPS"), "Apollo"),
        on(entry(6, "2024-06-07", h(dec!(6))), (3, "Carol"), (20, "QA"), "Zeus"),
        on(entry(7, "2024-06-09", h(dec!(0.7))), (1, "Alice"), (20, "QA"), "Zeus"),
        entry(8, "2024-06-12", h(dec!(0.2))),
    ]
}

// ---------------------------
// Scenarios
// ---------------------------

#[test]
fn scenario_1_single_week() {
    let entries = vec![
        entry(1, "2024-06-03", h(dec!(4))),
        entry(2, "2024-06-04", h(dec!(3))),
    ];

    let rows = aggregate(&entries, &HashSet::new(), &no_filters());

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_hours, h(dec!(7)));
    assert_eq!(
        rows[0].week_breakdown,
        BTreeMap::from([(d("2024-06-03"), h(dec!(7)))])
    );
}

#[test]
fn scenario_2_two_weeks() {
    let entries = vec![
        entry(1, "2024-06-07", h(dec!(4))),
        entry(2, "2024-06-10", h(dec!(3))),
    ];

    let rows = aggregate(&entries, &HashSet::new(), &no_filters());

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_hours, h(dec!(7)));
    assert_eq!(
        rows[0].week_breakdown,
        BTreeMap::from([(d("2024-06-03"), h(dec!(4))), (d("2024-06-10"), h(dec!(3)))])
    );
}

#[test]
fn scenario_3_no_submissions() {
    let rows = aggregate(&sample(), &HashSet::new(), &no_filters());
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| !r.is_submitted));
}

#[test]
fn scenario_4_matching_submission() {
    let entries = vec![
        entry(1, "2024-06-03", h(dec!(4))),
        entry(2, "2024-06-04", h(dec!(3))),
    ];
    let submissions = HashSet::from([SubmissionKey {
        user_id: 1,
        sub_project_id: 10,
        week_start: d("2024-06-03"),
    }]);

    let rows = aggregate(&entries, &submissions, &no_filters());
    assert!(rows[0].is_submitted);
}

#[test]
fn scenario_5_unknown_project_filter() {
    let filters = ReportFilters {
        project_name: Some("Nonexistent".into()),
        ..Default::default()
    };
    assert!(aggregate(&sample(), &HashSet::new(), &filters).is_empty());
}

#[test]
fn scenario_6_unauthenticated_caller() {
    let pool = seeded_pool();
    let query = ReportQuery::new(d("2024-06-01"), d("2024-06-30"));

    assert!(ReportLogic::grouped_report(&pool, None, &query).is_empty());
}

// ---------------------------
// Properties
// ---------------------------

#[test]
fn totals_match_entries_and_breakdown() {
    let data = sample();
    let rows = aggregate(&data, &HashSet::new(), &no_filters());

    for row in &rows {
        let from_entries: Hours = data
            .iter()
            .filter(|e| {
                e.project_label() == row.project_name
                    && e.sub_project_label() == row.sub_project_code
                    && e.user_label() == row.user_name
            })
            .map(|e| e.hours)
            .sum();
        let from_weeks: Hours = row.week_breakdown.values().sum();

        assert_eq!(row.total_hours, from_entries);
        assert_eq!(row.total_hours, from_weeks);
    }

    let grand: Hours = rows.iter().map(|r| r.total_hours).sum();
    let all: Hours = data.iter().map(|e| e.hours).sum();
    assert_eq!(grand, all);
}

#[test]
fn breakdown_keys_are_mondays() {
    use chrono::{Datelike, Weekday};

    let rows = aggregate(&sample(), &HashSet::new(), &no_filters());
    for row in rows {
        for monday in row.week_breakdown.keys() {
            assert_eq!(monday.weekday(), Weekday::Mon);
        }
    }
}

#[test]
fn sunday_belongs_to_the_previous_monday() {
    let rows = aggregate(
        &[entry(1, "2024-06-09", h(dec!(1)))],
        &HashSet::new(),
        &no_filters(),
    );
    assert!(rows[0].week_breakdown.contains_key(&d("2024-06-03")));
}

#[test]
fn aggregation_is_idempotent() {
    let data = sample();
    let first = aggregate(&data, &HashSet::new(), &no_filters());
    let second = aggregate(&data, &HashSet::new(), &no_filters());
    assert_eq!(first, second);
}

#[test]
fn input_order_does_not_matter() {
    let data = sample();
    let baseline = aggregate(&data, &HashSet::new(), &no_filters());

    let mut reversed = data.clone();
    reversed.reverse();
    assert_eq!(aggregate(&reversed, &HashSet::new(), &no_filters()), baseline);

    // every rotation of the input
    for k in 1..data.len() {
        let mut rotated = data.clone();
        rotated.rotate_left(k);
        assert_eq!(aggregate(&rotated, &HashSet::new(), &no_filters()), baseline);
    }
}

#[test]
fn rows_are_sorted_by_project_sub_project_user() {
    let rows = aggregate(&sample(), &HashSet::new(), &no_filters());
    let keys: Vec<(String, String, String)> = rows
        .iter()
        .map(|r| {
            (
                r.project_name.clone(),
                r.sub_project_code.clone(),
                r.user_name.clone(),
            )
        })
        .collect();

    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(keys[0], ("Apollo".into(), "DEV".into(), "Alice".into()));
    assert_eq!(keys.last().unwrap().0, "Zeus");
}

#[test]
fn user_filter_keeps_exactly_that_user() {
    let all = aggregate(&sample(), &HashSet::new(), &no_filters());
    let filters = ReportFilters {
        user_name: Some("Bob".into()),
        ..Default::default()
    };
    let rows = aggregate(&sample(), &HashSet::new(), &filters);

    let expected: Vec<_> = all.into_iter().filter(|r| r.user_name == "Bob").collect();
    assert_eq!(rows, expected);
    assert_eq!(rows.len(), 2);
}

#[test]
fn filters_combine() {
    let filters = ReportFilters {
        user_name: Some("Alice".into()),
        sub_project_code: Some("QA".into()),
        project_name: Some("Zeus".into()),
    };
    let rows = aggregate(&sample(), &HashSet::new(), &filters);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_hours, h(dec!(0.7)));
}

#[test]
fn one_submitted_week_marks_the_group() {
    let submissions = HashSet::from([SubmissionKey {
        user_id: 1,
        sub_project_id: 10,
        week_start: d("2024-06-10"),
    }]);
    let rows = aggregate(&sample(), &submissions, &no_filters());

    let alice_dev = rows
        .iter()
        .find(|r| r.user_name == "Alice" && r.sub_project_code == "DEV")
        .unwrap();
    assert!(alice_dev.is_submitted);

    // same week, other user / other sub-project stay open
    assert!(
        rows.iter()
            .filter(|r| !(r.user_name == "Alice" && r.sub_project_code == "DEV"))
            .all(|r| !r.is_submitted)
    );
}

#[test]
fn submission_for_an_untouched_week_is_ignored() {
    let submissions = HashSet::from([SubmissionKey {
        user_id: 1,
        sub_project_id: 10,
        week_start: d("2024-06-24"),
    }]);
    let rows = aggregate(&sample(), &submissions, &no_filters());
    assert!(rows.iter().all(|r| !r.is_submitted));
}

#[test]
fn empty_input_gives_empty_output() {
    assert!(aggregate(&[], &HashSet::new(), &no_filters()).is_empty());
}

#[test]
fn decimal_hours_sum_exactly() {
    let rows = aggregate(&sample(), &HashSet::new(), &no_filters());
    let alice_dev = &rows[0];
    // 4 + 3.25 + 0.1 + 0.2
    assert_eq!(alice_dev.total_hours, h(dec!(7.55)));
    assert_eq!(alice_dev.total_hours.to_string(), "7.55");
}

#[test]
fn rows_serialize_with_camel_case_and_iso_weeks() {
    let rows = aggregate(
        &[entry(1, "2024-06-04", h(dec!(7.5)))],
        &HashSet::new(),
        &no_filters(),
    );
    let json = serde_json::to_value(&rows).unwrap();

    assert_eq!(json[0]["projectName"], "Apollo");
    assert_eq!(json[0]["subProjectCode"], "DEV");
    assert_eq!(json[0]["isSubmitted"], false);
    assert_eq!(json[0]["totalHours"], 7.5);
    assert_eq!(json[0]["weekBreakdown"]["2024-06-03"], 7.5);
}

// ---------------------------
// Against the database
// ---------------------------

/// boss (admin, id 1), alice (employee, id 2), Apollo/DEV (sub id 1).
fn seeded_pool() -> DbPool {
    let pool = DbPool::in_memory().unwrap();
    let conn = &pool.conn;

    users::insert_profile(conn, "boss", Some("Big Boss"), Role::Admin).unwrap();
    let alice = users::insert_profile(conn, "alice", Some("Alice Smith"), Role::Employee).unwrap();
    let project = projects::insert_project(conn, "Apollo", Some("APO"), None).unwrap();
    let sub = projects::insert_sub_project(conn, project, "DEV", Some("Development")).unwrap();
    projects::assign(conn, alice, project).unwrap();

    entries::upsert_entry(conn, alice, sub, d("2024-06-03"), h(dec!(4))).unwrap();
    entries::upsert_entry(conn, alice, sub, d("2024-06-04"), h(dec!(3))).unwrap();
    entries::insert_submission(conn, alice, sub, d("2024-06-03")).unwrap();
    pool
}

fn admin(pool: &DbPool) -> Session {
    Session::resolve(&pool.conn, Some("boss")).unwrap().unwrap()
}

#[test]
fn grouped_report_reads_the_store() {
    let pool = seeded_pool();
    let session = admin(&pool);
    let query = ReportQuery::new(d("2024-06-01"), d("2024-06-30"));

    let rows = ReportLogic::grouped_report(&pool, Some(&session), &query);

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.project_name, "Apollo");
    assert_eq!(row.project_code.as_deref(), Some("APO"));
    assert_eq!(row.sub_project_code, "DEV");
    assert_eq!(row.sub_project_description.as_deref(), Some("Development"));
    assert_eq!(row.user_name, "Alice Smith");
    assert_eq!(row.total_hours, h(dec!(7)));
    assert!(row.is_submitted);
}

#[test]
fn submission_before_range_start_still_counts() {
    let pool = seeded_pool();
    let session = admin(&pool);
    // the range starts on a Tuesday; the submitted week began the day before
    let query = ReportQuery::new(d("2024-06-04"), d("2024-06-30"));

    let rows = ReportLogic::grouped_report(&pool, Some(&session), &query);
    assert_eq!(rows[0].total_hours, h(dec!(3)));
    assert!(rows[0].is_submitted);
}

#[test]
fn reversed_range_is_empty() {
    let pool = seeded_pool();
    let session = admin(&pool);
    let query = ReportQuery::new(d("2024-06-30"), d("2024-06-01"));

    assert!(ReportLogic::grouped_report(&pool, Some(&session), &query).is_empty());
}

#[test]
fn orphaned_entries_keep_their_hours() {
    let pool = seeded_pool();
    let session = admin(&pool);

    // user 99 and sub-project 77 do not exist
    entries::upsert_entry(&pool.conn, 99, 77, d("2024-06-05"), h(dec!(1.5))).unwrap();

    let query = ReportQuery::new(d("2024-06-01"), d("2024-06-30"));
    let rows = ReportLogic::grouped_report(&pool, Some(&session), &query);

    let orphan = rows
        .iter()
        .find(|r| r.user_name == UNKNOWN_USER)
        .expect("orphan row");
    assert_eq!(orphan.sub_project_code, UNKNOWN_SUB_PROJECT);
    assert_eq!(orphan.total_hours, h(dec!(1.5)));

    let total: Hours = rows.iter().map(|r| r.total_hours).sum();
    assert_eq!(total, h(dec!(8.5)));
}

#[test]
fn options_list_labels_in_range() {
    let pool = seeded_pool();
    let session = admin(&pool);
    let query = ReportQuery::new(d("2024-06-01"), d("2024-06-30"));

    let opts = ReportLogic::options(&pool, Some(&session), &query);
    assert_eq!(opts.users, vec!["Alice Smith"]);
    assert_eq!(opts.sub_project_codes, vec!["DEV"]);
    assert_eq!(opts.projects, vec!["Apollo"]);

    assert_eq!(
        ReportLogic::options(&pool, None, &query),
        FilterOptions::default()
    );
}
