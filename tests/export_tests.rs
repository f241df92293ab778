use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::TestEnv;

/// Seeded env with alice's hours in the first two weeks of June 2024,
/// the first week submitted on DEV.
fn with_hours(name: &str) -> TestEnv {
    let env = TestEnv::new(name);
    env.seed();

    for (sub, day, hours) in [
        ("1", "2024-06-03", "8"),
        ("1", "2024-06-04", "7.5"),
        ("2", "2024-06-05", "2"),
        ("1", "2024-06-11", "6.25"),
    ] {
        env.as_user("alice")
            .args(["set", sub, day, hours])
            .assert()
            .success();
    }

    env.as_user("alice")
        .args(["submit", "1", "--week", "2024-06-03"])
        .assert()
        .success();

    env
}

#[test]
fn test_report_table() {
    let env = with_hours("report_table");

    env.as_user("boss")
        .args(["report", "--period", "2024-06"])
        .assert()
        .success()
        .stdout(contains("Weekly report 2024-06-01"))
        .stdout(contains("Apollo [APO]"))
        .stdout(contains("DEV Development"))
        .stdout(contains("Alice Smith"))
        .stdout(contains("Wk 03.06"))
        .stdout(contains("Wk 10.06"))
        .stdout(contains("21.75"))
        .stdout(contains("23.75"))
        .stdout(contains("submitted"))
        .stdout(contains("Grand total"));
}

#[test]
fn test_report_filters() {
    let env = with_hours("report_filters");

    env.as_user("boss")
        .args(["report", "--period", "2024-06", "--code", "OPS"])
        .assert()
        .success()
        .stdout(contains("OPS"))
        .stdout(contains("Development").not());

    env.as_user("boss")
        .args(["report", "--period", "2024-06", "--employee", "Alice Smith"])
        .assert()
        .success()
        .stdout(contains("Alice Smith"));

    env.as_user("boss")
        .args(["report", "--period", "2024-06", "--project", "Nonexistent"])
        .assert()
        .success()
        .stdout(contains("No timesheet entries for the selected period."));

    env.as_user("boss")
        .args(["report", "--period", "2024-06", "--options"])
        .assert()
        .success()
        .stdout(contains("Users (--employee)"))
        .stdout(contains("Alice Smith"))
        .stdout(contains("DEV"))
        .stdout(contains("OPS"))
        .stdout(contains("Apollo"));
}

#[test]
fn test_report_requires_admin() {
    let env = with_hours("report_requires_admin");

    env.as_user("alice")
        .args(["report", "--period", "2024-06"])
        .assert()
        .failure()
        .stderr(contains("Permission denied"));

    // without any session the report is empty rather than an error
    env.cmd()
        .args(["report", "--period", "2024-06"])
        .assert()
        .success()
        .stdout(contains("No timesheet entries for the selected period."));

    env.as_user("boss")
        .args(["report", "--period", "2024-06-30:2024-06-01"])
        .assert()
        .success()
        .stdout(contains("No timesheet entries"));
}

#[test]
fn test_export_csv() {
    let env = with_hours("export_csv");
    let out = env.out("report", "csv");

    env.as_user("boss")
        .args(["report", "--period", "2024-06", "--format", "csv", "--file", &out])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("read exported csv");
    let header = content.lines().next().expect("csv header");
    assert!(header.starts_with("project,project_code,sub_project"));
    assert!(header.contains("2024-05-27"));
    assert!(header.contains("2024-06-03"));
    assert!(header.ends_with("total,submitted"));
    assert!(content.contains("Apollo,APO,DEV,Development,Alice Smith"));

    // totals line: label, blank label columns, week sums, grand total
    let last = content.lines().last().expect("csv totals line");
    assert!(last.starts_with("TOTAL,,,,,"));
    assert!(last.contains(",17.5,"));
    assert!(last.ends_with(",23.75,"));
    assert_eq!(content.lines().count(), 4);
}

#[test]
fn test_export_json() {
    let env = with_hours("export_json");
    let out = env.out("report", "json");

    env.as_user("boss")
        .args(["report", "--period", "2024-06", "--format", "json", "--file", &out])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read exported json");
    let rows: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let rows = rows.as_array().expect("json array");
    assert_eq!(rows.len(), 2);

    let dev = &rows[0];
    assert_eq!(dev["projectName"], "Apollo");
    assert_eq!(dev["subProjectCode"], "DEV");
    assert_eq!(dev["userName"], "Alice Smith");
    assert_eq!(dev["isSubmitted"], true);
    assert_eq!(dev["totalHours"], 21.75);
    assert_eq!(dev["weekBreakdown"]["2024-06-03"], 15.5);
    assert_eq!(dev["weekBreakdown"]["2024-06-10"], 6.25);

    assert_eq!(rows[1]["subProjectCode"], "OPS");
    assert_eq!(rows[1]["isSubmitted"], false);
}

#[test]
fn test_export_xlsx_and_pdf() {
    let env = with_hours("export_xlsx_pdf");

    let xlsx = env.out("report", "xlsx");
    env.as_user("boss")
        .args(["report", "--period", "2024-06", "--format", "xlsx", "--file", &xlsx])
        .assert()
        .success()
        .stdout(contains("XLSX export completed"));
    let bytes = fs::read(&xlsx).expect("read xlsx");
    assert!(bytes.starts_with(b"PK"));

    let pdf = env.out("report", "pdf");
    env.as_user("boss")
        .args(["report", "--period", "2024-06", "--format", "pdf", "--file", &pdf])
        .assert()
        .success()
        .stdout(contains("PDF export completed"));
    let bytes = fs::read(&pdf).expect("read pdf");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_export_needs_absolute_path_and_force() {
    let env = with_hours("export_paths");

    env.as_user("boss")
        .args(["report", "--period", "2024-06", "--format", "csv", "--file", "relative.csv"])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));

    let out = env.out("again", "csv");
    env.as_user("boss")
        .args(["report", "--period", "2024-06", "--format", "csv", "--file", &out])
        .assert()
        .success();

    // existing file, answer "n" at the prompt
    env.as_user("boss")
        .args(["report", "--period", "2024-06", "--format", "csv", "--file", &out])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(contains("was not overwritten"));

    env.as_user("boss")
        .args(["report", "--period", "2024-06", "--format", "csv", "--file", &out, "--force"])
        .assert()
        .success();

    env.as_user("boss")
        .args(["report", "--period", "2024-06", "--format", "csv"])
        .assert()
        .failure();
}
