use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::path::Path;

mod common;
use common::TestEnv;

#[test]
fn test_init_creates_database() {
    let env = TestEnv::new("init_creates_db");

    env.cmd()
        .args(["--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(Path::new(&env.db).exists());
}

#[test]
fn test_commands_need_an_initialized_database() {
    let env = TestEnv::new("needs_init");

    env.as_user("boss")
        .args(["week"])
        .assert()
        .failure()
        .stderr(contains("run `rtimesheet init` first"));
}

#[test]
fn test_first_user_is_admin() {
    let env = TestEnv::new("first_user_admin");
    env.init();

    env.cmd()
        .args(["user", "add", "boss", "--role", "employee"])
        .assert()
        .success()
        .stdout(contains("First user: creating it as admin."))
        .stdout(contains("User 'boss' created (id 1, admin)"));

    env.cmd()
        .args(["user", "add", "alice"])
        .assert()
        .failure()
        .stderr(contains("No active session"));

    env.as_user("boss")
        .args(["user", "add", "alice", "--name", "Alice Smith"])
        .assert()
        .success()
        .stdout(contains("(id 2, employee)"));

    env.as_user("boss")
        .args(["user", "add", "alice"])
        .assert()
        .failure()
        .stderr(contains("Already exists: user 'alice'"));

    env.as_user("boss")
        .args(["user", "add", "bad name"])
        .assert()
        .failure()
        .stderr(contains("must not contain spaces"));

    env.as_user("boss")
        .args(["user", "add", "carol", "--role", "boss"])
        .assert()
        .failure()
        .stderr(contains("Invalid role"));
}

#[test]
fn test_user_management() {
    let env = TestEnv::new("user_management");
    env.seed();

    env.as_user("boss")
        .args(["user", "list"])
        .assert()
        .success()
        .stdout(contains("boss"))
        .stdout(contains("Alice Smith"))
        .stdout(contains("employee"));

    env.as_user("boss")
        .args(["user", "show", "alice"])
        .assert()
        .success()
        .stdout(contains("Alice Smith (alice)"))
        .stdout(contains("Apollo"));

    env.as_user("alice")
        .args(["user", "list"])
        .assert()
        .failure()
        .stderr(contains("Permission denied"));

    env.as_user("boss")
        .args(["user", "role", "boss", "employee"])
        .assert()
        .failure()
        .stderr(contains("cannot remove the admin role from yourself"));

    env.as_user("boss")
        .args(["user", "role", "alice", "admin"])
        .assert()
        .success()
        .stdout(contains("alice is now admin"));

    env.as_user("alice")
        .args(["user", "list"])
        .assert()
        .success();

    env.as_user("boss")
        .args(["user", "deactivate", "alice"])
        .assert()
        .success()
        .stdout(contains("1 project assignment(s) removed"));

    env.as_user("alice")
        .args(["week", "--date", "2024-06-03"])
        .assert()
        .success()
        .stdout(contains("No active projects assigned to you."));
}

#[test]
fn test_project_management() {
    let env = TestEnv::new("project_management");
    env.seed();

    env.as_user("boss")
        .args(["project", "add", "Zeus", "--description", "Internal tools"])
        .assert()
        .success()
        .stdout(contains("Project 'Zeus' created with id 2"));

    env.as_user("boss")
        .args(["project", "add", "  "])
        .assert()
        .failure()
        .stderr(contains("project name is required"));

    env.as_user("boss")
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(contains("Apollo"))
        .stdout(contains("Zeus"))
        .stdout(contains("Internal tools"));

    env.as_user("boss")
        .args(["project", "assign", "2", "alice"])
        .assert()
        .success()
        .stdout(contains("alice assigned to project #2"));

    env.as_user("boss")
        .args(["project", "assign", "2", "alice"])
        .assert()
        .success()
        .stdout(contains("already assigned"));

    env.as_user("boss")
        .args(["project", "edit", "2", "--name", "Zeus II", "--code", "ZEU"])
        .assert()
        .success()
        .stdout(contains("Project #2 updated (Zeus II)"));

    env.as_user("boss")
        .args(["project", "show", "2"])
        .assert()
        .success()
        .stdout(contains("Zeus II [ZEU]"))
        .stdout(contains("No sub-projects."))
        .stdout(contains("Alice Smith (alice)"));

    env.as_user("boss")
        .args(["project", "unassign", "2", "alice"])
        .assert()
        .success()
        .stdout(contains("alice removed from project #2"));

    env.as_user("boss")
        .args(["project", "show", "99"])
        .assert()
        .failure()
        .stderr(contains("Not found: project #99"));

    env.as_user("alice")
        .args(["project", "add", "Sneaky"])
        .assert()
        .failure()
        .stderr(contains("Permission denied"));
}

#[test]
fn test_project_delete_is_soft_when_entries_exist() {
    let env = TestEnv::new("project_delete");
    env.seed();

    env.as_user("boss")
        .args(["project", "add", "Empty"])
        .assert()
        .success();
    env.as_user("boss")
        .args(["project", "delete", "2"])
        .assert()
        .success()
        .stdout(contains("Project #2 deleted"));

    env.as_user("alice")
        .args(["set", "1", "2024-06-03", "4"])
        .assert()
        .success();
    env.as_user("boss")
        .args(["project", "delete", "1"])
        .assert()
        .success()
        .stdout(contains("deactivated instead of deleted"));

    env.as_user("boss")
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(contains("Apollo"))
        .stdout(contains("Empty").not());

    env.as_user("alice")
        .args(["set", "1", "2024-06-04", "4"])
        .assert()
        .failure()
        .stderr(contains("is not active"));
}

#[test]
fn test_sub_projects() {
    let env = TestEnv::new("sub_projects");
    env.seed();

    env.as_user("boss")
        .args(["sub", "list", "1"])
        .assert()
        .success()
        .stdout(contains("DEV"))
        .stdout(contains("Development"))
        .stdout(contains("OPS"));

    env.as_user("boss")
        .args(["sub", "add", "1", "DEV"])
        .assert()
        .failure()
        .stderr(contains("Already exists"));

    env.as_user("boss")
        .args(["sub", "add", "1", "dev"])
        .assert()
        .failure()
        .stderr(contains("Already exists: sub-project 'dev' in 'Apollo'"));

    env.as_user("boss")
        .args(["sub", "add", "1", "ÉTUDE"])
        .assert()
        .success();
    env.as_user("boss")
        .args(["sub", "add", "1", "étude"])
        .assert()
        .failure()
        .stderr(contains("Already exists"));

    env.as_user("boss")
        .args(["sub", "add", "7", "QA"])
        .assert()
        .failure()
        .stderr(contains("Not found: project #7"));

    env.as_user("boss")
        .args(["sub", "toggle", "2", "--active", "false"])
        .assert()
        .success()
        .stdout(contains("Sub-project 'OPS' is now inactive"));

    env.as_user("boss")
        .args(["sub", "toggle", "2", "--active", "true"])
        .assert()
        .success()
        .stdout(contains("is now active"));
}

#[test]
fn test_stats_dashboard() {
    let env = TestEnv::new("stats_dashboard");
    env.seed();

    env.as_user("alice")
        .args(["set", "1", "2024-06-03", "8"])
        .assert()
        .success();
    env.as_user("alice")
        .args(["set", "2", "2024-06-04", "1.5"])
        .assert()
        .success();
    env.as_user("alice")
        .args(["submit", "1", "--week", "2024-06-03"])
        .assert()
        .success();

    env.as_user("boss")
        .args(["stats", "--month", "2024-06"])
        .assert()
        .success()
        .stdout(contains("Dashboard June 2024"))
        .stdout(contains("Hours this month:"))
        .stdout(contains("9.5"))
        .stdout(contains("Apollo"));

    env.as_user("boss")
        .args(["stats", "--month", "2024"])
        .assert()
        .failure()
        .stderr(contains("expected YYYY-MM"));

    env.as_user("alice")
        .args(["stats"])
        .assert()
        .failure()
        .stderr(contains("Permission denied"));
}

#[test]
fn test_log_records_operations() {
    let env = TestEnv::new("log_records");
    env.seed();

    env.as_user("alice")
        .args(["set", "1", "2024-06-03", "8"])
        .assert()
        .success();

    env.cmd()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("assign"))
        .stdout(contains("alice logged 8h on 2024-06-03"));
}

#[test]
fn test_db_maintenance() {
    let env = TestEnv::new("db_maintenance");
    env.seed();

    env.cmd()
        .args(["db", "--info", "--check", "--vacuum", "--migrate"])
        .assert()
        .success()
        .stdout(contains("Users:"))
        .stdout(contains("Sub-projects:"))
        .stdout(contains("Integrity check passed"))
        .stdout(contains("Vacuum completed"))
        .stdout(contains("Migration completed"));
}

#[test]
fn test_backup() {
    let env = TestEnv::new("backup");
    env.seed();

    let plain = env.out("backup", "sqlite");
    env.cmd()
        .args(["backup", "--file", &plain])
        .assert()
        .success()
        .stdout(contains("Backup created"));
    assert!(Path::new(&plain).exists());

    env.cmd()
        .args(["backup", "--file", &plain, "--force"])
        .assert()
        .success();

    let zipped = env.out("backup_zip", "zip");
    env.cmd()
        .args(["backup", "--file", &zipped, "--compress"])
        .assert()
        .success()
        .stdout(contains("Compressed"));
    assert!(Path::new(&zipped).exists());
    assert!(!env.home.join("backup_zip.sqlite").exists());
}

#[test]
fn test_config_print() {
    let env = TestEnv::new("config_print");
    env.init();

    env.cmd()
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("database:"))
        .stdout(contains("daily_hours_warning"));
}
