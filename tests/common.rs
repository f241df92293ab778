#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Isolated HOME + database for one test.
pub struct TestEnv {
    pub home: PathBuf,
    pub db: String,
}

impl TestEnv {
    /// Fresh directory under the system temp dir, wiped if it exists.
    pub fn new(name: &str) -> Self {
        let mut home: PathBuf = env::temp_dir();
        home.push("rtimesheet_tests");
        home.push(name);
        fs::remove_dir_all(&home).ok();
        fs::create_dir_all(&home).expect("create test home");

        let db = home.join("test.sqlite").to_string_lossy().to_string();
        Self { home, db }
    }

    /// The binary with HOME pointing at the sandbox and `--db` set.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("rtimesheet");
        cmd.env("HOME", &self.home)
            .env("USERPROFILE", &self.home)
            .args(["--db", &self.db]);
        cmd
    }

    /// Like [`cmd`](Self::cmd), acting as `user`.
    pub fn as_user(&self, user: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.args(["--user", user]);
        cmd
    }

    pub fn init(&self) {
        self.cmd().args(["--test", "init"]).assert().success();
    }

    /// Admin `boss`, employee `alice` ("Alice Smith") assigned to project #1
    /// "Apollo" (code APO) with sub-projects #1 DEV "Development" and #2 OPS.
    pub fn seed(&self) {
        self.init();

        self.cmd()
            .args(["user", "add", "boss", "--name", "Big Boss"])
            .assert()
            .success();
        self.as_user("boss")
            .args(["user", "add", "alice", "--name", "Alice Smith"])
            .assert()
            .success();
        self.as_user("boss")
            .args(["project", "add", "Apollo", "--code", "APO", "--assign", "alice"])
            .assert()
            .success();
        self.as_user("boss")
            .args(["sub", "add", "1", "DEV", "--description", "Development"])
            .assert()
            .success();
        self.as_user("boss")
            .args(["sub", "add", "1", "OPS"])
            .assert()
            .success();
    }

    /// Absolute output path inside the sandbox, removed if present.
    pub fn out(&self, name: &str, ext: &str) -> String {
        let p = self.home.join(format!("{}.{}", name, ext));
        fs::remove_file(&p).ok();
        p.to_string_lossy().to_string()
    }
}
