use regex::Regex;
use std::sync::LazyLock;
use unicode_width::UnicodeWidthStr;

/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Submission status colour: green once locked, yellow while still open.
pub fn color_for_status(submitted: bool) -> &'static str {
    if submitted { GREEN } else { YELLOW }
}

/// Strip every colour code (used before measuring or exporting text).
pub fn strip_ansi(s: &str) -> String {
    static ANSI: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid ANSI regex"));
    ANSI.replace_all(s, "").into_owned()
}

/// Display width ignoring colour codes.
pub fn visible_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(s).as_str())
}
