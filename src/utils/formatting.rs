//! Formatting utilities used for CLI and export outputs.

use crate::utils::colors::{GREY, RED, RESET};

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Grey for empty cells (`-`), red when `over` is set.
pub fn colorize_cell(value: &str, over: bool) -> String {
    if value.trim() == "-" {
        format!("{GREY}{value}{RESET}")
    } else if over {
        format!("{RED}{value}{RESET}")
    } else {
        value.to_string()
    }
}

/// `Mon 03.06` style header for a grid column.
pub fn day_header(date: chrono::NaiveDate) -> String {
    date.format("%a %d.%m").to_string()
}

/// Text for an optional DB column.
pub fn or_blank(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
