use crate::db::log::{LogRow, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::strip_ansi;
use ansi_term::Colour;

/// Widest operation/target column before truncation.
const OP_WIDTH: usize = 48;

fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" | "assign" => Colour::Green,
        "del" | "unassign" | "deactivate" => Colour::Red,
        "edit" => Colour::Yellow,
        "set" | "copy_week" => Colour::Cyan,
        "submit" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "backup" | "export" => Colour::RGB(102, 153, 255),
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// `operation (target)` with only the operation coloured, cut to `width`
/// visible characters.
fn op_target_cell(row: &LogRow, width: usize) -> String {
    let color = color_for_operation(&row.operation);

    let plain = if row.target.is_empty() {
        row.operation.clone()
    } else {
        format!("{} ({})", row.operation, row.target)
    };

    let visible = if plain.chars().count() > width {
        let mut s: String = plain.chars().take(width.saturating_sub(3)).collect();
        s.push_str("...");
        s
    } else {
        plain
    };

    match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

fn display_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%F %T").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let rows = load_log(&pool.conn)?;

        if rows.is_empty() {
            info("The internal log is empty.");
            return Ok(());
        }

        let id_w = rows.iter().map(|r| r.id.to_string().len()).max().unwrap_or(1);
        let dates: Vec<String> = rows.iter().map(|r| display_date(&r.date)).collect();
        let date_w = dates.iter().map(String::len).max().unwrap_or(10);

        let cells: Vec<String> = rows.iter().map(|r| op_target_cell(r, OP_WIDTH)).collect();
        let op_w = cells
            .iter()
            .map(|c| strip_ansi(c).chars().count())
            .max()
            .unwrap_or(10);

        println!("📜 Internal log:\n");

        for ((row, date), cell) in rows.iter().zip(&dates).zip(&cells) {
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(cell).chars().count()));
            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                row.id,
                date,
                cell,
                padding,
                row.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(op: &str, target: &str) -> LogRow {
        LogRow {
            id: 1,
            date: "2024-06-03T10:00:00+00:00".into(),
            operation: op.into(),
            target: target.into(),
            message: String::new(),
        }
    }

    #[test]
    fn long_targets_are_truncated_on_visible_text() {
        let cell = op_target_cell(&row("set", &"x".repeat(80)), 20);
        let plain = strip_ansi(&cell);
        assert_eq!(plain.chars().count(), 20);
        assert!(plain.starts_with("set ("));
        assert!(plain.ends_with("..."));
    }

    #[test]
    fn date_is_shown_without_offset() {
        assert_eq!(display_date("2024-06-03T10:00:00+00:00"), "2024-06-03 10:00:00");
        assert_eq!(display_date("garbage"), "garbage");
    }
}
