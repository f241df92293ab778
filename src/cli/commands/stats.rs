use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::Session;
use crate::core::stats::StatsLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::header;
use crate::utils::colors::{CYAN, GREEN, RESET};
use crate::utils::date::{current_month, month_name, parse_period};
use crate::utils::table::{Column, Table};
use chrono::Datelike;

pub fn handle(
    cmd: &Commands,
    cfg: &Config,
    pool: &DbPool,
    session: Option<&Session>,
) -> AppResult<()> {
    if let Commands::Stats { month } = cmd {
        let (start, end) = match month {
            Some(m) if m.trim().len() == 7 => parse_period(m)?,
            Some(m) => return Err(AppError::InvalidDate(format!("{} (expected YYYY-MM)", m))),
            None => current_month(),
        };

        let dash = StatsLogic::dashboard(pool, session, start, end)?;

        header(format!("Dashboard {} {}", month_name(start.month()), start.year()));

        println!("{}• Projects:{} {}{}{}", CYAN, RESET, GREEN, dash.project_count, RESET);
        println!("{}• Users:{} {}{}{}", CYAN, RESET, GREEN, dash.user_count, RESET);
        println!("{}• Hours this month:{} {}{}{}", CYAN, RESET, GREEN, dash.total_hours, RESET);
        println!("{}• Submitted weeks:{} {}{}{}", CYAN, RESET, GREEN, dash.submissions, RESET);
        println!();

        if !dash.hours_by_project.is_empty() {
            let mut table = Table::new(vec![Column::left("Project"), Column::right("Hours")])
                .with_separator(&cfg.separator_char);
            for (name, hours) in &dash.hours_by_project {
                table.add_row(vec![name.clone(), hours.to_string()]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
