use crate::cli::commands::date_or_today;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::Session;
use crate::core::timesheet::{TimesheetLogic, WeekGrid};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::hours::Hours;
use crate::ui::messages::info;
use crate::utils::colors::{RESET, color_for_status};
use crate::utils::formatting::{bold, colorize_cell, day_header};
use crate::utils::table::{Column, Table};
use rust_decimal::Decimal;

pub fn handle(
    cmd: &Commands,
    cfg: &Config,
    pool: &DbPool,
    session: Option<&Session>,
) -> AppResult<()> {
    if let Commands::Week { date } = cmd {
        let day = date_or_today(date)?;
        let grid = TimesheetLogic::week(pool, session, day)?;

        let who = session.map(|s| s.profile.display_name()).unwrap_or_default();
        println!(
            "📅 Week {} → {} ({})\n",
            grid.monday,
            grid.days[6],
            who
        );

        if grid.is_empty() {
            info("No active projects assigned to you.");
            return Ok(());
        }

        print!("{}", render(&grid, cfg));
    }

    Ok(())
}

fn render(grid: &WeekGrid, cfg: &Config) -> String {
    let limit = Hours::new(Decimal::from(cfg.daily_hours_warning));

    let mut columns = vec![Column::right("ID"), Column::left("Project / Sub-project")];
    columns.extend(grid.days.iter().map(|d| Column::right(&day_header(*d))));
    columns.push(Column::right("Total"));
    columns.push(Column::left("Status"));

    let mut table = Table::new(columns).with_separator(&cfg.separator_char);

    for block in &grid.projects {
        if block.rows.is_empty() {
            continue;
        }

        table.add_row(vec![String::new(), bold(&block.project.name)]);

        for row in &block.rows {
            let mut line = vec![
                row.sub_project.id.to_string(),
                format!("  {}", row.sub_project.label()),
            ];
            line.extend(row.hours.iter().map(|h| colorize_cell(&h.or_dash(), false)));
            line.push(row.total().to_string());
            line.push(format!(
                "{}{}{}",
                color_for_status(row.submitted),
                if row.submitted { "submitted" } else { "open" },
                RESET
            ));
            table.add_row(line);
        }

        let mut subtotal = vec![String::new(), format!("  {} total", block.project.name)];
        subtotal.extend(block.daily_totals().iter().map(|h| colorize_cell(&h.or_dash(), false)));
        subtotal.push(block.total().to_string());
        table.add_row(subtotal);
    }

    table.add_rule();

    let mut totals = vec![String::new(), bold("Daily total")];
    totals.extend(
        grid.daily_totals()
            .iter()
            .map(|h| colorize_cell(&h.or_dash(), *h > limit)),
    );
    totals.push(bold(&grid.total().to_string()));
    table.add_row(totals);

    table.render()
}
