use crate::cli::commands::date_or_today;
use crate::cli::parser::Commands;
use crate::core::session::Session;
use crate::core::timesheet::{SaveOutcome, TimesheetLogic};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::hours::Hours;
use crate::ui::messages::{info, success};
use crate::utils::date::require_date;

/// `set`, `submit` and `copy-week`: the write side of the timesheet.
pub fn handle(cmd: &Commands, pool: &DbPool, session: Option<&Session>) -> AppResult<()> {
    match cmd {
        Commands::Set {
            sub_id,
            date,
            hours,
        } => {
            let day = require_date(date)?;
            let hours = Hours::parse_entry(hours)?;

            match TimesheetLogic::save_entry(pool, session, *sub_id, day, hours)? {
                SaveOutcome::Saved => success(format!("{}h saved on {}", hours, day)),
                SaveOutcome::Deleted => success(format!("Entry on {} removed", day)),
                SaveOutcome::Unchanged => info(format!("No entry on {}: nothing to remove", day)),
            }
        }

        Commands::Submit { sub_id, week } => {
            let day = date_or_today(week)?;
            let monday = TimesheetLogic::submit_week(pool, session, *sub_id, day)?;
            success(format!("Week starting {} submitted", monday));
        }

        Commands::CopyWeek { week } => {
            let day = date_or_today(week)?;
            let copied = TimesheetLogic::copy_week(pool, session, day)?;
            if copied == 0 {
                info("Every cell of last week already exists in this week: nothing copied");
            } else {
                success(format!("{} entr{} copied from last week", copied, if copied == 1 { "y" } else { "ies" }));
            }
        }

        _ => {}
    }

    Ok(())
}
