use crate::cli::parser::SubCommand;
use crate::core::project::ProjectLogic;
use crate::core::session::Session;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::formatting::{or_blank, yes_no};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &SubCommand, pool: &DbPool, session: Option<&Session>) -> AppResult<()> {
    match cmd {
        SubCommand::Add {
            project_id,
            code,
            description,
        } => {
            let id = ProjectLogic::add_sub(pool, session, *project_id, code, description.as_deref())?;
            success(format!("Sub-project '{}' created with id {}", code.trim(), id));
        }

        SubCommand::List { project_id } => {
            let (project, subs) = ProjectLogic::list_subs(pool, session, *project_id)?;
            if subs.is_empty() {
                info(format!("Project '{}' has no sub-projects.", project.name));
                return Ok(());
            }

            println!("📁 {}\n", project.name);
            let mut table = Table::new(vec![
                Column::right("ID"),
                Column::left("Code"),
                Column::left("Description"),
                Column::left("Active"),
            ]);
            for s in &subs {
                table.add_row(vec![
                    s.id.to_string(),
                    s.code.clone(),
                    or_blank(&s.description).to_string(),
                    yes_no(s.is_active).to_string(),
                ]);
            }
            print!("{}", table.render());
        }

        SubCommand::Toggle { sub_id, active } => {
            let sub = ProjectLogic::toggle_sub(pool, session, *sub_id, *active)?;
            success(format!(
                "Sub-project '{}' is now {}",
                sub.code,
                if sub.is_active { "active" } else { "inactive" }
            ));
        }
    }

    Ok(())
}
