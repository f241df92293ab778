use crate::cli::parser::ProjectCommand;
use crate::core::project::{DeleteOutcome, ProjectChanges, ProjectLogic};
use crate::core::session::Session;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::formatting::{or_blank, yes_no};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &ProjectCommand, pool: &DbPool, session: Option<&Session>) -> AppResult<()> {
    match cmd {
        ProjectCommand::Add {
            name,
            code,
            description,
            assign,
        } => {
            let id = ProjectLogic::add(
                pool,
                session,
                name,
                code.as_deref(),
                description.as_deref(),
                assign,
            )?;
            success(format!("Project '{}' created with id {}", name.trim(), id));
        }

        ProjectCommand::List => {
            let projects = ProjectLogic::list(pool, session)?;
            if projects.is_empty() {
                info("No projects yet.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::right("ID"),
                Column::left("Name"),
                Column::left("Code"),
                Column::left("Active"),
                Column::left("Description"),
            ]);
            for p in &projects {
                table.add_row(vec![
                    p.id.to_string(),
                    p.name.clone(),
                    or_blank(&p.code).to_string(),
                    yes_no(p.is_active).to_string(),
                    or_blank(&p.description).to_string(),
                ]);
            }
            print!("{}", table.render());
        }

        ProjectCommand::Show { id } => {
            let details = ProjectLogic::show(pool, session, *id)?;
            let p = &details.project;

            println!("📁 #{} {} [{}]", p.id, p.name, or_blank(&p.code));
            println!("   active: {}", yes_no(p.is_active));
            if let Some(d) = &p.description {
                println!("   {}", d);
            }
            println!();

            if details.sub_projects.is_empty() {
                info("No sub-projects.");
            } else {
                let mut table = Table::new(vec![
                    Column::right("Sub ID"),
                    Column::left("Code"),
                    Column::left("Description"),
                    Column::left("Active"),
                ]);
                for s in &details.sub_projects {
                    table.add_row(vec![
                        s.id.to_string(),
                        s.code.clone(),
                        or_blank(&s.description).to_string(),
                        yes_no(s.is_active).to_string(),
                    ]);
                }
                print!("{}", table.render());
            }
            println!();

            if details.users.is_empty() {
                info("No users assigned.");
            } else {
                println!("Assigned users:");
                for u in &details.users {
                    println!("  - {} ({})", u.display_name(), u.username);
                }
            }
        }

        ProjectCommand::Edit {
            id,
            name,
            code,
            description,
            active,
        } => {
            let changes = ProjectChanges {
                name: name.clone(),
                code: code.clone(),
                description: description.clone(),
                active: *active,
            };
            let p = ProjectLogic::edit(pool, session, *id, changes)?;
            success(format!("Project #{} updated ({})", p.id, p.name));
        }

        ProjectCommand::Delete { id } => match ProjectLogic::delete(pool, session, *id)? {
            DeleteOutcome::Deleted => success(format!("Project #{} deleted", id)),
            DeleteOutcome::Deactivated => warning(format!(
                "Project #{} has timesheet entries: it was deactivated instead of deleted",
                id
            )),
        },

        ProjectCommand::Assign { id, username } => {
            if ProjectLogic::assign(pool, session, *id, username)? {
                success(format!("{} assigned to project #{}", username, id));
            } else {
                info(format!("{} is already assigned to project #{}", username, id));
            }
        }

        ProjectCommand::Unassign { id, username } => {
            if ProjectLogic::unassign(pool, session, *id, username)? {
                success(format!("{} removed from project #{}", username, id));
            } else {
                info(format!("{} was not assigned to project #{}", username, id));
            }
        }
    }

    Ok(())
}
