use crate::cli::parser::UserCommand;
use crate::core::session::Session;
use crate::core::user::UserLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::ui::messages::{info, success};
use crate::utils::formatting::{or_blank, yes_no};
use crate::utils::table::{Column, Table};

fn parse_role(raw: &str) -> AppResult<Role> {
    Role::from_code(raw).ok_or_else(|| AppError::InvalidRole(raw.to_string()))
}

pub fn handle(cmd: &UserCommand, pool: &DbPool, session: Option<&Session>) -> AppResult<()> {
    match cmd {
        UserCommand::Add {
            username,
            name,
            role,
        } => {
            let role = role.as_deref().map(parse_role).transpose()?;
            let profile = UserLogic::add(pool, session, username, name.as_deref(), role)?;
            success(format!(
                "User '{}' created (id {}, {})",
                profile.username, profile.id, profile.role
            ));
        }

        UserCommand::List => {
            let profiles = UserLogic::list(pool, session)?;
            if profiles.is_empty() {
                info("No users yet.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::right("ID"),
                Column::left("Username"),
                Column::left("Full name"),
                Column::left("Role"),
            ]);
            for p in &profiles {
                table.add_row(vec![
                    p.id.to_string(),
                    p.username.clone(),
                    or_blank(&p.full_name).to_string(),
                    p.role.to_string(),
                ]);
            }
            print!("{}", table.render());
        }

        UserCommand::Show { username } => {
            let (profile, projects) = UserLogic::show(pool, session, username)?;

            println!("👤 {} ({})", profile.display_name(), profile.username);
            println!("   id: {}  role: {}  created: {}", profile.id, profile.role, profile.created_at);
            println!();

            if projects.is_empty() {
                info("Not assigned to any project.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::right("ID"),
                Column::left("Project"),
                Column::left("Code"),
                Column::left("Active"),
            ]);
            for p in &projects {
                table.add_row(vec![
                    p.id.to_string(),
                    p.name.clone(),
                    or_blank(&p.code).to_string(),
                    yes_no(p.is_active).to_string(),
                ]);
            }
            print!("{}", table.render());
        }

        UserCommand::Role { username, role } => {
            let profile = UserLogic::set_role(pool, session, username, parse_role(role)?)?;
            success(format!("{} is now {}", profile.username, profile.role));
        }

        UserCommand::Deactivate { username } => {
            let removed = UserLogic::deactivate(pool, session, username)?;
            success(format!(
                "{} deactivated: {} project assignment(s) removed",
                username, removed
            ));
        }
    }

    Ok(())
}
