use crate::cli::parser::Cli;
use crate::core::user::UserLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle_login(cli: &Cli, pool: &DbPool, username: &str) -> AppResult<()> {
    let profile = UserLogic::login(pool, username, cli.test)?;
    success(format!(
        "Logged in as {} ({}, {})",
        profile.username,
        profile.display_name(),
        profile.role
    ));
    Ok(())
}

pub fn handle_logout(cli: &Cli) -> AppResult<()> {
    match UserLogic::logout(cli.test)? {
        Some(name) => success(format!("Logged out {}", name)),
        None => info("No user was logged in."),
    }
    Ok(())
}
