//! rTimesheet library root.
//! Exposes CLI parser, high-level run() function, and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use core::session::Session;
use db::pool::DbPool;
use errors::{AppError, AppResult};
use ui::messages::warning;

/// Open the configured database and bring its schema up to date.
pub fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    if !std::path::Path::new(&cfg.database).exists() {
        return Err(AppError::NotFound(format!(
            "database {} (run `rtimesheet init` first)",
            cfg.database
        )));
    }

    let pool = DbPool::new(&cfg.database)?;
    db::initialize::init_db(&pool.conn)?;
    Ok(pool)
}

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    use cli::commands;

    // Commands that do not need a session
    match &cli.command {
        Commands::Init => return commands::init::handle(cli),
        Commands::Config { .. } => return commands::config::handle(&cli.command, cfg),
        Commands::Logout => return commands::login::handle_logout(cli),
        Commands::Db { .. } => {
            let pool = open_pool(cfg)?;
            return commands::db::handle(&cli.command, cfg, &pool);
        }
        _ => {}
    }

    let pool = open_pool(cfg)?;

    let session = Session::resolve(&pool.conn, cfg.current_user.as_deref())?;
    if session.is_none()
        && let Some(name) = &cfg.current_user
    {
        warning(format!("Unknown user '{}': continuing without a session.", name));
    }
    let session = session.as_ref();

    match &cli.command {
        Commands::Login { username } => commands::login::handle_login(cli, &pool, username),
        Commands::Log { .. } => commands::log::handle(&cli.command, &pool),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, cfg, &pool),
        Commands::User { action } => commands::user::handle(action, &pool, session),
        Commands::Project { action } => commands::project::handle(action, &pool, session),
        Commands::Sub { action } => commands::sub::handle(action, &pool, session),
        Commands::Week { .. } => commands::week::handle(&cli.command, cfg, &pool, session),
        Commands::Set { .. } | Commands::Submit { .. } | Commands::CopyWeek { .. } => {
            commands::set::handle(&cli.command, &pool, session)
        }
        Commands::Report { .. } => commands::report::handle(&cli.command, cfg, &pool, session),
        Commands::Stats { .. } => commands::stats::handle(&cli.command, cfg, &pool, session),
        Commands::Init | Commands::Config { .. } | Commands::Logout | Commands::Db { .. } => {
            Ok(())
        }
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load the config once
    let mut cfg = Config::load()?;

    // 3️⃣ command-line overrides
    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_db_path(custom_db)
            .to_string_lossy()
            .to_string();
    }
    if let Some(user) = &cli.user {
        cfg.current_user = Some(user.clone());
    }

    // 4️⃣ hand everything to the dispatcher
    dispatch(&cli, &cfg)
}
