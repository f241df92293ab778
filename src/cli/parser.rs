use crate::export::ExportFormat;
use clap::{ArgAction, Parser, Subcommand};

/// Command-line interface definition for rTimesheet
/// CLI application to log project hours in weekly timesheets with SQLite
#[derive(Parser)]
#[command(
    name = "rtimesheet",
    version = env!("CARGO_PKG_VERSION"),
    about = "A weekly timesheet CLI: log hours per sub-project, submit weeks and build reports using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Act as this user for one invocation (overrides `login`)
    #[arg(global = true, long = "user", value_name = "USERNAME")]
    pub user: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing backup without asking")]
        force: bool,
    },

    /// Remember USERNAME as the current user
    Login { username: String },

    /// Forget the current user
    Logout,

    /// Manage users (admin)
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Manage projects and assignments (admin)
    Project {
        #[command(subcommand)]
        action: ProjectCommand,
    },

    /// Manage sub-projects (admin)
    Sub {
        #[command(subcommand)]
        action: SubCommand,
    },

    /// Show the weekly timesheet grid
    Week {
        #[arg(long, value_name = "YYYY-MM-DD", help = "Any day of the week (default: today)")]
        date: Option<String>,
    },

    /// Set the hours of one sub-project on one day (0 clears the cell)
    Set {
        /// Sub-project id (see `week`)
        sub_id: i64,

        /// Day (YYYY-MM-DD)
        date: String,

        /// Hours between 0 and 24, e.g. 7.5
        #[arg(allow_hyphen_values = true)]
        hours: String,
    },

    /// Submit (lock) one sub-project for a week
    Submit {
        sub_id: i64,

        #[arg(long, value_name = "YYYY-MM-DD", help = "Any day of the week (default: today)")]
        week: Option<String>,
    },

    /// Copy last week's entries into this week
    CopyWeek {
        #[arg(long, value_name = "YYYY-MM-DD", help = "Any day of the target week (default: today)")]
        week: Option<String>,
    },

    /// Weekly report grouped by project, sub-project and user (admin)
    Report {
        #[arg(
            long,
            short,
            help = "Year, month, day or a range such as 2024-05:2024-06 (default: current month)"
        )]
        period: Option<String>,

        #[arg(long, value_name = "NAME", help = "Only rows of this user")]
        employee: Option<String>,

        #[arg(long, value_name = "CODE", help = "Only rows of this sub-project code")]
        code: Option<String>,

        #[arg(long, value_name = "NAME", help = "Only rows of this project")]
        project: Option<String>,

        #[arg(long, help = "List the values usable as filters in the period")]
        options: bool,

        #[arg(long, value_enum, requires = "file")]
        format: Option<ExportFormat>,

        #[arg(long, value_name = "FILE", requires = "format")]
        file: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Dashboard figures for a month (admin)
    Stats {
        #[arg(long, value_name = "YYYY-MM", help = "Month to summarize (default: current month)")]
        month: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a user (the first user is always an admin)
    Add {
        username: String,

        #[arg(long, help = "Full name shown in grids and reports")]
        name: Option<String>,

        #[arg(long, help = "admin | employee (default: employee)")]
        role: Option<String>,
    },

    /// List users
    List,

    /// Show a user and the projects assigned to them
    Show { username: String },

    /// Change the role of a user
    Role { username: String, role: String },

    /// Remove every project assignment of a user
    Deactivate { username: String },
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Create a project
    Add {
        name: String,

        #[arg(long)]
        code: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long = "assign", value_name = "USERNAME", num_args = 1..)]
        assign: Vec<String>,
    },

    /// List projects, newest first
    List,

    /// Show a project with its sub-projects and users
    Show { id: i64 },

    /// Change project fields (an empty string clears code/description)
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        code: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_name = "BOOL")]
        active: Option<bool>,
    },

    /// Delete a project (deactivated instead when it has entries)
    Delete { id: i64 },

    /// Assign a user to a project
    Assign { id: i64, username: String },

    /// Remove a user from a project
    Unassign { id: i64, username: String },
}

#[derive(Subcommand)]
pub enum SubCommand {
    /// Create a sub-project
    Add {
        project_id: i64,

        code: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// List the sub-projects of a project
    List { project_id: i64 },

    /// Activate or deactivate a sub-project
    Toggle {
        sub_id: i64,

        #[arg(long, value_name = "BOOL", action = ArgAction::Set, required = true)]
        active: bool,
    },
}
