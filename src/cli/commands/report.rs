use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::{ReportFilters, ReportLogic, ReportQuery, ReportRow};
use crate::core::session::Session;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::ExportLogic;
use crate::models::hours::Hours;
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_status};
use crate::utils::date::{current_month, parse_period, weeks_in_range};
use crate::utils::formatting::bold;
use crate::utils::table::{Column, Table};
use chrono::NaiveDate;

pub fn handle(
    cmd: &Commands,
    cfg: &Config,
    pool: &DbPool,
    session: Option<&Session>,
) -> AppResult<()> {
    let Commands::Report {
        period,
        employee,
        code,
        project,
        options,
        format,
        file,
        force,
    } = cmd
    else {
        return Ok(());
    };

    // No session: the report is simply empty. A non-admin session is refused.
    if session.is_some() {
        Session::require_admin(session, "report")?;
    }

    let (start, end) = match period {
        Some(p) => parse_period(p)?,
        None => current_month(),
    };

    let filters = ReportFilters {
        user_name: employee.clone(),
        sub_project_code: code.clone(),
        project_name: project.clone(),
    };
    let query = ReportQuery::new(start, end).with_filters(filters);

    if *options {
        print_options(pool, session, &query);
        return Ok(());
    }

    let rows = ReportLogic::grouped_report(pool, session, &query);

    if let (Some(format), Some(file)) = (format, file) {
        ExportLogic::export_report(&rows, start, end, *format, file, *force)?;
        audit(
            &pool.conn,
            "export",
            file,
            &format!("Report {}..{} exported as {}", start, end, format.as_str()),
        );
        return Ok(());
    }

    header(format!("Weekly report {} → {}", start, end));

    if rows.is_empty() {
        info("No timesheet entries for the selected period.");
        return Ok(());
    }

    print!("{}", render(&rows, start, end, cfg));
    Ok(())
}

fn print_options(pool: &DbPool, session: Option<&Session>, query: &ReportQuery) {
    let opts = ReportLogic::options(pool, session, query);

    let section = |title: &str, values: &[String]| {
        println!("{}", bold(title));
        if values.is_empty() {
            println!("  -");
        }
        for v in values {
            println!("  {}", v);
        }
    };

    section("Users (--employee)", &opts.users);
    section("Sub-project codes (--code)", &opts.sub_project_codes);
    section("Projects (--project)", &opts.projects);
}

fn sum_week(rows: &[&ReportRow], monday: NaiveDate) -> Hours {
    rows.iter().map(|r| r.hours_for_week(monday)).sum()
}

/// Rows grouped by project, then sub-project, one column per week.
fn render(rows: &[ReportRow], start: NaiveDate, end: NaiveDate, cfg: &Config) -> String {
    let weeks = weeks_in_range(start, end);

    let mut columns = vec![Column::left("Project / Sub-project / User")];
    columns.extend(
        weeks
            .iter()
            .map(|w| Column::right(&format!("Wk {}", w.format("%d.%m")))),
    );
    columns.push(Column::right("Total"));
    columns.push(Column::left("Status"));

    let mut table = Table::new(columns).with_separator(&cfg.separator_char);

    let mut i = 0;
    while i < rows.len() {
        // rows are sorted, so one project is a contiguous run
        let project_rows: Vec<&ReportRow> = rows[i..]
            .iter()
            .take_while(|r| r.project_name == rows[i].project_name)
            .collect();
        i += project_rows.len();

        let first = project_rows[0];
        let title = match &first.project_code {
            Some(code) => format!("{} [{}]", first.project_name, code),
            None => first.project_name.clone(),
        };
        table.add_row(vec![bold(&title)]);

        let mut j = 0;
        while j < project_rows.len() {
            let sub_rows: Vec<&ReportRow> = project_rows[j..]
                .iter()
                .take_while(|r| r.sub_project_code == project_rows[j].sub_project_code)
                .copied()
                .collect();
            j += sub_rows.len();

            let sub = sub_rows[0];
            let label = match &sub.sub_project_description {
                Some(d) => format!("  {} {}", sub.sub_project_code, d),
                None => format!("  {}", sub.sub_project_code),
            };
            table.add_row(vec![label]);

            for r in &sub_rows {
                let mut line = vec![format!("    {}", r.user_name)];
                line.extend(weeks.iter().map(|w| r.hours_for_week(*w).or_dash()));
                line.push(r.total_hours.to_string());
                line.push(format!(
                    "{}{}{}",
                    color_for_status(r.is_submitted),
                    if r.is_submitted { "submitted" } else { "open" },
                    RESET
                ));
                table.add_row(line);
            }
        }

        let mut subtotal = vec![format!("  {} total", first.project_name)];
        subtotal.extend(weeks.iter().map(|w| sum_week(&project_rows, *w).or_dash()));
        let project_total: Hours = project_rows.iter().map(|r| r.total_hours).sum();
        subtotal.push(project_total.to_string());
        table.add_row(subtotal);
    }

    table.add_rule();

    let all: Vec<&ReportRow> = rows.iter().collect();
    let mut totals = vec![bold("Grand total")];
    totals.extend(weeks.iter().map(|w| sum_week(&all, *w).or_dash()));
    let grand: Hours = rows.iter().map(|r| r.total_hours).sum();
    totals.push(bold(&grand.to_string()));
    table.add_row(totals);

    table.render()
}
