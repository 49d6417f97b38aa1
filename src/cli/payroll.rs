use colored::Colorize;
use comfy_table::{Cell, Table};
use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::fmt::money;
use crate::models::{PayStatus, PayrollRow};
use crate::payroll::{
    add_record, current_month_label, join_staff, list_staff, mark_paid, month_total, net_pay,
    previous_month_label, records_for_month, summarize, trend, Trend,
};
use crate::settings::db_path;

fn open() -> Result<Connection> {
    let conn = get_connection(&db_path())?;
    init_db(&conn)?;
    Ok(conn)
}

fn month_or_current(month: Option<&str>) -> String {
    month.map(String::from).unwrap_or_else(current_month_label)
}

pub fn add(staff: i64, month: Option<&str>, basic: f64, allowances: f64, deductions: f64) -> Result<()> {
    let conn = open()?;
    let month = month_or_current(month);
    // the preview and the stored value come from the same derivation
    println!("Estimated net pay: {}", money(net_pay(basic, allowances, deductions)));
    let record = add_record(&conn, staff, &month, basic, allowances, deductions)?;
    println!(
        "Generated payroll record {} for {}: net pay {}",
        record.id,
        month,
        money(record.net_pay)
    );
    Ok(())
}

fn status_cell(status: PayStatus) -> Cell {
    let label = match status {
        PayStatus::Paid => status.as_str().blue().to_string(),
        PayStatus::Pending => status.as_str().yellow().to_string(),
    };
    Cell::new(label)
}

pub fn list(month: Option<&str>, search: Option<&str>, status: Option<&str>) -> Result<()> {
    let conn = open()?;
    let month = month_or_current(month);
    let records = records_for_month(&conn, &month)?;
    let staff = list_staff(&conn)?;
    let rows = join_staff(records, &staff);

    let status_filter = status
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
        .map(PayStatus::parse)
        .transpose()?;
    let rows: Vec<PayrollRow> = rows
        .into_iter()
        .filter(|row| {
            let matches_search = search
                .map(|q| row.staff_name.to_lowercase().contains(&q.to_lowercase()))
                .unwrap_or(true);
            let matches_status = status_filter
                .map(|s| row.record.status == s)
                .unwrap_or(true);
            matches_search && matches_status
        })
        .collect();

    if rows.is_empty() {
        println!("No payroll records found for {month}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Staff", "Role", "Basic", "Allowances", "Deductions", "Net Pay", "Status", "Paid On",
    ]);
    for row in &rows {
        table.add_row(vec![
            Cell::new(row.record.id),
            Cell::new(&row.staff_name),
            Cell::new(&row.staff_role),
            Cell::new(money(row.record.basic_salary)),
            Cell::new(money(row.record.allowances)),
            Cell::new(money(row.record.deductions)),
            Cell::new(money(row.record.net_pay)),
            status_cell(row.record.status),
            Cell::new(row.record.payment_date.as_deref().unwrap_or("")),
        ]);
    }
    println!("Payroll for {month}\n{table}");
    Ok(())
}

pub fn pay(id: i64) -> Result<()> {
    let conn = open()?;
    let record = mark_paid(&conn, id)?;
    println!(
        "Marked payroll record {id} as Paid on {}",
        record.payment_date.as_deref().unwrap_or("today")
    );
    Ok(())
}

pub fn summary(month: Option<&str>) -> Result<()> {
    let conn = open()?;
    let month = month_or_current(month);
    let records = records_for_month(&conn, &month)?;
    let summary = summarize(&records);

    let prev_label = previous_month_label(&month)?;
    let previous = month_total(&conn, &prev_label)?;
    let (pct, direction) = trend(summary.total_net, previous);

    println!("Payroll Summary for {month}");
    println!("  Total Payroll:    {}", money(summary.total_net));
    println!("  Staff Paid:       {}", summary.paid);
    println!("  Pending Payslips: {}", summary.pending);
    match direction {
        Trend::Up => println!("  {:.0}% increase from {prev_label}", pct.abs()),
        Trend::Down => println!("  {:.0}% decrease from {prev_label}", pct.abs()),
        Trend::Neutral => println!("  No change from {prev_label}"),
    }
    Ok(())
}
