use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::money;
use crate::reports::status_counts;
use crate::settings::db_path;
use crate::stats::FinancialStats;
use crate::store::TransactionStore;

pub fn summary() -> Result<()> {
    let store = TransactionStore::open(&db_path())?;
    let snapshot = store.fetch_all()?;
    let stats = FinancialStats::compute(&snapshot);

    println!("Financial Overview");
    println!("  Total Income:      {}", money(stats.total_income).green());
    println!("  Total Expenditure: {}", money(stats.total_expenditure).red());
    println!("  Net Balance:       {}", money(stats.net_balance).bold());
    println!();
    println!("  Total Tithes:      {}", money(stats.total_tithes));
    println!("  Total Offerings:   {}", money(stats.total_offerings));
    println!("  Total Donations:   {}", money(stats.total_donations));
    println!();
    println!("  Transactions:      {}", snapshot.len());
    println!("  Categories:        {}", stats.category_stats.len());
    let counts = status_counts(&snapshot);
    if !counts.is_empty() {
        let parts: Vec<String> = counts
            .iter()
            .map(|(status, count)| format!("{} {}", count, status.as_str()))
            .collect();
        println!("  Integrity:         {}", parts.join(", "));
    }
    Ok(())
}

pub fn categories() -> Result<()> {
    let store = TransactionStore::open(&db_path())?;
    let snapshot = store.fetch_all()?;
    let stats = FinancialStats::compute(&snapshot);

    if stats.category_stats.is_empty() {
        println!("No contributions recorded yet.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["Category", "Last Description", "Contributions"]);
    for (name, cat) in &stats.category_stats {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(&cat.last_description),
            Cell::new(cat.count),
        ]);
    }
    println!("Contribution Categories\n{table}");
    Ok(())
}

pub fn chart() -> Result<()> {
    let store = TransactionStore::open(&db_path())?;
    let snapshot = store.fetch_all()?;
    let stats = FinancialStats::compute(&snapshot);

    if stats.chart_data.is_empty() {
        println!("No dated transactions to chart yet.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["Month", "Income", "Expenditure", "Net"]);
    for point in &stats.chart_data {
        let net = point.income - point.expenditure;
        table.add_row(vec![
            Cell::new(&point.label),
            Cell::new(money(point.income)),
            Cell::new(money(point.expenditure)),
            Cell::new(money(net)),
        ]);
    }
    println!("Income vs. Expenditure Trend\n{table}");
    Ok(())
}
