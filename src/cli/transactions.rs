use chrono::Local;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::FilterArgs;
use crate::error::{Result, StewardError};
use crate::filter::{paginate, PAGE_SIZE};
use crate::fmt::money;
use crate::models::{NewTransaction, Transaction, TxStatus, TxType};
use crate::settings::db_path;
use crate::stats::FinancialStats;
use crate::store::{apply_change, ChangeEvent, TransactionPatch, TransactionStore};

/// Patch the local snapshot with the change event and recompute the
/// aggregates, the same way the dashboard refreshes on every store change.
fn report_balance(mut snapshot: Vec<Transaction>, event: &ChangeEvent) {
    apply_change(&mut snapshot, event);
    let stats = FinancialStats::compute(&snapshot);
    println!("Net balance is now {}", money(stats.net_balance));
}

fn validate_date(raw: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| StewardError::Other(format!("Invalid date: {raw} (expected YYYY-MM-DD)")))
}

pub fn add(
    date: Option<&str>,
    contributor: &str,
    amount: f64,
    tx_type: &str,
    category: &str,
    description: Option<&str>,
    status: Option<&str>,
) -> Result<()> {
    if amount < 0.0 {
        return Err(StewardError::Other(
            "Amount must be a positive magnitude; record outgoings with --type Expense".into(),
        ));
    }
    let store = TransactionStore::open(&db_path())?;
    let date = match date {
        Some(d) => validate_date(d)?,
        None => Local::now().date_naive().format("%Y-%m-%d").to_string(),
    };
    let new = NewTransaction {
        date,
        contributor: contributor.to_string(),
        tx_type: TxType::parse(tx_type)?,
        category: category.to_string(),
        amount,
        description: description.map(String::from),
        status: status.map(TxStatus::parse).transpose()?.unwrap_or(TxStatus::Processed),
        receipt_id: None,
    };
    let snapshot = store.fetch_all()?;
    let event = store.insert(&new)?;
    if let ChangeEvent::Inserted(tx) = &event {
        println!(
            "Recorded {} of {} from {} ({})",
            tx.tx_type.as_str(),
            money(tx.amount),
            tx.contributor,
            tx.display_receipt_id()
        );
    }
    report_balance(snapshot, &event);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn edit(
    id: i64,
    date: Option<String>,
    contributor: Option<String>,
    amount: Option<f64>,
    tx_type: Option<&str>,
    category: Option<String>,
    description: Option<String>,
    status: Option<&str>,
) -> Result<()> {
    if let Some(a) = amount {
        if a < 0.0 {
            return Err(StewardError::Other(
                "Amount must be a positive magnitude; record outgoings with --type Expense".into(),
            ));
        }
    }
    let store = TransactionStore::open(&db_path())?;
    let patch = TransactionPatch {
        date: date.as_deref().map(validate_date).transpose()?,
        contributor,
        tx_type: tx_type.map(TxType::parse).transpose()?,
        category,
        amount,
        description,
        status: status.map(TxStatus::parse).transpose()?,
    };
    if patch.is_empty() {
        return Err(StewardError::Other("Nothing to change".into()));
    }
    let snapshot = store.fetch_all()?;
    let event = store.update(id, &patch)?;
    if let ChangeEvent::Updated(tx) = &event {
        println!("Updated transaction {id} ({})", tx.display_receipt_id());
    }
    report_balance(snapshot, &event);
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let store = TransactionStore::open(&db_path())?;
    let snapshot = store.fetch_all()?;
    let event = store.delete(id)?;
    println!("Deleted transaction {id}");
    report_balance(snapshot, &event);
    Ok(())
}

fn status_cell(status: TxStatus) -> Cell {
    let label = match status {
        TxStatus::Failed => status.as_str().red().to_string(),
        TxStatus::Pending => status.as_str().yellow().to_string(),
        TxStatus::Processed => status.as_str().green().to_string(),
    };
    Cell::new(label)
}

pub fn history(filter_args: &FilterArgs, page: usize) -> Result<()> {
    let store = TransactionStore::open(&db_path())?;
    let filter = filter_args.to_filter()?;
    let snapshot = store.fetch_all()?;
    let filtered = filter.apply(&snapshot);
    let page = paginate(&filtered, page, PAGE_SIZE);

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Date", "Contributor", "Amount", "Type", "Category", "Status", "Receipt ID",
    ]);
    for tx in &page.rows {
        table.add_row(vec![
            Cell::new(tx.id),
            Cell::new(&tx.date),
            Cell::new(&tx.contributor),
            Cell::new(money(tx.signed_amount())),
            Cell::new(tx.tx_type.as_str()),
            Cell::new(&tx.category),
            status_cell(tx.status),
            Cell::new(tx.display_receipt_id()),
        ]);
    }
    println!("Transaction History\n{table}");
    let noun = if filter.is_empty() {
        "transactions"
    } else {
        "matching transactions"
    };
    println!(
        "Page {} of {} ({} {noun})",
        page.page, page.total_pages, page.total_rows
    );
    Ok(())
}
