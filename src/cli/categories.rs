use comfy_table::{Cell, Table};

use crate::error::{Result, StewardError};
use crate::fmt::money;
use crate::models::TxType;
use crate::reports::category_summary;
use crate::settings::db_path;
use crate::stats::FinancialStats;
use crate::store::{CategoryRewrite, TransactionStore};

/// Categories are not a stored entity; the listing is derived from the
/// live transaction set on every call.
pub fn list() -> Result<()> {
    let store = TransactionStore::open(&db_path())?;
    let snapshot = store.fetch_all()?;
    let stats = FinancialStats::compute(&snapshot);
    let totals = category_summary(&snapshot);

    if stats.category_stats.is_empty() {
        println!("No contributions recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Name", "Description", "Contributions", "Total"]);
    for (name, cat) in &stats.category_stats {
        let total = totals
            .iter()
            .find(|s| &s.name == name)
            .map(|s| s.total)
            .unwrap_or(0.0);
        table.add_row(vec![
            Cell::new(name),
            Cell::new(&cat.last_description),
            Cell::new(cat.count),
            Cell::new(money(total)),
        ]);
    }
    println!("Contribution Categories\n{table}");
    Ok(())
}

pub fn rename(old: &str, name: &str, tx_type: &str, description: Option<&str>) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StewardError::Other("Name is required".into()));
    }
    let store = TransactionStore::open(&db_path())?;
    let count = store.category_count(old)?;
    if count == 0 {
        return Err(StewardError::Other(format!("Category not found: {old}")));
    }
    let rewrite = CategoryRewrite {
        category: name.to_string(),
        tx_type: TxType::parse(tx_type)?,
        description: description.map(String::from),
    };
    let updated = store.rename_category(old, &rewrite)?;
    println!("Updated {updated} transactions: '{old}' -> '{name}'");
    Ok(())
}

pub fn delete(name: &str, yes: bool) -> Result<()> {
    let store = TransactionStore::open(&db_path())?;
    let count = store.category_count(name)?;
    if count == 0 {
        return Err(StewardError::Other(format!("Category not found: {name}")));
    }
    if !yes {
        let noun = if count == 1 { "transaction" } else { "transactions" };
        println!(
            "Deleting category '{name}' permanently removes {count} {noun} and cannot be undone."
        );
        println!("Re-run with --yes to confirm.");
        return Ok(());
    }
    let deleted = store.delete_category(name)?;
    let noun = if deleted == 1 { "transaction" } else { "transactions" };
    println!("Deleted {deleted} {noun} in category '{name}'");
    Ok(())
}
