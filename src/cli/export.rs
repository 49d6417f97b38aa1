use std::path::PathBuf;

use crate::cli::FilterArgs;
use crate::error::Result;
use crate::exporter::transactions_csv;
use crate::settings::{db_path, get_data_dir};
use crate::store::TransactionStore;

#[cfg(feature = "pdf")]
use crate::db::get_metadata;
#[cfg(feature = "pdf")]
use crate::error::StewardError;
#[cfg(feature = "pdf")]
use crate::models::PayStatus;
#[cfg(feature = "pdf")]
use crate::stats::FinancialStats;

fn default_path(name: &str, ext: &str) -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    get_data_dir().join("exports").join(format!("{name}-{date}.{ext}"))
}

fn write_file(bytes: &[u8], path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Spreadsheet export of the filtered set, the same subset the history
/// view shows under these flags.
pub fn csv(filter_args: &FilterArgs, output: Option<String>) -> Result<()> {
    let store = TransactionStore::open(&db_path())?;
    let filter = filter_args.to_filter()?;
    let rows = filter.apply(&store.fetch_all()?);
    let bytes = transactions_csv(&rows)?;
    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_path("transactions", "csv"));
    write_file(&bytes, &path)
}

#[cfg(feature = "pdf")]
pub fn history(filter_args: &FilterArgs, output: Option<String>) -> Result<()> {
    let store = TransactionStore::open(&db_path())?;
    let filter = filter_args.to_filter()?;
    let rows = filter.apply(&store.fetch_all()?);
    let church = get_metadata(store.connection(), "church_name").unwrap_or_default();
    let bytes = crate::pdf::render_history(&rows, &church)?;
    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_path("transaction-history", "pdf"));
    write_file(&bytes, &path)
}

#[cfg(feature = "pdf")]
pub fn receipts(ids: &str, output: Option<String>) -> Result<()> {
    let store = TransactionStore::open(&db_path())?;
    let mut selected = Vec::new();
    for part in ids.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id: i64 = part
            .parse()
            .map_err(|_| StewardError::Other(format!("Invalid transaction id: {part}")))?;
        selected.push(store.get(id)?);
    }
    if selected.is_empty() {
        return Err(StewardError::Other("No transaction ids given".into()));
    }
    let church = get_metadata(store.connection(), "church_name").unwrap_or_default();
    let bytes = crate::pdf::render_receipts(&selected, &church)?;
    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_path("receipts", "pdf"));
    write_file(&bytes, &path)?;
    println!("{} receipts generated", selected.len());
    Ok(())
}

#[cfg(feature = "pdf")]
pub fn report(filter_args: &FilterArgs, output: Option<String>) -> Result<()> {
    let store = TransactionStore::open(&db_path())?;
    let filter = filter_args.to_filter()?;
    let rows = filter.apply(&store.fetch_all()?);
    let stats = FinancialStats::compute(&rows);
    let church = get_metadata(store.connection(), "church_name").unwrap_or_default();
    let bytes = crate::pdf::render_financial_report(&stats, &rows, &filter.period_label(), &church)?;
    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_path("financial-report", "pdf"));
    write_file(&bytes, &path)
}

#[cfg(feature = "pdf")]
pub fn payslips(month: Option<&str>, output: Option<String>) -> Result<()> {
    use crate::db::{get_connection, init_db};
    use crate::payroll::{current_month_label, join_staff, list_staff, records_for_month};

    let conn = get_connection(&db_path())?;
    init_db(&conn)?;
    let month = month
        .map(String::from)
        .unwrap_or_else(current_month_label);
    let records = records_for_month(&conn, &month)?;
    let staff = list_staff(&conn)?;
    let paid: Vec<_> = join_staff(records, &staff)
        .into_iter()
        .filter(|row| row.record.status == PayStatus::Paid)
        .collect();
    if paid.is_empty() {
        println!("No paid records available for {month}.");
        return Ok(());
    }
    let church = get_metadata(&conn, "church_name").unwrap_or_default();
    let bytes = crate::pdf::render_payslips(&paid, &month, &church)?;
    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_path("payslips", "pdf"));
    write_file(&bytes, &path)?;
    println!("{} payslips generated for {month}", paid.len());
    Ok(())
}
