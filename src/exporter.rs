use crate::error::{Result, StewardError};
use crate::models::Transaction;

/// Fixed column order shared by the CSV export and the importer. The
/// receipt-id column always carries the same identifier the history table
/// shows, derived or stored.
pub const CSV_HEADERS: [&str; 7] = [
    "Date",
    "Contributor",
    "Amount",
    "Type",
    "Category",
    "Status",
    "Receipt ID",
];

/// Serialize the filtered transaction set, one row per transaction.
pub fn transactions_csv(rows: &[Transaction]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;
    for tx in rows {
        let amount = format!("{:.2}", tx.amount);
        let receipt = tx.display_receipt_id();
        writer.write_record([
            tx.date.as_str(),
            tx.contributor.as_str(),
            amount.as_str(),
            tx.tx_type.as_str(),
            tx.category.as_str(),
            tx.status.as_str(),
            receipt.as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| StewardError::Other(format!("CSV write failed: {e}")))
}
