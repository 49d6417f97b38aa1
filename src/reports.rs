use crate::models::{Transaction, TxStatus, TxType};
use crate::stats::UNCATEGORIZED;

// ---------------------------------------------------------------------------
// Category breakdown
// ---------------------------------------------------------------------------

/// One line of the financial report's category section, computed over the
/// filtered subset (not the global snapshot).
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
    pub total: f64,
    /// Type of the first transaction seen in the category.
    pub tx_type: TxType,
}

pub fn category_summary(rows: &[Transaction]) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = Vec::new();
    for tx in rows {
        let name = if tx.category.trim().is_empty() {
            UNCATEGORIZED
        } else {
            &tx.category
        };
        let idx = match summaries.iter().position(|s| s.name == name) {
            Some(i) => i,
            None => {
                summaries.push(CategorySummary {
                    name: name.to_string(),
                    count: 0,
                    total: 0.0,
                    tx_type: tx.tx_type,
                });
                summaries.len() - 1
            }
        };
        summaries[idx].count += 1;
        summaries[idx].total += tx.amount;
    }
    summaries
}

// ---------------------------------------------------------------------------
// Status integrity
// ---------------------------------------------------------------------------

/// Counts per status over the filtered subset, in a fixed display order,
/// omitting statuses with no rows.
pub fn status_counts(rows: &[Transaction]) -> Vec<(TxStatus, usize)> {
    [TxStatus::Processed, TxStatus::Pending, TxStatus::Failed]
        .into_iter()
        .map(|status| (status, rows.iter().filter(|tx| tx.status == status).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}
