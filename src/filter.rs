use chrono::NaiveDate;

use crate::models::{Transaction, TxStatus, TxType};

/// Rows shown per history page.
pub const PAGE_SIZE: usize = 5;

/// Conjunctive filter over the transaction snapshot. `None` means the
/// sentinel "All", meaning the predicate is inactive. Predicates are
/// independent, so the result does not depend on evaluation order.
#[derive(Debug, Default, Clone)]
pub struct TransactionFilter {
    /// Case-insensitive substring match on the contributor.
    pub search: Option<String>,
    pub status: Option<TxStatus>,
    pub tx_type: Option<TxType>,
    pub category: Option<String>,
    /// Inclusive lower bound on the transaction date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound (end of day) on the transaction date.
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.status.is_none()
            && self.tx_type.is_none()
            && self.category.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(q) = &self.search {
            if !tx.contributor.to_lowercase().contains(&q.to_lowercase()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if tx.status != status {
                return false;
            }
        }
        if let Some(tx_type) = self.tx_type {
            if tx.tx_type != tx_type {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &tx.category != category {
                return false;
            }
        }
        if self.start_date.is_some() || self.end_date.is_some() {
            // a date-bounded filter excludes rows whose date cannot be parsed
            let Ok(date) = NaiveDate::parse_from_str(&tx.date, "%Y-%m-%d") else {
                return false;
            };
            if let Some(start) = self.start_date {
                if date < start {
                    return false;
                }
            }
            if let Some(end) = self.end_date {
                if date > end {
                    return false;
                }
            }
        }
        true
    }

    /// Filtered subset in snapshot order. Everything downstream (the history
    /// table, CSV export, every PDF) consumes this same subset.
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|tx| self.matches(tx))
            .cloned()
            .collect()
    }

    /// Human label for the active date range, used in report headers.
    pub fn period_label(&self) -> String {
        let from = self
            .start_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "All Time".to_string());
        let to = self
            .end_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "Present".to_string());
        format!("{from} to {to}")
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    pub rows: Vec<Transaction>,
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

/// Slice one page out of the filtered rows. The requested page is clamped
/// into [1, total_pages]; an empty input yields a single empty page rather
/// than an error.
pub fn paginate(rows: &[Transaction], page: usize, page_size: usize) -> Page {
    let total_rows = rows.len();
    let total_pages = std::cmp::max(1, total_rows.div_ceil(page_size));
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * page_size;
    let rows = rows
        .iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();
    Page {
        rows,
        page,
        total_pages,
        total_rows,
    }
}
