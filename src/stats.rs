use chrono::{Datelike, Months, NaiveDate};

use crate::models::{Transaction, TxType};

/// Bucket for transactions with a blank category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Number of calendar months covered by the income/expenditure chart.
pub const CHART_MONTHS: u32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub count: usize,
    pub last_description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthPoint {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub income: f64,
    pub expenditure: f64,
}

/// Summary statistics over a transaction snapshot. Recomputed in full on
/// every change event; no incremental state.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialStats {
    pub total_income: f64,
    pub total_expenditure: f64,
    pub net_balance: f64,
    pub total_tithes: f64,
    pub total_offerings: f64,
    pub total_donations: f64,
    /// Per-category stats, ordered by first appearance in the input.
    pub category_stats: Vec<(String, CategoryStats)>,
    /// Rolling window ending at the month of the newest transaction date.
    pub chart_data: Vec<MonthPoint>,
}

impl FinancialStats {
    /// Pure function of the snapshot, including its order: the same input
    /// collection always yields the identical output. `last_description` is
    /// the description of the last transaction in input order that carries
    /// one; callers that want chronological semantics sort before calling.
    pub fn compute(transactions: &[Transaction]) -> Self {
        let mut total_income = 0.0;
        let mut total_expenditure = 0.0;
        let mut total_tithes = 0.0;
        let mut total_offerings = 0.0;
        let mut total_donations = 0.0;
        let mut category_stats: Vec<(String, CategoryStats)> = Vec::new();

        for tx in transactions {
            match tx.tx_type {
                TxType::Tithe => {
                    total_income += tx.amount;
                    total_tithes += tx.amount;
                }
                TxType::Offering => {
                    total_income += tx.amount;
                    total_offerings += tx.amount;
                }
                TxType::Donation => {
                    total_income += tx.amount;
                    total_donations += tx.amount;
                }
                TxType::Expense => total_expenditure += tx.amount,
            }

            let name = category_name(tx);
            let idx = match category_stats.iter().position(|(n, _)| n == name) {
                Some(i) => i,
                None => {
                    category_stats.push((
                        name.to_string(),
                        CategoryStats { count: 0, last_description: "No description".to_string() },
                    ));
                    category_stats.len() - 1
                }
            };
            let entry = &mut category_stats[idx].1;
            entry.count += 1;
            if let Some(desc) = tx.description.as_deref().filter(|d| !d.is_empty()) {
                entry.last_description = desc.to_string();
            }
        }

        FinancialStats {
            total_income,
            total_expenditure,
            net_balance: total_income - total_expenditure,
            total_tithes,
            total_offerings,
            total_donations,
            category_stats,
            chart_data: chart_data(transactions),
        }
    }
}

#[cfg(test)]
impl FinancialStats {
    fn category(&self, name: &str) -> Option<&CategoryStats> {
        self.category_stats
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }
}

fn category_name(tx: &Transaction) -> &str {
    if tx.category.trim().is_empty() {
        UNCATEGORIZED
    } else {
        &tx.category
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Income/expenditure sums per month over a rolling window of
/// [`CHART_MONTHS`] calendar months ending at the newest transaction date.
/// Transactions outside the window, or with unparseable dates, are excluded
/// from the chart only. An empty snapshot yields an empty chart.
fn chart_data(transactions: &[Transaction]) -> Vec<MonthPoint> {
    let newest = transactions
        .iter()
        .filter_map(|tx| parse_date(&tx.date))
        .max();
    let Some(newest) = newest else {
        return Vec::new();
    };
    let anchor = NaiveDate::from_ymd_opt(newest.year(), newest.month(), 1)
        .unwrap_or(newest);

    let mut points: Vec<MonthPoint> = (0..CHART_MONTHS)
        .rev()
        .map(|back| {
            let first = anchor - Months::new(back);
            MonthPoint {
                label: first.format("%b %Y").to_string(),
                year: first.year(),
                month: first.month(),
                income: 0.0,
                expenditure: 0.0,
            }
        })
        .collect();

    for tx in transactions {
        let Some(date) = parse_date(&tx.date) else {
            continue;
        };
        let Some(point) = points
            .iter_mut()
            .find(|p| p.year == date.year() && p.month == date.month())
        else {
            continue;
        };
        if tx.tx_type.is_income() {
            point.income += tx.amount;
        } else {
            point.expenditure += tx.amount;
        }
    }

    points
}
