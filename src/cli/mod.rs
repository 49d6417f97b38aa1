pub mod backup;
pub mod categories;
pub mod demo;
pub mod export;
pub mod import;
pub mod init;
pub mod payroll;
pub mod report;
pub mod staff;
pub mod status;
pub mod transactions;

use clap::{Args, Parser, Subcommand};
use chrono::NaiveDate;

use crate::error::{Result, StewardError};
use crate::filter::TransactionFilter;
use crate::models::{TxStatus, TxType};

/// Shared filter flags for history and every export. "All" is accepted as
/// the explicit no-filter sentinel on the enum flags.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive contributor search
    #[arg(long)]
    pub search: Option<String>,
    /// Status: Processed, Pending, Failed (or All)
    #[arg(long)]
    pub status: Option<String>,
    /// Type: Tithe, Offering, Donation, Expense (or All)
    #[arg(long = "type")]
    pub tx_type: Option<String>,
    /// Exact category name (or All)
    #[arg(long)]
    pub category: Option<String>,
    /// Start date (inclusive): YYYY-MM-DD
    #[arg(long = "from")]
    pub from_date: Option<String>,
    /// End date (inclusive): YYYY-MM-DD
    #[arg(long = "to")]
    pub to_date: Option<String>,
}

fn parse_cli_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| StewardError::Other(format!("Invalid date: {raw} (expected YYYY-MM-DD)")))
}

fn not_all(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl FilterArgs {
    pub fn to_filter(&self) -> Result<TransactionFilter> {
        Ok(TransactionFilter {
            search: self.search.clone().filter(|s| !s.is_empty()),
            status: not_all(&self.status).map(TxStatus::parse).transpose()?,
            tx_type: not_all(&self.tx_type).map(TxType::parse).transpose()?,
            category: not_all(&self.category).map(String::from),
            start_date: self.from_date.as_deref().map(parse_cli_date).transpose()?,
            end_date: self.to_date.as_deref().map(parse_cli_date).transpose()?,
        })
    }
}

#[derive(Parser)]
#[command(name = "steward", about = "Finance and payroll CLI for church administrators.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up Steward: choose a data directory and initialize the database.
    Init {
        /// Path for Steward data (default: ~/Documents/steward)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Church name shown on reports and receipts
        #[arg(long = "church-name")]
        church_name: Option<String>,
    },
    /// Record a contribution or expense.
    Add {
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Contributor or payee name
        #[arg(long)]
        contributor: String,
        /// Amount as a positive magnitude; direction follows the type
        #[arg(long)]
        amount: f64,
        /// Type: Tithe, Offering, Donation, Expense
        #[arg(long = "type")]
        tx_type: String,
        /// Category label, e.g. 'Building Fund'
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: Option<String>,
        /// Status: Processed, Pending, Failed (default: Processed)
        #[arg(long)]
        status: Option<String>,
    },
    /// Edit a transaction. Only the given fields change.
    Edit {
        /// Transaction id (shown in `steward history`)
        id: i64,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        contributor: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
        /// Type: Tithe, Offering, Donation, Expense
        #[arg(long = "type")]
        tx_type: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Status: Processed, Pending, Failed
        #[arg(long)]
        status: Option<String>,
    },
    /// Permanently delete a transaction.
    Delete {
        /// Transaction id (shown in `steward history`)
        id: i64,
    },
    /// Paged transaction history with filters.
    History {
        #[command(flatten)]
        filter: FilterArgs,
        /// Page number (clamped into range)
        #[arg(long, default_value = "1")]
        page: usize,
    },
    /// Financial reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Manage contribution categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Manage the staff directory.
    Staff {
        #[command(subcommand)]
        command: StaffCommands,
    },
    /// Manage monthly payroll.
    Payroll {
        #[command(subcommand)]
        command: PayrollCommands,
    },
    /// Export data and documents.
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Import transactions from a CSV or XLSX file.
    Import {
        /// Path to the file to import
        file: String,
        /// Format key (csv, xlsx); inferred from the extension if omitted
        #[arg(long)]
        format: Option<String>,
    },
    /// Load sample data to explore Steward.
    Demo,
    /// Back up the database.
    Backup {
        /// Output path (default: <data_dir>/backups/steward-YYYYMMDD-HHMMSS.db)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show current database and summary statistics.
    Status,
    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Financial overview: totals, net balance, per-type income.
    Summary,
    /// Contribution categories with counts and last descriptions.
    Categories,
    /// Income vs expenditure over the last six months.
    Chart,
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List categories derived from the live transaction set.
    List,
    /// Rewrite category, type and description on every transaction in a
    /// category.
    Rename {
        /// Current category name
        old: String,
        /// New category name
        #[arg(long)]
        name: String,
        /// New type: Tithe, Offering, Donation, Expense
        #[arg(long = "type")]
        tx_type: String,
        /// Description applied to every rewritten transaction
        #[arg(long)]
        description: Option<String>,
    },
    /// Permanently delete every transaction in a category.
    Delete {
        /// Category name
        name: String,
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum StaffCommands {
    /// Add a staff member.
    Add {
        /// Full name
        name: String,
        /// Role, e.g. 'Youth Pastor'
        #[arg(long)]
        role: String,
        #[arg(long)]
        department: Option<String>,
    },
    /// List all staff.
    List,
}

#[derive(Subcommand)]
pub enum PayrollCommands {
    /// Generate a payroll record for a staff member.
    Add {
        /// Staff id (shown in `steward staff list`)
        #[arg(long)]
        staff: i64,
        /// Period label, e.g. 'January 2026' (default: current month)
        #[arg(long)]
        month: Option<String>,
        /// Basic salary (GHS)
        #[arg(long)]
        basic: f64,
        #[arg(long, default_value = "0")]
        allowances: f64,
        #[arg(long, default_value = "0")]
        deductions: f64,
    },
    /// Payroll records for a month.
    List {
        /// Period label (default: current month)
        #[arg(long)]
        month: Option<String>,
        /// Case-insensitive staff name search
        #[arg(long)]
        search: Option<String>,
        /// Status: Pending, Paid (or All)
        #[arg(long)]
        status: Option<String>,
    },
    /// Mark a payroll record as paid, stamping today as the payment date.
    Pay {
        /// Payroll record id (shown in `steward payroll list`)
        id: i64,
    },
    /// Totals and month-over-month trend.
    Summary {
        /// Period label (default: current month)
        #[arg(long)]
        month: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export filtered transactions to CSV.
    Csv {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output file path
        #[arg(long)]
        output: Option<String>,
    },
    /// Export the transaction history to PDF.
    #[cfg(feature = "pdf")]
    History {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        output: Option<String>,
    },
    /// Generate one receipt per page for selected transactions.
    #[cfg(feature = "pdf")]
    Receipts {
        /// Comma-separated transaction ids
        ids: String,
        #[arg(long)]
        output: Option<String>,
    },
    /// Multi-section financial performance report as PDF.
    #[cfg(feature = "pdf")]
    Report {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        output: Option<String>,
    },
    /// Payslips for every Paid record in a month as PDF.
    #[cfg(feature = "pdf")]
    Payslips {
        /// Period label (default: current month)
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        output: Option<String>,
    },
}
