use thiserror::Error;

#[derive(Error, Debug)]
pub enum StewardError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown transaction: id {0}")]
    UnknownTransaction(i64),

    #[error("Unknown staff member: id {0}")]
    UnknownStaff(i64),

    #[error("Unknown payroll record: id {0}")]
    UnknownPayroll(i64),

    #[error("Invalid month label: '{0}' (expected e.g. 'January 2026')")]
    InvalidMonth(String),

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[cfg(feature = "pdf")]
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, StewardError>;
