use crate::error::{Result, StewardError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxType {
    Tithe,
    Offering,
    Donation,
    Expense,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tithe => "Tithe",
            Self::Offering => "Offering",
            Self::Donation => "Donation",
            Self::Expense => "Expense",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim() {
            "Tithe" | "tithe" => Ok(Self::Tithe),
            "Offering" | "offering" => Ok(Self::Offering),
            "Donation" | "donation" => Ok(Self::Donation),
            "Expense" | "expense" => Ok(Self::Expense),
            other => Err(StewardError::Other(format!(
                "Invalid transaction type: {other} (must be Tithe, Offering, Donation or Expense)"
            ))),
        }
    }

    pub fn is_income(&self) -> bool {
        !matches!(self, Self::Expense)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Processed,
    Pending,
    Failed,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "Processed",
            Self::Pending => "Pending",
            Self::Failed => "Failed",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim() {
            "Processed" | "processed" => Ok(Self::Processed),
            "Pending" | "pending" => Ok(Self::Pending),
            "Failed" | "failed" => Ok(Self::Failed),
            other => Err(StewardError::Other(format!(
                "Invalid status: {other} (must be Processed, Pending or Failed)"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: i64,
    pub date: String,
    pub contributor: String,
    pub tx_type: TxType,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
    pub status: TxStatus,
    pub receipt_id: Option<String>,
}

impl Transaction {
    /// Display identifier: the stored receipt id, or `EXP{id}`/`RCPT{id}`
    /// derived from the row id. The history table and every export use this
    /// same derivation.
    pub fn display_receipt_id(&self) -> String {
        match &self.receipt_id {
            Some(r) => r.clone(),
            None => {
                if self.tx_type == TxType::Expense {
                    format!("EXP{}", self.id)
                } else {
                    format!("RCPT{}", self.id)
                }
            }
        }
    }

    /// Amounts are stored as positive magnitudes; direction comes from the
    /// type at display time.
    pub fn signed_amount(&self) -> f64 {
        if self.tx_type == TxType::Expense {
            -self.amount
        } else {
            self.amount
        }
    }
}

/// Insert payload; the id is assigned by the store. A `receipt_id` is only
/// carried when the source had an explicit one; otherwise it stays derived.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: String,
    pub contributor: String,
    pub tx_type: TxType,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
    pub status: TxStatus,
    pub receipt_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayStatus {
    Pending,
    Paid,
}

impl PayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim() {
            "Pending" | "pending" => Ok(Self::Pending),
            "Paid" | "paid" => Ok(Self::Paid),
            other => Err(StewardError::Other(format!(
                "Invalid payroll status: {other} (must be Pending or Paid)"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Staff {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub department: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PayrollRecord {
    pub id: i64,
    pub staff_id: i64,
    pub month: String,
    pub basic_salary: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub net_pay: f64,
    pub status: PayStatus,
    pub payment_date: Option<String>,
}

/// Payroll record joined with its staff row. A dangling staff reference
/// degrades to placeholder labels instead of failing the listing.
#[derive(Debug, Clone)]
pub struct PayrollRow {
    pub record: PayrollRecord,
    pub staff_name: String,
    pub staff_role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: i64, tx_type: TxType, receipt_id: Option<&str>) -> Transaction {
        Transaction {
            id,
            date: "2026-01-15".into(),
            contributor: "Ama Mensah".into(),
            tx_type,
            category: "General Offering".into(),
            amount: 100.0,
            description: None,
            status: TxStatus::Processed,
            receipt_id: receipt_id.map(String::from),
        }
    }

    #[test]
    fn test_receipt_id_derived_for_income() {
        assert_eq!(tx(7, TxType::Tithe, None).display_receipt_id(), "RCPT7");
        assert_eq!(tx(7, TxType::Offering, None).display_receipt_id(), "RCPT7");
        assert_eq!(tx(7, TxType::Donation, None).display_receipt_id(), "RCPT7");
    }

    #[test]
    fn test_receipt_id_derived_for_expense() {
        assert_eq!(tx(12, TxType::Expense, None).display_receipt_id(), "EXP12");
    }

    #[test]
    fn test_receipt_id_stored_wins() {
        assert_eq!(
            tx(12, TxType::Expense, Some("RCV-0042")).display_receipt_id(),
            "RCV-0042"
        );
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(tx(1, TxType::Tithe, None).signed_amount(), 100.0);
        assert_eq!(tx(1, TxType::Expense, None).signed_amount(), -100.0);
    }

    #[test]
    fn test_type_parse_round_trip() {
        for t in [TxType::Tithe, TxType::Offering, TxType::Donation, TxType::Expense] {
            assert_eq!(TxType::parse(t.as_str()).unwrap(), t);
        }
        assert!(TxType::parse("Levy").is_err());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(TxStatus::parse("pending").unwrap(), TxStatus::Pending);
        assert!(TxStatus::parse("Waiting").is_err());
        assert_eq!(PayStatus::parse("Paid").unwrap(), PayStatus::Paid);
    }
}
