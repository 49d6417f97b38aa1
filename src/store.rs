use std::path::Path;

use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::{Result, StewardError};
use crate::models::{NewTransaction, Transaction, TxStatus, TxType};

// ---------------------------------------------------------------------------
// Change feed
// ---------------------------------------------------------------------------

/// A single change observed against the transaction table. Mutations return
/// the event they caused so callers can patch an in-memory snapshot without
/// refetching.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    Inserted(Transaction),
    Updated(Transaction),
    Deleted(i64),
}

/// Patch a snapshot with one change event. Insert prepends, update replaces
/// by id, delete filters by id. Idempotent: events for ids the snapshot no
/// longer (or already) contains are no-ops, so duplicate or out-of-order
/// delivery is harmless.
pub fn apply_change(snapshot: &mut Vec<Transaction>, event: &ChangeEvent) {
    match event {
        ChangeEvent::Inserted(tx) => {
            if !snapshot.iter().any(|t| t.id == tx.id) {
                snapshot.insert(0, tx.clone());
            }
        }
        ChangeEvent::Updated(tx) => {
            if let Some(slot) = snapshot.iter_mut().find(|t| t.id == tx.id) {
                *slot = tx.clone();
            }
        }
        ChangeEvent::Deleted(id) => {
            snapshot.retain(|t| t.id != *id);
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Default, Clone)]
pub struct TransactionPatch {
    pub date: Option<String>,
    pub contributor: Option<String>,
    pub tx_type: Option<TxType>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub status: Option<TxStatus>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.contributor.is_none()
            && self.tx_type.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.status.is_none()
    }
}

/// New values applied to every transaction in a category during a bulk
/// rename. Amount, date, contributor and status stay untouched per row.
#[derive(Debug, Clone)]
pub struct CategoryRewrite {
    pub category: String,
    pub tx_type: TxType,
    pub description: Option<String>,
}

/// Owned handle over the transaction table. Everything that reads or writes
/// transactions goes through one of these; no hidden globals.
pub struct TransactionStore {
    conn: Connection,
}

fn conv_err(e: StewardError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

fn map_tx(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let tx_type: String = row.get(3)?;
    let status: String = row.get(7)?;
    let description: Option<String> = row.get(6)?;
    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        contributor: row.get(2)?,
        tx_type: TxType::parse(&tx_type).map_err(conv_err)?,
        category: row.get(4)?,
        amount: row.get(5)?,
        description: description.filter(|d| !d.is_empty()),
        status: TxStatus::parse(&status).map_err(conv_err)?,
        receipt_id: row.get(8)?,
    })
}

const TX_COLUMNS: &str = "id, date, contributor, type, category, amount, description, status, receipt_id";

impl TransactionStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = get_connection(db_path)?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Full snapshot, newest first (date desc, id desc), the order every
    /// consumer, including the aggregation engine, observes.
    pub fn fetch_all(&self) -> Result<Vec<Transaction>> {
        let sql = format!("SELECT {TX_COLUMNS} FROM transactions ORDER BY date DESC, id DESC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], map_tx)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get(&self, id: i64) -> Result<Transaction> {
        let sql = format!("SELECT {TX_COLUMNS} FROM transactions WHERE id = ?1");
        self.conn
            .query_row(&sql, [id], map_tx)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StewardError::UnknownTransaction(id),
                other => StewardError::Db(other),
            })
    }

    pub fn insert(&self, new: &NewTransaction) -> Result<ChangeEvent> {
        self.conn.execute(
            "INSERT INTO transactions (date, contributor, type, category, amount, description, status, receipt_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                new.date,
                new.contributor,
                new.tx_type.as_str(),
                new.category,
                new.amount,
                new.description,
                new.status.as_str(),
                new.receipt_id,
            ],
        )?;
        let tx = self.get(self.conn.last_insert_rowid())?;
        Ok(ChangeEvent::Inserted(tx))
    }

    pub fn update(&self, id: i64, patch: &TransactionPatch) -> Result<ChangeEvent> {
        let current = self.get(id)?;
        let merged = Transaction {
            id,
            date: patch.date.clone().unwrap_or(current.date),
            contributor: patch.contributor.clone().unwrap_or(current.contributor),
            tx_type: patch.tx_type.unwrap_or(current.tx_type),
            category: patch.category.clone().unwrap_or(current.category),
            amount: patch.amount.unwrap_or(current.amount),
            description: patch.description.clone().or(current.description),
            status: patch.status.unwrap_or(current.status),
            receipt_id: current.receipt_id,
        };
        self.conn.execute(
            "UPDATE transactions SET date = ?1, contributor = ?2, type = ?3, category = ?4, \
             amount = ?5, description = ?6, status = ?7 WHERE id = ?8",
            rusqlite::params![
                merged.date,
                merged.contributor,
                merged.tx_type.as_str(),
                merged.category,
                merged.amount,
                merged.description,
                merged.status.as_str(),
                id,
            ],
        )?;
        Ok(ChangeEvent::Updated(merged))
    }

    pub fn delete(&self, id: i64) -> Result<ChangeEvent> {
        let deleted = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(StewardError::UnknownTransaction(id));
        }
        Ok(ChangeEvent::Deleted(id))
    }

    pub fn category_count(&self, name: &str) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE category = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Rewrite category, type and description on every transaction in the
    /// old category. One statement, so the rename is all-or-nothing; the
    /// affected-row count goes back to the caller.
    pub fn rename_category(&self, old: &str, rewrite: &CategoryRewrite) -> Result<usize> {
        let updated = self.conn.execute(
            "UPDATE transactions SET category = ?1, type = ?2, description = ?3 WHERE category = ?4",
            rusqlite::params![
                rewrite.category,
                rewrite.tx_type.as_str(),
                rewrite.description,
                old,
            ],
        )?;
        Ok(updated)
    }

    /// Permanently remove every transaction in the category. No undo.
    pub fn delete_category(&self, name: &str) -> Result<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM transactions WHERE category = ?1", [name])?;
        Ok(deleted)
    }
}
