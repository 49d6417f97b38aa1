use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,
    contributor TEXT NOT NULL,
    type TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT '',
    amount REAL NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'Processed',
    receipt_id TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS staff (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    role TEXT NOT NULL,
    department TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS payroll_records (
    id INTEGER PRIMARY KEY,
    staff_id INTEGER NOT NULL,
    month TEXT NOT NULL,
    basic_salary REAL NOT NULL,
    allowances REAL NOT NULL DEFAULT 0,
    deductions REAL NOT NULL DEFAULT 0,
    net_pay REAL GENERATED ALWAYS AS (basic_salary + allowances - deductions) STORED,
    status TEXT NOT NULL DEFAULT 'Pending',
    payment_date TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    import_date TEXT DEFAULT (datetime('now')),
    record_count INTEGER,
    checksum TEXT
);

CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category);
CREATE INDEX IF NOT EXISTS idx_payroll_month ON payroll_records(month);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

pub fn get_metadata(conn: &Connection, key: &str) -> Option<String> {
    conn.query_row("SELECT value FROM metadata WHERE key = ?1", [key], |row| {
        row.get(0)
    })
    .ok()
}

pub fn set_metadata(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO metadata (key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        rusqlite::params![key, value],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["transactions", "staff", "payroll_records", "imports"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_metadata_set_get_overwrite() {
        let (_dir, conn) = test_db();
        assert!(get_metadata(&conn, "church_name").is_none());
        set_metadata(&conn, "church_name", "Grace Chapel").unwrap();
        assert_eq!(get_metadata(&conn, "church_name").as_deref(), Some("Grace Chapel"));
        set_metadata(&conn, "church_name", "Hope Assembly").unwrap();
        assert_eq!(get_metadata(&conn, "church_name").as_deref(), Some("Hope Assembly"));
    }

    #[test]
    fn test_net_pay_is_generated() {
        let (_dir, conn) = test_db();
        conn.execute(
            "INSERT INTO payroll_records (staff_id, month, basic_salary, allowances, deductions) \
             VALUES (1, 'January 2026', 2000.0, 300.0, 150.0)",
            [],
        )
        .unwrap();
        let net: f64 = conn
            .query_row("SELECT net_pay FROM payroll_records LIMIT 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(net, 2150.0);
    }

    #[test]
    fn test_net_pay_not_writable() {
        let (_dir, conn) = test_db();
        let result = conn.execute(
            "INSERT INTO payroll_records (staff_id, month, basic_salary, net_pay) \
             VALUES (1, 'January 2026', 2000.0, 9999.0)",
            [],
        );
        assert!(result.is_err(), "generated column must reject direct writes");
    }
}
