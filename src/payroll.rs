use chrono::{Local, Months, NaiveDate};
use rusqlite::Connection;

use crate::error::{Result, StewardError};
use crate::models::{PayStatus, PayrollRecord, PayrollRow, Staff};

// ---------------------------------------------------------------------------
// Derivations
// ---------------------------------------------------------------------------

/// Net pay is always a function of the three inputs; the stored column is
/// generated from the same expression, so a live preview and the stored
/// value cannot diverge. May go negative when deductions exceed earnings.
pub fn net_pay(basic: f64, allowances: f64, deductions: f64) -> f64 {
    basic + allowances - deductions
}

/// Parse a human-readable period label like "January 2026".
pub fn parse_month_label(label: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("1 {}", label.trim()), "%d %B %Y")
        .map_err(|_| StewardError::InvalidMonth(label.to_string()))
}

/// "January 2026" -> "December 2025": one calendar month back, rolling the
/// year where needed.
pub fn previous_month_label(label: &str) -> Result<String> {
    let first = parse_month_label(label)?;
    let prev = first - Months::new(1);
    Ok(prev.format("%B %Y").to_string())
}

/// The current calendar month as a period label.
pub fn current_month_label() -> String {
    Local::now().date_naive().format("%B %Y").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// Month-over-month movement of the payroll total. A previous total of zero
/// with any current spend reads as a flat +100%; two empty months are
/// neutral.
pub fn trend(current: f64, previous: f64) -> (f64, Trend) {
    if previous > 0.0 {
        let diff = current - previous;
        let pct = diff / previous * 100.0;
        let dir = if diff > 0.0 {
            Trend::Up
        } else if diff < 0.0 {
            Trend::Down
        } else {
            Trend::Neutral
        };
        (pct, dir)
    } else if current > 0.0 && previous == 0.0 {
        (100.0, Trend::Up)
    } else {
        (0.0, Trend::Neutral)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayrollSummary {
    pub total_net: f64,
    pub paid: usize,
    pub pending: usize,
}

pub fn summarize(records: &[PayrollRecord]) -> PayrollSummary {
    PayrollSummary {
        total_net: records.iter().map(|r| r.net_pay).sum(),
        paid: records.iter().filter(|r| r.status == PayStatus::Paid).count(),
        pending: records.iter().filter(|r| r.status == PayStatus::Pending).count(),
    }
}

/// Join payroll records with staff rows by id. A record whose staff member
/// no longer exists keeps rendering with placeholder labels.
pub fn join_staff(records: Vec<PayrollRecord>, staff: &[Staff]) -> Vec<PayrollRow> {
    records
        .into_iter()
        .map(|record| {
            let member = staff.iter().find(|s| s.id == record.staff_id);
            PayrollRow {
                staff_name: member.map(|s| s.name.clone()).unwrap_or_else(|| "Unknown".to_string()),
                staff_role: member.map(|s| s.role.clone()).unwrap_or_else(|| "Staff".to_string()),
                record,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Staff table
// ---------------------------------------------------------------------------

pub fn add_staff(conn: &Connection, name: &str, role: &str, department: Option<&str>) -> Result<Staff> {
    if name.trim().is_empty() {
        return Err(StewardError::Other("Name is required".into()));
    }
    conn.execute(
        "INSERT INTO staff (name, role, department) VALUES (?1, ?2, ?3)",
        rusqlite::params![name, role, department],
    )?;
    Ok(Staff {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        role: role.to_string(),
        department: department.map(String::from),
    })
}

pub fn list_staff(conn: &Connection) -> Result<Vec<Staff>> {
    let mut stmt = conn.prepare("SELECT id, name, role, department FROM staff ORDER BY name")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Staff {
                id: row.get(0)?,
                name: row.get(1)?,
                role: row.get(2)?,
                department: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_staff(conn: &Connection, id: i64) -> Result<Staff> {
    conn.query_row(
        "SELECT id, name, role, department FROM staff WHERE id = ?1",
        [id],
        |row| {
            Ok(Staff {
                id: row.get(0)?,
                name: row.get(1)?,
                role: row.get(2)?,
                department: row.get(3)?,
            })
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StewardError::UnknownStaff(id),
        other => StewardError::Db(other),
    })
}

// ---------------------------------------------------------------------------
// Payroll records
// ---------------------------------------------------------------------------

fn map_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<PayrollRecord> {
    let status: String = row.get(7)?;
    Ok(PayrollRecord {
        id: row.get(0)?,
        staff_id: row.get(1)?,
        month: row.get(2)?,
        basic_salary: row.get(3)?,
        allowances: row.get(4)?,
        deductions: row.get(5)?,
        net_pay: row.get(6)?,
        status: PayStatus::parse(&status).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?,
        payment_date: row.get(8)?,
    })
}

const PAYROLL_COLUMNS: &str =
    "id, staff_id, month, basic_salary, allowances, deductions, net_pay, status, payment_date";

pub fn add_record(
    conn: &Connection,
    staff_id: i64,
    month: &str,
    basic_salary: f64,
    allowances: f64,
    deductions: f64,
) -> Result<PayrollRecord> {
    // validate the label and the staff reference up front
    parse_month_label(month)?;
    get_staff(conn, staff_id)?;
    conn.execute(
        "INSERT INTO payroll_records (staff_id, month, basic_salary, allowances, deductions) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![staff_id, month, basic_salary, allowances, deductions],
    )?;
    get_record(conn, conn.last_insert_rowid())
}

pub fn get_record(conn: &Connection, id: i64) -> Result<PayrollRecord> {
    let sql = format!("SELECT {PAYROLL_COLUMNS} FROM payroll_records WHERE id = ?1");
    conn.query_row(&sql, [id], map_record).map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StewardError::UnknownPayroll(id),
        other => StewardError::Db(other),
    })
}

pub fn records_for_month(conn: &Connection, month: &str) -> Result<Vec<PayrollRecord>> {
    let sql = format!("SELECT {PAYROLL_COLUMNS} FROM payroll_records WHERE month = ?1 ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([month], map_record)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Total net pay for a period label; months with no records sum to zero.
pub fn month_total(conn: &Connection, month: &str) -> Result<f64> {
    let total = conn.query_row(
        "SELECT COALESCE(SUM(net_pay), 0) FROM payroll_records WHERE month = ?1",
        [month],
        |row| row.get(0),
    )?;
    Ok(total)
}

/// Transition a pending record to Paid, stamping today as the payment date.
pub fn mark_paid(conn: &Connection, id: i64) -> Result<PayrollRecord> {
    let record = get_record(conn, id)?;
    if record.status == PayStatus::Paid {
        return Err(StewardError::Other(format!(
            "Payroll record {id} is already Paid (on {})",
            record.payment_date.as_deref().unwrap_or("unknown date")
        )));
    }
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    conn.execute(
        "UPDATE payroll_records SET status = 'Paid', payment_date = ?1 WHERE id = ?2",
        rusqlite::params![today, id],
    )?;
    get_record(conn, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_net_pay_identity() {
        assert_eq!(net_pay(2000.0, 300.0, 150.0), 2150.0);
        assert_eq!(net_pay(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_net_pay_can_go_negative() {
        assert_eq!(net_pay(1000.0, 100.0, 1500.0), -400.0);
    }

    #[test]
    fn test_previous_month_label_rolls_year() {
        assert_eq!(previous_month_label("January 2026").unwrap(), "December 2025");
        assert_eq!(previous_month_label("December 2025").unwrap(), "November 2025");
        assert_eq!(previous_month_label("March 2026").unwrap(), "February 2026");
    }

    #[test]
    fn test_month_label_rejects_garbage() {
        assert!(previous_month_label("Smarch 2026").is_err());
        assert!(previous_month_label("January").is_err());
        assert!(previous_month_label("2026-01").is_err());
    }

    #[test]
    fn test_trend_cases() {
        assert_eq!(trend(0.0, 0.0), (0.0, Trend::Neutral));
        assert_eq!(trend(100.0, 0.0), (100.0, Trend::Up));
        let (pct, dir) = trend(150.0, 100.0);
        assert_eq!(pct, 50.0);
        assert_eq!(dir, Trend::Up);
        let (pct, dir) = trend(50.0, 100.0);
        assert_eq!(pct, -50.0);
        assert_eq!(dir, Trend::Down);
        assert_eq!(trend(100.0, 100.0), (0.0, Trend::Neutral));
    }

    #[test]
    fn test_add_record_computes_net_pay() {
        let (_dir, conn) = test_db();
        let staff = add_staff(&conn, "Abena Pokuaa", "Worship Leader", None).unwrap();
        let record = add_record(&conn, staff.id, "January 2026", 2000.0, 300.0, 150.0).unwrap();
        assert_eq!(record.net_pay, 2150.0);
        assert_eq!(record.status, PayStatus::Pending);
        assert!(record.payment_date.is_none());
        // matches the preview derivation exactly
        assert_eq!(record.net_pay, net_pay(2000.0, 300.0, 150.0));
    }

    #[test]
    fn test_add_record_rejects_unknown_staff() {
        let (_dir, conn) = test_db();
        let err = add_record(&conn, 42, "January 2026", 1000.0, 0.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("Unknown staff"));
    }

    #[test]
    fn test_add_record_rejects_bad_month() {
        let (_dir, conn) = test_db();
        let staff = add_staff(&conn, "Kwame Asante", "Caretaker", None).unwrap();
        let err = add_record(&conn, staff.id, "2026-01", 1000.0, 0.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("Invalid month label"));
    }

    #[test]
    fn test_mark_paid_sets_payment_date_once() {
        let (_dir, conn) = test_db();
        let staff = add_staff(&conn, "Efua Baidoo", "Administrator", Some("Office")).unwrap();
        let record = add_record(&conn, staff.id, "January 2026", 1800.0, 0.0, 0.0).unwrap();
        let paid = mark_paid(&conn, record.id).unwrap();
        assert_eq!(paid.status, PayStatus::Paid);
        assert!(paid.payment_date.is_some());
        let err = mark_paid(&conn, record.id).unwrap_err();
        assert!(err.to_string().contains("already Paid"));
    }

    #[test]
    fn test_month_total_and_previous_period() {
        let (_dir, conn) = test_db();
        let staff = add_staff(&conn, "Yaw Boateng", "Youth Pastor", None).unwrap();
        add_record(&conn, staff.id, "January 2026", 2000.0, 0.0, 0.0).unwrap();
        add_record(&conn, staff.id, "January 2026", 1500.0, 500.0, 0.0).unwrap();
        add_record(&conn, staff.id, "December 2025", 1000.0, 0.0, 0.0).unwrap();

        let current = month_total(&conn, "January 2026").unwrap();
        assert_eq!(current, 4000.0);
        let prev_label = previous_month_label("January 2026").unwrap();
        let previous = month_total(&conn, &prev_label).unwrap();
        assert_eq!(previous, 1000.0);
        let (pct, dir) = trend(current, previous);
        assert_eq!(pct, 300.0);
        assert_eq!(dir, Trend::Up);
        // an untouched month totals zero
        assert_eq!(month_total(&conn, "June 2019").unwrap(), 0.0);
    }

    #[test]
    fn test_summarize_counts() {
        let (_dir, conn) = test_db();
        let staff = add_staff(&conn, "Adwoa Safo", "Deaconess", None).unwrap();
        let a = add_record(&conn, staff.id, "January 2026", 2000.0, 0.0, 0.0).unwrap();
        add_record(&conn, staff.id, "January 2026", 1500.0, 0.0, 0.0).unwrap();
        mark_paid(&conn, a.id).unwrap();

        let records = records_for_month(&conn, "January 2026").unwrap();
        let summary = summarize(&records);
        assert_eq!(summary.total_net, 3500.0);
        assert_eq!(summary.paid, 1);
        assert_eq!(summary.pending, 1);
    }

    #[test]
    fn test_join_staff_degrades_missing_reference() {
        let (_dir, conn) = test_db();
        let staff = add_staff(&conn, "Kojo Antwi", "Organist", None).unwrap();
        add_record(&conn, staff.id, "January 2026", 1200.0, 0.0, 0.0).unwrap();
        let mut records = records_for_month(&conn, "January 2026").unwrap();
        // simulate a record whose staff member was deleted
        records.push(PayrollRecord {
            id: 99,
            staff_id: 404,
            month: "January 2026".into(),
            basic_salary: 800.0,
            allowances: 0.0,
            deductions: 0.0,
            net_pay: 800.0,
            status: PayStatus::Pending,
            payment_date: None,
        });

        let rows = join_staff(records, &list_staff(&conn).unwrap());
        assert_eq!(rows[0].staff_name, "Kojo Antwi");
        assert_eq!(rows[1].staff_name, "Unknown");
        assert_eq!(rows[1].staff_role, "Staff");
    }
}
