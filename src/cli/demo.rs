use chrono::{Datelike, Local, Months, NaiveDate};
use rusqlite::Connection;

use crate::error::Result;
use crate::models::{NewTransaction, TxStatus, TxType};
use crate::payroll::{add_record, add_staff, current_month_label, mark_paid, previous_month_label};
use crate::settings::db_path;
use crate::store::TransactionStore;

struct DemoTxn {
    day: u32,
    contributor: &'static str,
    tx_type: TxType,
    category: &'static str,
    description: Option<&'static str>,
    amount: f64,
    status: TxStatus,
}

/// One month's worth of congregation activity; repeated for each month in
/// the window with a small deterministic variation.
const MONTHLY: &[DemoTxn] = &[
    DemoTxn { day: 3, contributor: "Ama Mensah", tx_type: TxType::Tithe, category: "General Offering", description: None, amount: 450.0, status: TxStatus::Processed },
    DemoTxn { day: 3, contributor: "Kofi Owusu", tx_type: TxType::Tithe, category: "General Offering", description: None, amount: 380.0, status: TxStatus::Processed },
    DemoTxn { day: 7, contributor: "Esi Commey", tx_type: TxType::Offering, category: "General Offering", description: Some("Sunday service offering"), amount: 120.0, status: TxStatus::Processed },
    DemoTxn { day: 10, contributor: "Yaw Darko", tx_type: TxType::Donation, category: "Building Fund", description: Some("Sanctuary roofing pledge"), amount: 1000.0, status: TxStatus::Processed },
    DemoTxn { day: 14, contributor: "Abena Pokuaa", tx_type: TxType::Offering, category: "Missions", description: Some("Northern outreach support"), amount: 200.0, status: TxStatus::Processed },
    DemoTxn { day: 17, contributor: "Kwame Asante", tx_type: TxType::Donation, category: "Welfare", description: Some("Member support fund"), amount: 150.0, status: TxStatus::Pending },
    DemoTxn { day: 21, contributor: "Adwoa Safo", tx_type: TxType::Tithe, category: "General Offering", description: None, amount: 275.0, status: TxStatus::Processed },
    DemoTxn { day: 5, contributor: "ECG Power", tx_type: TxType::Expense, category: "Utilities", description: Some("Electricity bill"), amount: 340.0, status: TxStatus::Processed },
    DemoTxn { day: 12, contributor: "Ghana Water Co", tx_type: TxType::Expense, category: "Utilities", description: Some("Water bill"), amount: 95.0, status: TxStatus::Processed },
    DemoTxn { day: 19, contributor: "Adom Hardware", tx_type: TxType::Expense, category: "Maintenance", description: Some("Chapel repairs"), amount: 220.0, status: TxStatus::Processed },
    DemoTxn { day: 26, contributor: "Osei Transport", tx_type: TxType::Expense, category: "Missions", description: Some("Outreach travel"), amount: 180.0, status: TxStatus::Failed },
];

const STAFF: &[(&str, &str, Option<&str>)] = &[
    ("Rev. Joseph Appiah", "Senior Pastor", None),
    ("Efua Baidoo", "Administrator", Some("Office")),
    ("Kojo Antwi", "Organist", Some("Music")),
    ("Akosua Frimpong", "Youth Coordinator", Some("Youth")),
];

const BASIC_SALARIES: &[f64] = &[3200.0, 1800.0, 1200.0, 1500.0];

/// Clamp a day to the last valid day of the given year/month.
fn clamp_day(year: i32, month: u32, day: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last_day = next
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28);
    day.min(last_day)
}

fn make_date(year: i32, month: u32, day: u32) -> String {
    let d = clamp_day(year, month, day);
    format!("{year:04}-{month:02}-{d:02}")
}

/// Build six months of demo transactions ending at the current month.
fn generate_transactions() -> Vec<NewTransaction> {
    let today = Local::now().date_naive();
    let mut txns = Vec::new();

    for i in 0..6u32 {
        let months_ago = 5 - i;
        let target = today - Months::new(months_ago);
        let year = target.year();
        let month = target.month();
        let idx = i as usize;

        // Small deterministic variation so the chart has shape
        let vary = 1.0 + ((idx % 5) as f64 - 2.0) * 0.02;

        for t in MONTHLY {
            let amount = if t.tx_type.is_income() {
                (t.amount * vary * 100.0).round() / 100.0
            } else {
                t.amount
            };
            txns.push(NewTransaction {
                date: make_date(year, month, t.day),
                contributor: t.contributor.to_string(),
                tx_type: t.tx_type,
                category: t.category.to_string(),
                amount,
                description: t.description.map(String::from),
                status: t.status,
                receipt_id: None,
            });
        }
    }

    txns
}

fn seed_payroll(conn: &Connection) -> Result<(usize, usize)> {
    let mut staff_ids = Vec::new();
    for (name, role, department) in STAFF {
        let member = add_staff(conn, name, role, *department)?;
        staff_ids.push(member.id);
    }

    let current = current_month_label();
    let previous = previous_month_label(&current)?;

    let mut records = 0usize;
    for (i, staff_id) in staff_ids.iter().enumerate() {
        let basic = BASIC_SALARIES[i % BASIC_SALARIES.len()];
        // last month: fully paid out
        let prev = add_record(conn, *staff_id, &previous, basic, 200.0, basic * 0.055)?;
        mark_paid(conn, prev.id)?;
        records += 1;
        // this month: still pending
        add_record(conn, *staff_id, &current, basic, 200.0, basic * 0.055)?;
        records += 1;
    }

    Ok((staff_ids.len(), records))
}

pub fn run() -> Result<()> {
    let path = db_path();
    if !path.exists() {
        eprintln!("No database found. Run `steward init` first.");
        std::process::exit(1);
    }

    let store = TransactionStore::open(&path)?;

    // Idempotency guard
    let existing: i64 = store.connection().query_row(
        "SELECT count(*) FROM transactions",
        [],
        |r| r.get(0),
    )?;
    if existing > 0 {
        println!("Demo data already loaded ({existing} transactions present).");
        return Ok(());
    }

    let txns = generate_transactions();
    for txn in &txns {
        store.insert(txn)?;
    }
    let (staff_count, payroll_count) = seed_payroll(store.connection())?;

    println!("Demo data loaded!");
    println!("  Transactions:    {}", txns.len());
    println!("  Staff:           {staff_count}");
    println!("  Payroll records: {payroll_count}");
    println!();
    println!("Try these next:");
    println!("  steward report summary");
    println!("  steward history --type Expense");
    println!("  steward categories list");
    println!("  steward payroll summary");
    println!("  steward export csv");

    Ok(())
}
