use crate::db::{get_connection, get_metadata, init_db};
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::{db_path, get_data_dir};

pub fn run() -> Result<()> {
    let data_dir = get_data_dir();
    let db_path = db_path();

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let conn = get_connection(&db_path)?;
        init_db(&conn)?;

        let church = get_metadata(&conn, "church_name");
        println!("Church:     {}", church.as_deref().unwrap_or("(not set)"));

        let transactions: i64 =
            conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
        let staff: i64 = conn.query_row("SELECT count(*) FROM staff", [], |r| r.get(0))?;
        let payroll: i64 =
            conn.query_row("SELECT count(*) FROM payroll_records", [], |r| r.get(0))?;
        let pending: i64 = conn.query_row(
            "SELECT count(*) FROM payroll_records WHERE status = 'Pending'",
            [],
            |r| r.get(0),
        )?;

        println!();
        println!("Transactions:     {transactions}");
        println!("Staff:            {staff}");
        println!("Payroll records:  {payroll}");
        println!("Pending payslips: {pending}");
    } else {
        println!();
        println!("Database not found. Run `steward init` to set up.");
    }

    Ok(())
}
