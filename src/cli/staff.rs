use comfy_table::{Cell, Table};
use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::payroll::{add_staff, list_staff};
use crate::settings::db_path;

fn open() -> Result<Connection> {
    let conn = get_connection(&db_path())?;
    init_db(&conn)?;
    Ok(conn)
}

pub fn add(name: &str, role: &str, department: Option<&str>) -> Result<()> {
    let conn = open()?;
    let staff = add_staff(&conn, name, role, department)?;
    println!("Added staff member: {} (id {})", staff.name, staff.id);
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = open()?;
    let members = list_staff(&conn)?;
    if members.is_empty() {
        println!("No staff found. Add staff members before generating payroll.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Role", "Department"]);
    for member in members {
        table.add_row(vec![
            Cell::new(member.id),
            Cell::new(member.name),
            Cell::new(member.role),
            Cell::new(member.department.unwrap_or_default()),
        ]);
    }
    println!("Staff Directory\n{table}");
    Ok(())
}
