use assert_cmd::Command;
use predicates::prelude::*;

fn steward(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("steward").unwrap();
    cmd.env("STEWARD_DATA_DIR", dir);
    cmd
}

fn init(dir: &std::path::Path) {
    steward(dir)
        .args(["init", "--church-name", "Grace Chapel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized Steward"));
}

fn add(dir: &std::path::Path, contributor: &str, amount: &str, tx_type: &str, category: &str) {
    steward(dir)
        .args([
            "add",
            "--date",
            "2026-01-15",
            "--contributor",
            contributor,
            "--amount",
            amount,
            "--type",
            tx_type,
            "--category",
            category,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded"));
}

#[test]
fn test_init_add_history() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path());
    add(dir.path(), "Ama Mensah", "100", "Tithe", "General Offering");
    steward(dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ama Mensah"))
        .stdout(predicate::str::contains("RCPT1"))
        .stdout(predicate::str::contains("Page 1 of 1"));
}

#[test]
fn test_report_summary_scenario() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path());
    add(dir.path(), "Ama Mensah", "100", "Tithe", "General Offering");
    add(dir.path(), "ECG Power", "40", "Expense", "Utilities");
    steward(dir.path())
        .args(["report", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GHS 100.00"))
        .stdout(predicate::str::contains("GHS 40.00"))
        .stdout(predicate::str::contains("GHS 60.00"));
}

#[test]
fn test_history_filters_and_expense_sign() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path());
    add(dir.path(), "Ama Mensah", "100", "Tithe", "General Offering");
    add(dir.path(), "ECG Power", "40", "Expense", "Utilities");
    steward(dir.path())
        .args(["history", "--type", "Expense"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EXP2"))
        .stdout(predicate::str::contains("-GHS 40.00"))
        .stdout(predicate::str::contains("Ama Mensah").not());
}

#[test]
fn test_bulk_category_rename() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path());
    for name in ["Ama Mensah", "Kofi Owusu", "Esi Commey"] {
        add(dir.path(), name, "100", "Offering", "Building Fund");
    }
    add(dir.path(), "Yaw Darko", "50", "Tithe", "General Offering");
    steward(dir.path())
        .args([
            "categories",
            "rename",
            "Building Fund",
            "--name",
            "Renovation Fund",
            "--type",
            "Donation",
            "--description",
            "Sanctuary renovation",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 3 transactions"));
    steward(dir.path())
        .args(["categories", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renovation Fund"))
        .stdout(predicate::str::contains("Building Fund").not());
}

#[test]
fn test_category_delete_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path());
    add(dir.path(), "Ama Mensah", "100", "Offering", "Welfare");
    steward(dir.path())
        .args(["categories", "delete", "Welfare"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
    steward(dir.path())
        .args(["categories", "delete", "Welfare", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 transaction"));
}

#[test]
fn test_export_csv_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path());
    add(dir.path(), "Ama Mensah", "100", "Tithe", "General Offering");
    let out = dir.path().join("out.csv");
    steward(dir.path())
        .args(["export", "csv", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("Date,Contributor,Amount,Type,Category,Status,Receipt ID"));
    assert!(content.contains("Ama Mensah"));
}

#[test]
fn test_payroll_flow() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path());
    steward(dir.path())
        .args(["staff", "add", "Efua Baidoo", "--role", "Administrator"])
        .assert()
        .success()
        .stdout(predicate::str::contains("id 1"));
    steward(dir.path())
        .args([
            "payroll", "add", "--staff", "1", "--month", "January 2026", "--basic", "2000",
            "--allowances", "300", "--deductions", "150",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("GHS 2,150.00"));
    steward(dir.path())
        .args(["payroll", "pay", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paid"));
    steward(dir.path())
        .args(["payroll", "summary", "--month", "January 2026"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GHS 2,150.00"))
        .stdout(predicate::str::contains("Staff Paid:       1"));
}

#[test]
fn test_demo_then_status() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path());
    steward(dir.path())
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo data loaded!"));
    // demo is idempotent
    steward(dir.path())
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("already loaded"));
    steward(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions:     66"));
}

#[test]
fn test_unknown_transaction_errors() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path());
    steward(dir.path())
        .args(["delete", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown transaction"));
}
