use std::path::Path;

use crate::error::Result;
use crate::importer::import_file;
use crate::settings::db_path;
use crate::store::TransactionStore;

pub fn run(file: &str, format: Option<&str>) -> Result<()> {
    let store = TransactionStore::open(&db_path())?;
    let result = import_file(&store, Path::new(file), format)?;

    if result.duplicate_file {
        println!("Skipped: this file has already been imported (checksum match).");
        return Ok(());
    }
    println!("Imported {} transactions", result.imported);
    if result.skipped > 0 {
        println!("Skipped {} duplicate rows", result.skipped);
    }
    if result.rejected > 0 {
        println!("Rejected {} rows (bad date or unknown type)", result.rejected);
    }
    Ok(())
}
