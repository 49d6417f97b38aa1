use std::path::PathBuf;

use crate::db::{get_connection, init_db, set_metadata};
use crate::error::Result;
use crate::settings::{load_settings, save_settings};

pub fn run(data_dir: Option<String>, church_name: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    let env_override = std::env::var("STEWARD_DATA_DIR")
        .ok()
        .filter(|d| !d.is_empty());

    let dir = data_dir
        .clone()
        .or_else(|| env_override.clone())
        .unwrap_or_else(|| settings.data_dir.clone());
    let dir = PathBuf::from(dir);

    std::fs::create_dir_all(&dir)?;
    std::fs::create_dir_all(dir.join("exports"))?;

    let conn = get_connection(&dir.join("steward.db"))?;
    init_db(&conn)?;

    if let Some(name) = church_name {
        set_metadata(&conn, "church_name", &name)?;
    }
    // STEWARD_DATA_DIR points at a scratch directory; don't persist it
    if env_override.is_none() {
        settings.data_dir = dir.to_string_lossy().to_string();
        save_settings(&settings)?;
    }

    println!("Initialized Steward at {}", dir.display());
    println!();
    println!("Try these next:");
    println!("  steward demo");
    println!("  steward add --contributor 'Ama Mensah' --amount 100 --type Tithe --category 'General Offering'");
    println!("  steward history");
    println!("  steward report summary");
    Ok(())
}
