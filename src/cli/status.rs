use std::path::PathBuf;

use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::open_configured_store;
use crate::store::{DB_FILE_NAME, DEMO_FILE_NAME, PersistenceMode};

pub fn run() -> Result<()> {
    let (settings, store) = open_configured_store()?;
    let data_dir = PathBuf::from(&settings.data_dir);
    let storage_path = match settings.mode {
        PersistenceMode::Demo => data_dir.join(DEMO_FILE_NAME),
        PersistenceMode::Database => data_dir.join(DB_FILE_NAME),
    };

    println!("Mode:       {}", settings.mode.key());
    println!("Data dir:   {}", data_dir.display());
    println!("Storage:    {}", storage_path.display());
    println!("VAT rate:   {:.0}%", settings.default_vat_rate * 100.0);
    if storage_path.exists() {
        let size = std::fs::metadata(&storage_path)?.len();
        println!("Size:       {}", format_bytes(size));
    }

    let projects = store.list_projects()?;
    let professionals = store.list_professionals()?;
    let mut items = 0usize;
    let mut imports = 0usize;
    for project in &projects {
        items += store.list_cost_items(&project.id)?.len();
        imports += store.list_imports(&project.id)?.len();
    }

    println!();
    println!("Projects:       {}", projects.len());
    println!("Professionals:  {}", professionals.len());
    println!("Cost items:     {items}");
    println!("Imports:        {imports}");

    Ok(())
}
