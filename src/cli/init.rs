use std::path::PathBuf;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};
use crate::store::{open_store, PersistenceMode};

pub fn run(data_dir: Option<String>, demo: bool) -> Result<()> {
    let mut settings = load_settings();

    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    if demo {
        settings.mode = PersistenceMode::Demo;
    }

    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;

    // Opening the store creates the backing file (demo.json or kablan.db).
    open_store(settings.mode, &resolved)?;

    println!(
        "Initialized kablan at {} ({} mode)",
        resolved.display(),
        settings.mode.key()
    );
    Ok(())
}
