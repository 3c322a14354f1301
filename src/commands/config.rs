use crate::core::config::ConfigStore;
use crate::error::{Result, UpdaterError};
use std::path::Path;

pub fn show_config(config: &ConfigStore) -> Result<()> {
    match config.load() {
        Some(dir) => {
            println!("📁 MAA installation directory: {}", dir.display());
            println!("   Stored in {:?}", config.path());
        }
        None => {
            println!("⚠️  No MAA installation directory configured");
            println!("   You will be asked for it on the next update, or run:");
            println!("   maa-updater config set <dir>");
        }
    }
    Ok(())
}

pub fn set_installation_dir(config: &ConfigStore, dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(UpdaterError::config_error(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    // Kept as typed: canonical Windows paths carry a `\\?\` prefix
    let dir = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(dir)
    };
    config.save(&dir)?;
    println!("✅ MAA installation directory set to {}", dir.display());
    Ok(())
}

pub fn clear_config(config: &ConfigStore) -> Result<()> {
    config.clear()?;
    println!("🧹 Cleared the saved MAA installation directory");
    Ok(())
}
