use crate::error::Result;
use std::path::{Path, PathBuf};

/// File name of the persisted installation path, resolved against the working directory.
pub const CONFIG_FILE_NAME: &str = "update_config.ini";

const LEGACY_SECTION: &str = "[Settings]";
const LEGACY_KEY: &str = "maa_directory";

/// Stores the MAA installation directory as a single line of text.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(CONFIG_FILE_NAME)
    }
}

impl ConfigStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Returns the stored installation directory, or `None` when the file is
    /// missing, empty or unreadable.
    pub fn load(&self) -> Option<PathBuf> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config file at {}", self.path.display());
                return None;
            }
            Err(e) => {
                log::warn!(
                    "Failed to read config file {}, treating it as absent: {e}",
                    self.path.display()
                );
                return None;
            }
        };

        parse_installation_dir(&content).map(PathBuf::from)
    }

    pub fn save(&self, installation_dir: &Path) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                crate::utils::fs::ensure_dir_exists(parent)?;
            }
        }

        std::fs::write(&self.path, installation_dir.to_string_lossy().as_bytes())?;
        log::debug!(
            "Saved installation directory {} to {}",
            installation_dir.display(),
            self.path.display()
        );
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn parse_installation_dir(content: &str) -> Option<&str> {
    let mut lines = content.lines();
    let first = lines.next()?;

    // INI layout written by earlier releases
    if first.trim() == LEGACY_SECTION {
        return lines.find_map(|line| {
            let (key, value) = line.split_once('=')?;
            (key.trim() == LEGACY_KEY)
                .then(|| value.trim())
                .filter(|value| !value.is_empty())
        });
    }

    if first.trim().is_empty() {
        None
    } else {
        Some(first)
    }
}
