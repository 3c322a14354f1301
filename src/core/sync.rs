use crate::error::{Result, UpdaterError};
use crate::utils::fs;
use std::path::Path;

/// Overlays `source` onto `destination`.
///
/// Files that only exist in `destination` are kept. A missing `source` is an
/// error so that a change in the archive layout does not pass silently.
pub fn sync_folder(source: &Path, destination: &Path) -> Result<u64> {
    if !source.is_dir() {
        return Err(UpdaterError::SyncSourceMissing {
            path: source.to_path_buf(),
        });
    }

    log::info!(
        "Syncing {} -> {}",
        source.display(),
        destination.display()
    );

    let copied = fs::overlay_dir(source, destination).map_err(|e| match e {
        UpdaterError::Io(io) => UpdaterError::sync_error(destination, io),
        other => other,
    })?;

    log::info!("Copied {copied} file(s) into {}", destination.display());
    Ok(copied)
}
