use crate::error::{Result, UpdaterError};
use std::path::Path;

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => UpdaterError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => UpdaterError::from(e),
        })?;
    }
    Ok(())
}

/// Copies `src` onto `dst`, overwriting files that exist in both and leaving
/// files only present in `dst` alone. Returns the number of files written.
pub fn overlay_dir(src: &Path, dst: &Path) -> Result<u64> {
    ensure_dir_exists(dst)?;

    let mut copied = 0;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copied += overlay_dir(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path).map_err(|e| match e.kind() {
                std::io::ErrorKind::PermissionDenied => UpdaterError::PermissionDenied {
                    path: dst_path.clone(),
                },
                _ => UpdaterError::sync_error(&dst_path, e),
            })?;
            log::trace!("Copied {} -> {}", src_path.display(), dst_path.display());
            copied += 1;
        }
    }

    Ok(copied)
}
