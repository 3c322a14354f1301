use crate::error::{Result, UpdaterError};
use std::fs::File;
use std::path::Path;
use zip::ZipArchive;

/// Unpacks every entry of a ZIP archive under `destination`, keeping the
/// archive's internal directory layout. Entries whose path would land outside
/// `destination` fail the extraction. Returns the number of files written.
pub fn extract_zip(archive_path: &Path, destination: &Path) -> Result<u64> {
    log::info!(
        "Extracting {} to {}",
        archive_path.display(),
        destination.display()
    );

    let fail = |e: &dyn std::fmt::Display| UpdaterError::extraction_error(archive_path, e);

    std::fs::create_dir_all(destination).map_err(|e| fail(&e))?;

    let file = File::open(archive_path).map_err(|e| fail(&e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| fail(&e))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| fail(&e))?;
        let outpath = match entry.enclosed_name() {
            Some(path) => destination.join(path),
            None => {
                return Err(fail(&format!(
                    "entry {:?} escapes the extraction directory",
                    entry.name()
                )));
            }
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath).map_err(|e| fail(&e))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| fail(&e))?;
            }
        }
        let mut outfile = File::create(&outpath)
            .map_err(|e| UpdaterError::extraction_error(&outpath, e))?;
        std::io::copy(&mut entry, &mut outfile)
            .map_err(|e| UpdaterError::extraction_error(&outpath, e))?;
        written += 1;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| UpdaterError::extraction_error(&outpath, e))?;
            }
        }
    }

    log::info!("Extracted {written} file(s)");
    Ok(written)
}
