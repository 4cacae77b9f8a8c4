//! Archive unpacking
//!
//! This module extracts uploaded zip archives into a version directory,
//! preserving the archive's internal relative paths.

use std::fs::File;
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use zip::read::ZipArchive;

use common::{Error, Result};

/// Extracts a zip archive into the destination directory.
///
/// The destination is created if it does not exist. Entries whose names
/// escape the destination (absolute paths or `..` components) are
/// rejected as invalid rather than written outside the repository.
pub fn unpack(archive_path: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;

    let file = File::open(archive_path)?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| Error::InvalidArchive(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::InvalidArchive(e.to_string()))?;

        let relative = match entry.enclosed_name() {
            Some(path) => path.to_path_buf(),
            None => {
                warn!("Rejecting archive entry {:?}: escapes the target directory", entry.name());
                return Err(Error::InvalidArchive(format!(
                    "entry '{}' escapes the target directory",
                    entry.name()
                )));
            }
        };

        let target = dest.join(&relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            io::copy(&mut entry, &mut out)?;
        }
    }

    debug!("Extracted {} entries into {:?}", archive.len(), dest);

    Ok(())
}
