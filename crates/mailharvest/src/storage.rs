use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::error::StorageError;
use crate::models::FileAttachment;
use crate::sanitize::sanitize_filename;

/// Writes file attachments into a destination directory.
///
/// Content goes to a temporary file beside the target and is renamed into
/// place, so a failed write never leaves a truncated file under the
/// attachment's name. An existing file with the same name is replaced.
pub struct FileWriter {
    destination: PathBuf,
}

impl FileWriter {
    pub fn new<P: AsRef<Path>>(destination: P) -> Self {
        Self {
            destination: destination.as_ref().to_path_buf(),
        }
    }

    /// Saves `file` and reports whether it landed on disk.
    pub fn write(&self, file: &FileAttachment) -> bool {
        match self.store(file) {
            Ok(path) => {
                info!("File \"{}\" downloaded", file.name);
                debug!("Saved {} bytes to {}", file.content_bytes.len(), path.display());
                true
            }
            Err(e) => {
                error!("File \"{}\" could not be saved: {}", file.name, e);
                false
            }
        }
    }

    /// Saves `file` and returns the path written.
    pub fn store(&self, file: &FileAttachment) -> Result<PathBuf, StorageError> {
        let filename = sanitize_filename(&file.name)
            .ok_or_else(|| StorageError::UnusableName(file.name.clone()))?;

        if !self.destination.is_dir() {
            return Err(StorageError::NotADirectory(self.destination.clone()));
        }

        let target = self.destination.join(&filename);
        let write_err = |source: std::io::Error| StorageError::WriteFile {
            path: target.clone(),
            source,
        };

        let mut temp = tempfile::Builder::new()
            .prefix(".mailharvest-")
            .suffix(".part")
            .tempfile_in(&self.destination)
            .map_err(write_err)?;

        temp.write_all(&file.content_bytes).map_err(write_err)?;
        temp.as_file().sync_all().map_err(write_err)?;

        // tempfile creates files owner-only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(write_err)?;
        }

        temp.persist(&target).map_err(|e| write_err(e.error))?;

        Ok(target)
    }
}
