use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use uuid::Uuid;

use archbench_archive::{Archive, ArchiveFormat};
use archbench_fs::{Simplified, create_dir_if_absent, remove_file_if_exists};

use crate::{BenchSettings, Error};

/// Create the destination directory, unless it already exists.
pub fn create_destination_directory(destination_dir: &Path) -> Result<(), Error> {
    create_dir_if_absent(destination_dir)
        .map_err(|err| Error::CreateDestinationDirectory(destination_dir.to_path_buf(), err))?;
    Ok(())
}

/// A fresh archive path in `destination_dir`.
///
/// The file name is a random v4 UUID in lowercase hex followed by the format's extension, so
/// paths don't collide across iterations or concurrent runs.
pub fn destination_path(destination_dir: &Path, format: ArchiveFormat) -> PathBuf {
    let id = Uuid::new_v4();
    destination_dir.join(format!("{}.{}", id.simple(), format.extension()))
}

/// The archive handle and file owned by a single iteration.
#[derive(Debug)]
pub struct Destination {
    path: PathBuf,
    archive: Archive,
}

impl Destination {
    /// Bind a new archive handle to a fresh path in the destination directory.
    ///
    /// The archive file itself is only created by the timed operation.
    pub fn new(settings: &BenchSettings) -> Self {
        let path = destination_path(&settings.destination_dir, settings.format);
        trace!("Archive destination: {}", path.user_display());
        let archive = Archive::new(&path, settings.format);
        Self { path, archive }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn archive_mut(&mut self) -> &mut Archive {
        &mut self.archive
    }

    /// Release the archive handle, then remove the archive file.
    ///
    /// A missing file or a failed removal is not an error.
    pub fn release(self) {
        self.archive.close();
        match remove_file_if_exists(&self.path) {
            Ok(true) => trace!("Removed archive: {}", self.path.user_display()),
            Ok(false) => trace!("No archive to remove at: {}", self.path.user_display()),
            Err(err) => debug!(
                "Failed to remove archive `{}`: {err}",
                self.path.user_display()
            ),
        }
    }
}
