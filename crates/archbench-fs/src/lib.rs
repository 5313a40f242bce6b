use std::io;
use std::path::Path;

use tracing::debug;

pub use crate::path::*;

mod path;

/// Create the directory at `path` (and any missing parents) unless it already exists.
///
/// Returns `true` if the directory was created by this call. Tolerates the directory being
/// created concurrently by another process; any other failure, including `path` existing as a
/// non-directory, is returned.
pub fn create_dir_if_absent(path: impl AsRef<Path>) -> io::Result<bool> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(false);
    }
    match fs_err::create_dir_all(path) {
        Ok(()) => {
            debug!("Created directory: {}", path.user_display());
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(false),
        Err(err) => Err(err),
    }
}

/// Remove the file at `path`, treating a missing file as success.
///
/// Returns `true` if a file was removed.
pub fn remove_file_if_exists(path: impl AsRef<Path>) -> io::Result<bool> {
    match fs_err::remove_file(path.as_ref()) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}
