use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};
use walkdir::WalkDir;

use archbench_fs::Simplified;

use crate::buffer::Buffer;
use crate::name::normalize_entry_name;
use crate::writer::write_archive;
use crate::{ArchiveFormat, Error};

/// Name of the entry in the archive and the path of the file it was read from.
pub type FileList = Vec<(String, PathBuf)>;

/// A handle to an archive at a fixed path.
///
/// Creating the handle doesn't touch the disk, the archive file is created by the first write.
/// Every write operation leaves a complete archive behind.
#[derive(Debug)]
pub struct Archive {
    path: PathBuf,
    format: ArchiveFormat,
    /// Entries written through this handle, in order.
    names: IndexSet<String>,
}

impl Archive {
    /// Bind a new handle to `path`.
    pub fn new(path: impl Into<PathBuf>, format: ArchiveFormat) -> Self {
        Self {
            path: path.into(),
            format,
            names: IndexSet::new(),
        }
    }

    /// The path of the archive file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The names of the entries written through this handle, in write order.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Add every file below `directory` to the archive.
    ///
    /// Entries are named by their `/`-separated path relative to `directory`. Directories are
    /// walked in file name order and are not written as entries themselves. Symbolic links are
    /// not followed into directories, but links to files are added with the target's content.
    pub fn build_from_directory(&mut self, directory: impl AsRef<Path>) -> Result<FileList, Error> {
        let directory = directory.as_ref();
        debug!(
            "Building {} archive from: {}",
            self.format,
            directory.user_display()
        );

        let names = &self.names;
        let files = write_archive(&self.path, self.format, |writer| {
            let mut files = FileList::new();
            for entry in WalkDir::new(directory).min_depth(1).sort_by_file_name() {
                let entry = entry.map_err(|err| Error::WalkDir {
                    root: directory.to_path_buf(),
                    err,
                })?;

                let file_type = entry.file_type();
                if file_type.is_dir() {
                    continue;
                }
                if file_type.is_symlink() {
                    if !entry.path().is_file() {
                        trace!("Skipping symlink: {}", entry.path().user_display());
                        continue;
                    }
                } else if !file_type.is_file() {
                    return Err(Error::UnsupportedFileType(
                        entry.path().to_path_buf(),
                        file_type,
                    ));
                }

                let relative = entry
                    .path()
                    .strip_prefix(directory)
                    .expect("walkdir starts with root");
                let name = normalize_entry_name(&relative.portable_display())?;
                if names.contains(&name) {
                    return Err(Error::DuplicateEntry(name));
                }

                trace!("Adding {name}");
                writer.write_file(&name, entry.path())?;
                files.push((name, entry.path().to_path_buf()));
            }
            Ok(files)
        })?;

        self.names
            .extend(files.iter().map(|(name, _)| name.clone()));
        debug!(
            "Wrote {} entries to: {}",
            files.len(),
            self.path.user_display()
        );
        Ok(files)
    }

    /// Start a buffered transaction.
    ///
    /// Entries added to the returned [`Buffer`] are staged in memory and written together by
    /// [`Buffer::commit`]. Dropping the buffer without committing discards the staged entries.
    pub fn start_buffering(&mut self) -> Buffer<'_> {
        trace!("Start buffering: {}", self.path.user_display());
        Buffer::new(self)
    }

    /// Add a single entry, writing the archive immediately.
    pub fn add_from_bytes(&mut self, name: &str, contents: impl Into<Vec<u8>>) -> Result<(), Error> {
        let mut buffer = self.start_buffering();
        buffer.add_from_bytes(name, contents)?;
        buffer.commit()
    }

    /// Write staged entries, in order, as a single archive update.
    pub(crate) fn write_staged(&mut self, staged: IndexMap<String, Vec<u8>>) -> Result<(), Error> {
        if let Some(name) = staged.keys().find(|name| self.names.contains(*name)) {
            return Err(Error::DuplicateEntry(name.clone()));
        }

        write_archive(&self.path, self.format, |writer| {
            for (name, contents) in &staged {
                writer.write_bytes(name, contents)?;
            }
            Ok(())
        })?;

        debug!(
            "Wrote {} buffered entries to: {}",
            staged.len(),
            self.path.user_display()
        );
        self.names.extend(staged.into_keys());
        Ok(())
    }

    /// Release the handle.
    pub fn close(self) {
        trace!("Closing archive handle: {}", self.path.user_display());
    }
}
