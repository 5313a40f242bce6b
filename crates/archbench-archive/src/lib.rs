//! A minimal archive-building primitive.
//!
//! An [`Archive`] is a handle bound to a path on disk. Entries are written either in bulk from a
//! directory tree ([`Archive::build_from_directory`]) or through a buffered transaction
//! ([`Archive::start_buffering`]) that stages named entries in memory and writes them on commit.
//! The on-disk formats are provided by the `zip`, `tar` and `flate2` crates.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use archbench_fs::Simplified;

pub use crate::archive::{Archive, FileList};
pub use crate::buffer::Buffer;
pub use crate::format::{ArchiveFormat, UnknownArchiveFormat};
pub use crate::read::read_entries;

mod archive;
mod buffer;
mod format;
mod name;
mod read;
mod writer;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Failed to write zip archive")]
    Zip(#[from] zip::result::ZipError),
    #[error("Failed to read zip archive: {}", _0.user_display())]
    ZipRead(PathBuf, #[source] zip::result::ZipError),
    #[error("Failed to walk source tree: {}", root.user_display())]
    WalkDir {
        root: PathBuf,
        #[source]
        err: walkdir::Error,
    },
    #[error("Failed to write to {}", _0.user_display())]
    TarWrite(PathBuf, #[source] io::Error),
    #[error("Failed to read {}", _0.user_display())]
    TarRead(PathBuf, #[source] io::Error),
    #[error("Invalid archive entry name `{name}`: {reason}")]
    InvalidEntryName { name: String, reason: &'static str },
    #[error("The archive already contains an entry named `{0}`")]
    DuplicateEntry(String),
    #[error("Appending to an existing `{format}` archive is not supported: {}", path.user_display())]
    AppendUnsupported { format: ArchiveFormat, path: PathBuf },
    #[error("Unsupported file type {:?}: {}", _1, _0.user_display())]
    UnsupportedFileType(PathBuf, std::fs::FileType),
}
