//! Discover the files below a directory.
//!
//! [`Finder`] configures which entries are skipped (dot files, version control metadata,
//! unreadable directories) and [`Finder::files`] lazily walks the tree in file name order.

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use archbench_fs::Simplified;

/// Directory names used for version control metadata.
pub const VCS_PATTERNS: &[&str] = &[
    ".svn",
    "_svn",
    "CVS",
    "_darcs",
    ".arch-params",
    ".monotone",
    ".bzr",
    ".git",
    ".hg",
];

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to walk source tree: {}", root.user_display())]
    WalkDir {
        root: PathBuf,
        #[source]
        err: walkdir::Error,
    },
}

/// A builder for walking the files below a root directory.
#[derive(Debug, Clone)]
pub struct Finder {
    root: PathBuf,
    ignore_dot_files: bool,
    ignore_vcs: bool,
    ignore_unreadable_dirs: bool,
}

impl Finder {
    /// Find files below `root`.
    ///
    /// By default, dot files and version control metadata are skipped, and unreadable
    /// directories are an error.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore_dot_files: true,
            ignore_vcs: true,
            ignore_unreadable_dirs: false,
        }
    }

    /// Skip files and directories whose name starts with a `.`.
    #[must_use]
    pub fn ignore_dot_files(mut self, ignore_dot_files: bool) -> Self {
        self.ignore_dot_files = ignore_dot_files;
        self
    }

    /// Skip version control metadata, see [`VCS_PATTERNS`].
    #[must_use]
    pub fn ignore_vcs(mut self, ignore_vcs: bool) -> Self {
        self.ignore_vcs = ignore_vcs;
        self
    }

    /// Continue the walk when a directory can't be read instead of failing.
    #[must_use]
    pub fn ignore_unreadable_dirs(mut self, ignore_unreadable_dirs: bool) -> Self {
        self.ignore_unreadable_dirs = ignore_unreadable_dirs;
        self
    }

    /// Walk the tree.
    ///
    /// Only regular files and symbolic links to regular files are returned. Entries within a
    /// directory are sorted by file name.
    pub fn files(&self) -> Files {
        Files {
            finder: self.clone(),
            iter: WalkDir::new(&self.root).sort_by_file_name().into_iter(),
        }
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if self.ignore_dot_files && name.starts_with('.') {
            return true;
        }
        if self.ignore_vcs && VCS_PATTERNS.contains(&name.as_ref()) {
            return true;
        }
        false
    }
}

/// A lazy walk over the files selected by a [`Finder`].
pub struct Files {
    finder: Finder,
    iter: walkdir::IntoIter,
}

impl Iterator for Files {
    type Item = Result<FoundFile, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.iter.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    if self.finder.ignore_unreadable_dirs && is_permission_denied(&err) {
                        debug!(
                            "Skipping unreadable directory: {}",
                            err.path().unwrap_or(&self.finder.root).user_display()
                        );
                        continue;
                    }
                    return Some(Err(Error::WalkDir {
                        root: self.finder.root.clone(),
                        err,
                    }));
                }
            };

            // The root itself is never filtered.
            if entry.depth() == 0 {
                continue;
            }

            if self.finder.is_excluded(&entry) {
                trace!("Excluding: {}", entry.path().user_display());
                if entry.file_type().is_dir() {
                    self.iter.skip_current_dir();
                }
                continue;
            }

            let is_file = if entry.file_type().is_symlink() {
                entry.path().is_file()
            } else {
                entry.file_type().is_file()
            };
            if !is_file {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(&self.finder.root)
                .expect("walkdir starts with root")
                .to_path_buf();
            return Some(Ok(FoundFile {
                path: entry.into_path(),
                relative_path,
            }));
        }
    }
}

fn is_permission_denied(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|err| err.kind() == io::ErrorKind::PermissionDenied)
}

/// A file returned by [`Files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundFile {
    path: PathBuf,
    relative_path: PathBuf,
}

impl FoundFile {
    /// The path of the file, starting with the root of the walk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path of the file relative to the root of the walk.
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// The final component of the path.
    pub fn file_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default()
    }

    /// Read the full contents of the file.
    pub fn contents(&self) -> io::Result<Vec<u8>> {
        fs_err::read(&self.path)
    }
}
