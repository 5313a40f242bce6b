use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use path_slash::PathExt;

/// The current working directory, captured once.
///
/// Empty if the current directory could not be determined, in which case paths are displayed
/// as-is.
pub static CWD: LazyLock<PathBuf> = LazyLock::new(|| std::env::current_dir().unwrap_or_default());

pub trait Simplified {
    /// Simplify a [`Path`].
    ///
    /// On Windows, this will strip the `\\?\` prefix from paths. On other platforms, it's a no-op.
    fn simplified(&self) -> &Path;

    /// Render a [`Path`] for user-facing display.
    ///
    /// Strips the `\\?\` prefix on Windows and relativizes the path against the current working
    /// directory.
    fn user_display(&self) -> std::path::Display<'_>;

    /// Render a [`Path`] with `/` separators, as used for archive entry names.
    ///
    /// Relativizes the path against the current working directory if it is inside of it.
    fn portable_display(&self) -> Cow<'_, str>;
}

impl<T: AsRef<Path>> Simplified for T {
    fn simplified(&self) -> &Path {
        dunce::simplified(self.as_ref())
    }

    fn user_display(&self) -> std::path::Display<'_> {
        let path = dunce::simplified(self.as_ref());

        // If the current working directory is the root or unknown, don't strip anything.
        if CWD.ancestors().nth(1).is_none() {
            return path.display();
        }

        // Attempt to strip the current working directory.
        let path = path.strip_prefix(CWD.simplified()).unwrap_or(path);

        if path.as_os_str().is_empty() {
            // Avoid printing an empty string for the current directory.
            return Path::new(".").display();
        }

        path.display()
    }

    fn portable_display(&self) -> Cow<'_, str> {
        let path = dunce::simplified(self.as_ref());
        let path = if CWD.ancestors().nth(1).is_none() {
            path
        } else {
            path.strip_prefix(CWD.simplified()).unwrap_or(path)
        };
        path.to_slash_lossy()
    }
}
