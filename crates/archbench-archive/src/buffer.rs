use indexmap::IndexMap;
use tracing::{debug, trace};

use archbench_fs::Simplified;

use crate::name::normalize_entry_name;
use crate::{Archive, Error};

/// A buffered write transaction on an [`Archive`].
///
/// Staging the same name twice keeps the entry at its first position with the last content.
#[derive(Debug)]
pub struct Buffer<'a> {
    archive: &'a mut Archive,
    staged: IndexMap<String, Vec<u8>>,
}

impl<'a> Buffer<'a> {
    pub(crate) fn new(archive: &'a mut Archive) -> Self {
        Self {
            archive,
            staged: IndexMap::new(),
        }
    }

    /// Stage an entry named `name` with the given content.
    pub fn add_from_bytes(&mut self, name: &str, contents: impl Into<Vec<u8>>) -> Result<(), Error> {
        let name = normalize_entry_name(name)?;
        if let Some(previous) = self.staged.insert(name, contents.into()) {
            trace!("Replaced a staged entry of {} bytes", previous.len());
        }
        Ok(())
    }

    /// The number of staged entries.
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Write all staged entries to the archive.
    pub fn commit(mut self) -> Result<(), Error> {
        let staged = std::mem::take(&mut self.staged);
        self.archive.write_staged(staged)
    }
}

impl Drop for Buffer<'_> {
    fn drop(&mut self) {
        if !self.staged.is_empty() {
            debug!(
                "Discarding {} uncommitted entries for: {}",
                self.staged.len(),
                self.archive.path().user_display()
            );
        }
    }
}
