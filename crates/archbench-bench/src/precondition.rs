use tracing::{debug, trace};

use crate::{BenchSettings, Error};

/// An environmental requirement checked before any archive is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No profiler is attached to the process.
    ProfilingDisabled,
    /// Archive targets may be written.
    ArchiveWritable,
    /// The source directory exists and is a directory.
    SourceDirectoryExists,
}

impl Precondition {
    /// All preconditions, in the order they are checked.
    pub const ALL: [Self; 3] = [
        Self::ProfilingDisabled,
        Self::ArchiveWritable,
        Self::SourceDirectoryExists,
    ];

    /// Whether the precondition holds for `settings`.
    pub fn holds(self, settings: &BenchSettings) -> bool {
        match self {
            Self::ProfilingDisabled => !settings.profiling,
            Self::ArchiveWritable => !settings.archive_readonly,
            Self::SourceDirectoryExists => settings.source_dir.is_dir(),
        }
    }

    /// Why benchmarks can't run when the precondition is violated.
    pub fn reason(self) -> &'static str {
        match self {
            Self::ProfilingDisabled => "profiling must be disabled",
            Self::ArchiveWritable => "archive writes must not be forced read-only",
            Self::SourceDirectoryExists => "the source directory must exist",
        }
    }

    /// Check the precondition, returning the matching error if it is violated.
    pub fn check(self, settings: &BenchSettings) -> Result<(), Error> {
        if self.holds(settings) {
            return Ok(());
        }
        debug!("Precondition violated: {}", self.reason());
        Err(match self {
            Self::ProfilingDisabled => Error::ProfilingEnabled,
            Self::ArchiveWritable => Error::ArchiveReadonly,
            Self::SourceDirectoryExists => {
                Error::MissingSourceDirectory(settings.source_dir.clone())
            }
        })
    }
}

/// Check every [`Precondition`], failing on the first violation.
///
/// Checking has no side effects and can be repeated.
pub fn check_preconditions(settings: &BenchSettings) -> Result<(), Error> {
    for precondition in Precondition::ALL {
        precondition.check(settings)?;
        trace!("Precondition holds: {precondition:?}");
    }
    Ok(())
}
