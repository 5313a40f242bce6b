use std::io;
use std::path::PathBuf;

use thiserror::Error;

use archbench_fs::Simplified;
use archbench_static::EnvVars;

use crate::CaseState;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Profiling must be disabled for benchmarks, unset `{}`", EnvVars::ARCHBENCH_PROFILING)]
    ProfilingEnabled,
    #[error("Archive targets are read-only, set `{}=0` to run benchmarks", EnvVars::ARCHBENCH_ARCHIVE_READONLY)]
    ArchiveReadonly,
    #[error("The source directory does not exist: {}", _0.user_display())]
    MissingSourceDirectory(PathBuf),
    #[error("Could not create destination directory: {}", _0.user_display())]
    CreateDestinationDirectory(PathBuf, #[source] io::Error),
    #[error("Failed to parse environment variable `{name}` with invalid value `{value}`: {err}")]
    InvalidEnvironmentVariable {
        name: String,
        value: String,
        err: String,
    },
    #[error(transparent)]
    Discover(#[from] archbench_discover::Error),
    #[error("Failed to read source file: {}", _0.user_display())]
    ReadSourceFile(PathBuf, #[source] io::Error),
    #[error(transparent)]
    Archive(#[from] archbench_archive::Error),
    #[error("`{case}` is not prepared for the timed operation (state: {state}), `setup` must succeed first")]
    NotPrepared { case: &'static str, state: CaseState },
}

/// When an [`Error`] can occur in the lifecycle of a benchmark case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The environment is unsuitable for benchmarking, raised by setup before any timing.
    Environment,
    /// The timed operation failed.
    Operation,
    /// The lifecycle was driven out of order.
    Usage,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProfilingEnabled
            | Self::ArchiveReadonly
            | Self::MissingSourceDirectory(_)
            | Self::CreateDestinationDirectory(..)
            | Self::InvalidEnvironmentVariable { .. }
            | Self::Discover(_)
            | Self::ReadSourceFile(..) => ErrorKind::Environment,
            Self::Archive(_) => ErrorKind::Operation,
            Self::NotPrepared { .. } => ErrorKind::Usage,
        }
    }
}
