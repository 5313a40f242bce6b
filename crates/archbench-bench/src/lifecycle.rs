use std::fmt;
use std::path::Path;

use tracing::{debug, trace};

use archbench_archive::Archive;
use archbench_fs::Simplified;

use crate::{BenchSettings, Destination, Error, check_preconditions, create_destination_directory};

/// The lifecycle state of a [`BenchCase`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CaseState {
    #[default]
    Uninitialized,
    PreconditionsChecked,
    /// The archive handle is bound and the timed operation may run.
    ResourcesPrepared,
    OperationRunning,
    OperationComplete,
    OperationFailed,
    /// The archive handle was released and its file removed. A new iteration may start.
    ResourcesReleased,
}

impl fmt::Display for CaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::PreconditionsChecked => "preconditions-checked",
            Self::ResourcesPrepared => "resources-prepared",
            Self::OperationRunning => "operation-running",
            Self::OperationComplete => "operation-complete",
            Self::OperationFailed => "operation-failed",
            Self::ResourcesReleased => "resources-released",
        })
    }
}

/// A benchmark case, driven by a harness one iteration at a time.
///
/// An iteration is `setup`, the timed `bench`, then `teardown`. Only `bench` is measured.
pub trait BenchCase {
    /// The name used when reporting results.
    fn name(&self) -> &'static str;

    fn state(&self) -> CaseState;

    /// Check the environment and prepare a fresh archive destination.
    ///
    /// Resources left over from an iteration that was never torn down are released first.
    fn setup(&mut self) -> Result<(), Error>;

    /// Run the timed operation.
    ///
    /// Fails with [`Error::NotPrepared`] unless the last call to [`BenchCase::setup`] succeeded
    /// and nothing ran since.
    fn bench(&mut self) -> Result<(), Error>;

    /// Release the archive handle and remove the archive file. Never fails.
    fn teardown(&mut self);
}

/// The state and resources shared by every benchmark case.
#[derive(Debug)]
pub(crate) struct CaseCore {
    name: &'static str,
    settings: BenchSettings,
    state: CaseState,
    destination: Option<Destination>,
}

impl CaseCore {
    pub(crate) fn new(name: &'static str, settings: BenchSettings) -> Self {
        Self {
            name,
            settings,
            state: CaseState::Uninitialized,
            destination: None,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn settings(&self) -> &BenchSettings {
        &self.settings
    }

    pub(crate) fn state(&self) -> CaseState {
        self.state
    }

    pub(crate) fn destination(&self) -> Option<&Path> {
        self.destination.as_ref().map(Destination::path)
    }

    /// Check the preconditions and create the destination directory.
    pub(crate) fn prepare_environment(&mut self) -> Result<(), Error> {
        if let Some(destination) = self.destination.take() {
            debug!("Releasing resources of an iteration without teardown");
            destination.release();
        }
        self.state = CaseState::Uninitialized;

        check_preconditions(&self.settings)?;
        self.state = CaseState::PreconditionsChecked;

        create_destination_directory(&self.settings.destination_dir)
    }

    /// Bind the archive handle for the next timed operation.
    pub(crate) fn prepare_destination(&mut self) {
        debug_assert_eq!(self.state, CaseState::PreconditionsChecked);
        let destination = Destination::new(&self.settings);
        debug!(
            "Prepared `{}` with archive: {}",
            self.name,
            destination.path().user_display()
        );
        self.destination = Some(destination);
        self.state = CaseState::ResourcesPrepared;
    }

    /// Run the timed operation on the prepared archive.
    pub(crate) fn run(
        &mut self,
        operation: impl FnOnce(&mut Archive, &BenchSettings) -> Result<(), archbench_archive::Error>,
    ) -> Result<(), Error> {
        let (CaseState::ResourcesPrepared, Some(destination)) =
            (self.state, self.destination.as_mut())
        else {
            return Err(Error::NotPrepared {
                case: self.name,
                state: self.state,
            });
        };

        self.state = CaseState::OperationRunning;
        match operation(destination.archive_mut(), &self.settings) {
            Ok(()) => {
                self.state = CaseState::OperationComplete;
                Ok(())
            }
            Err(err) => {
                self.state = CaseState::OperationFailed;
                Err(Error::Archive(err))
            }
        }
    }

    pub(crate) fn teardown(&mut self) {
        if let Some(destination) = self.destination.take() {
            destination.release();
        }
        trace!("Released resources of `{}`", self.name);
        self.state = CaseState::ResourcesReleased;
    }
}

impl Drop for CaseCore {
    fn drop(&mut self) {
        if let Some(destination) = self.destination.take() {
            destination.release();
        }
    }
}
