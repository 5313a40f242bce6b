use std::path::Path;

use tracing::debug;

use crate::lifecycle::CaseCore;
use crate::{BenchCase, BenchSettings, CaseState, Error};

/// Build an archive from the whole source directory in one call.
///
/// Entries are named by their path relative to the source directory.
#[derive(Debug)]
pub struct BuildFromDir {
    core: CaseCore,
}

impl BuildFromDir {
    pub const NAME: &'static str = "build-from-dir";

    pub fn new(settings: BenchSettings) -> Self {
        Self {
            core: CaseCore::new(Self::NAME, settings),
        }
    }

    /// The archive path of the current iteration, if one is prepared.
    pub fn destination(&self) -> Option<&Path> {
        self.core.destination()
    }
}

impl BenchCase for BuildFromDir {
    fn name(&self) -> &'static str {
        self.core.name()
    }

    fn state(&self) -> CaseState {
        self.core.state()
    }

    fn setup(&mut self) -> Result<(), Error> {
        self.core.prepare_environment()?;
        self.core.prepare_destination();
        Ok(())
    }

    fn bench(&mut self) -> Result<(), Error> {
        self.core.run(|archive, settings| {
            let files = archive.build_from_directory(&settings.source_dir)?;
            debug!("Archived {} files", files.len());
            Ok(())
        })
    }

    fn teardown(&mut self) {
        self.core.teardown();
    }
}
