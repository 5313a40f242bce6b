use std::path::Path;

use tracing::debug;

use archbench_discover::Finder;
use archbench_fs::Simplified;

use crate::lifecycle::CaseCore;
use crate::{BenchCase, BenchSettings, CaseState, Error};

/// A source file held in memory, named by its basename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub contents: Vec<u8>,
}

/// Read every file below `source_dir` into memory, in discovery order.
///
/// Dot files and version control metadata are included, unreadable directories are skipped.
/// Subdirectories are flattened: each file is named by its basename only.
pub fn collect_source_files(source_dir: &Path) -> Result<Vec<SourceFile>, Error> {
    let files = Finder::new(source_dir)
        .ignore_dot_files(false)
        .ignore_vcs(false)
        .ignore_unreadable_dirs(true)
        .files()
        .map(|file| {
            let file = file?;
            let contents = file
                .contents()
                .map_err(|err| Error::ReadSourceFile(file.path().to_path_buf(), err))?;
            Ok(SourceFile {
                name: file.file_name().into_owned(),
                contents,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    debug!(
        "Collected {} source files from: {}",
        files.len(),
        source_dir.user_display()
    );
    Ok(files)
}

/// Build an archive by adding in-memory files one at a time to a buffered transaction.
///
/// The files are read during setup so that only archive construction is timed.
#[derive(Debug)]
pub struct BuildFromStringWithBuffering {
    core: CaseCore,
    files: Vec<SourceFile>,
}

impl BuildFromStringWithBuffering {
    pub const NAME: &'static str = "build-from-string-with-buffering";

    pub fn new(settings: BenchSettings) -> Self {
        Self {
            core: CaseCore::new(Self::NAME, settings),
            files: Vec::new(),
        }
    }

    /// The archive path of the current iteration, if one is prepared.
    pub fn destination(&self) -> Option<&Path> {
        self.core.destination()
    }

    /// The files captured by the last setup.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }
}

impl BenchCase for BuildFromStringWithBuffering {
    fn name(&self) -> &'static str {
        self.core.name()
    }

    fn state(&self) -> CaseState {
        self.core.state()
    }

    fn setup(&mut self) -> Result<(), Error> {
        self.files.clear();
        self.core.prepare_environment()?;
        self.files = collect_source_files(&self.core.settings().source_dir)?;
        self.core.prepare_destination();
        Ok(())
    }

    fn bench(&mut self) -> Result<(), Error> {
        let files = &self.files;
        self.core.run(|archive, _| {
            let mut buffer = archive.start_buffering();
            for file in files {
                buffer.add_from_bytes(&file.name, file.contents.as_slice())?;
            }
            buffer.commit()
        })
    }

    fn teardown(&mut self) {
        self.core.teardown();
        self.files.clear();
    }
}
