//! Benchmark cases for building archives from a source directory.
//!
//! Each case implements [`BenchCase`]: a harness calls [`BenchCase::setup`], times
//! [`BenchCase::bench`] and calls [`BenchCase::teardown`], once per iteration.

pub use build_from_dir::BuildFromDir;
pub use build_from_string::{BuildFromStringWithBuffering, SourceFile, collect_source_files};
pub use destination::{Destination, create_destination_directory, destination_path};
pub use error::{Error, ErrorKind};
pub use lifecycle::{BenchCase, CaseState};
pub use precondition::{Precondition, check_preconditions};
pub use settings::BenchSettings;

mod build_from_dir;
mod build_from_string;
mod destination;
mod error;
mod lifecycle;
mod precondition;
mod settings;

/// The number of iterations per case in the reference configuration.
pub const DEFAULT_ITERATIONS: usize = 10;
