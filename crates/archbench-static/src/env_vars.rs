/// Declares all environment variables used throughout `archbench` and its crates.
pub struct EnvVars;

impl EnvVars {
    /// The directory the benchmarks read source files from.
    ///
    /// Defaults to `dist/source` at the root of the workspace.
    pub const ARCHBENCH_SOURCE_DIR: &'static str = "ARCHBENCH_SOURCE_DIR";

    /// The directory generated archives are written to.
    ///
    /// Defaults to `dist/build-from-dir` at the root of the workspace. The directory is created
    /// if it doesn't exist.
    pub const ARCHBENCH_DESTINATION_DIR: &'static str = "ARCHBENCH_DESTINATION_DIR";

    /// The archive format to build, either `zip` or `tar.gz`.
    pub const ARCHBENCH_FORMAT: &'static str = "ARCHBENCH_FORMAT";

    /// Signals that a profiler is attached to the process.
    ///
    /// Timings taken under a profiler are not representative, so benchmark setup refuses to run
    /// while this is set to a truthy value.
    pub const ARCHBENCH_PROFILING: &'static str = "ARCHBENCH_PROFILING";

    /// Forces archive targets to be read-only.
    ///
    /// Benchmark setup refuses to run while this is set to a truthy value, since no archive
    /// could be written.
    pub const ARCHBENCH_ARCHIVE_READONLY: &'static str = "ARCHBENCH_ARCHIVE_READONLY";

    /// The number of iterations `archbench run` performs per benchmark case.
    pub const ARCHBENCH_ITERATIONS: &'static str = "ARCHBENCH_ITERATIONS";

    /// Used to set the log level, e.g., `RUST_LOG=archbench=debug`.
    pub const RUST_LOG: &'static str = "RUST_LOG";
}
