use std::path::PathBuf;
use std::time::{Duration, Instant};

use anstream::println;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use owo_colors::OwoColorize;
use tracing::info;

use archbench_archive::ArchiveFormat;
use archbench_bench::{
    BenchCase, BenchSettings, BuildFromDir, BuildFromStringWithBuffering, DEFAULT_ITERATIONS,
};
use archbench_fs::Simplified;
use archbench_static::EnvVars;

#[derive(Args)]
pub(crate) struct RunArgs {
    /// The benchmark cases to run, all of them by default.
    #[arg(long = "case", value_enum)]
    cases: Vec<CaseName>,

    /// The number of iterations per case.
    #[arg(long, default_value_t = DEFAULT_ITERATIONS, env = EnvVars::ARCHBENCH_ITERATIONS)]
    iterations: usize,

    /// The directory archives are built from.
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// The directory archives are written to.
    #[arg(long)]
    dest_dir: Option<PathBuf>,

    /// The archive format to build.
    #[arg(long, value_enum)]
    format: Option<ArchiveFormat>,
}

impl RunArgs {
    /// Settings from the environment, overridden by the command line.
    fn settings(&self) -> Result<BenchSettings> {
        let mut settings = BenchSettings::from_env()?;
        if let Some(source_dir) = &self.source_dir {
            settings.source_dir.clone_from(source_dir);
        }
        if let Some(dest_dir) = &self.dest_dir {
            settings.destination_dir.clone_from(dest_dir);
        }
        if let Some(format) = self.format {
            settings.format = format;
        }
        Ok(settings)
    }

    fn cases(&self) -> Vec<CaseName> {
        if self.cases.is_empty() {
            CaseName::value_variants().to_vec()
        } else {
            self.cases.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CaseName {
    /// Build the archive from the source directory in one call.
    BuildFromDir,
    /// Add every source file to a buffered transaction.
    BuildFromStringWithBuffering,
}

impl CaseName {
    fn case(self, settings: BenchSettings) -> Box<dyn BenchCase> {
        match self {
            Self::BuildFromDir => Box::new(BuildFromDir::new(settings)),
            Self::BuildFromStringWithBuffering => {
                Box::new(BuildFromStringWithBuffering::new(settings))
            }
        }
    }
}

pub(crate) fn run(args: RunArgs) -> Result<()> {
    let settings = args.settings()?;
    info!(
        "Building {} archives from `{}`",
        settings.format,
        settings.source_dir.user_display()
    );

    for name in args.cases() {
        let mut case = name.case(settings.clone());
        for iteration in 1..=args.iterations {
            let elapsed = run_iteration(case.as_mut())
                .with_context(|| format!("Iteration {iteration} of `{}` failed", case.name()))?;
            println!(
                "{} {iteration}/{}: {}",
                case.name().bold(),
                args.iterations,
                format!("{:.3}ms", elapsed.as_secs_f64() * 1000.0).cyan()
            );
        }
    }
    Ok(())
}

/// Run a single setup, timed operation and teardown, returning the time of the operation.
fn run_iteration(case: &mut dyn BenchCase) -> Result<Duration, archbench_bench::Error> {
    let result = case.setup().and_then(|()| {
        let start = Instant::now();
        case.bench()?;
        Ok(start.elapsed())
    });
    case.teardown();
    result
}
