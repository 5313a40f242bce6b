use std::path::{Path, PathBuf};

use archbench_archive::ArchiveFormat;
use archbench_static::EnvVars;

use crate::Error;

const ROOT_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../");

/// The fixed locations and flags a benchmark run depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchSettings {
    /// The directory archives are built from.
    pub source_dir: PathBuf,
    /// The directory archives are written to.
    pub destination_dir: PathBuf,
    pub format: ArchiveFormat,
    /// Whether a profiler is attached to the process.
    pub profiling: bool,
    /// Whether archive targets are forced to be read-only.
    pub archive_readonly: bool,
}

impl Default for BenchSettings {
    /// `dist/source` and `dist/build-from-dir` at the root of the workspace.
    fn default() -> Self {
        let dist = Path::new(ROOT_DIR).join("dist");
        Self {
            source_dir: dist.join("source"),
            destination_dir: dist.join("build-from-dir"),
            format: ArchiveFormat::default(),
            profiling: false,
            archive_readonly: false,
        }
    }
}

impl BenchSettings {
    /// Read the settings from the environment, falling back to the defaults.
    pub fn from_env() -> Result<Self, Error> {
        let defaults = Self::default();
        let format = match std::env::var(EnvVars::ARCHBENCH_FORMAT) {
            Ok(value) => {
                value
                    .parse()
                    .map_err(|err: archbench_archive::UnknownArchiveFormat| {
                        Error::InvalidEnvironmentVariable {
                            name: EnvVars::ARCHBENCH_FORMAT.to_string(),
                            value: value.clone(),
                            err: err.to_string(),
                        }
                    })?
            }
            Err(std::env::VarError::NotPresent) => defaults.format,
            Err(std::env::VarError::NotUnicode(value)) => {
                return Err(Error::InvalidEnvironmentVariable {
                    name: EnvVars::ARCHBENCH_FORMAT.to_string(),
                    value: value.to_string_lossy().to_string(),
                    err: "expected a valid UTF-8 string".to_string(),
                });
            }
        };

        Ok(Self {
            source_dir: std::env::var_os(EnvVars::ARCHBENCH_SOURCE_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.source_dir),
            destination_dir: std::env::var_os(EnvVars::ARCHBENCH_DESTINATION_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.destination_dir),
            format,
            profiling: boolish_env_var(EnvVars::ARCHBENCH_PROFILING)?
                .unwrap_or(defaults.profiling),
            archive_readonly: boolish_env_var(EnvVars::ARCHBENCH_ARCHIVE_READONLY)?
                .unwrap_or(defaults.archive_readonly),
        })
    }
}

/// Read a boolean flag from the environment.
///
/// Accepts the values of clap's `BoolishValueParser`, ignoring case: `y`, `yes`, `t`, `true`,
/// `on`, `1` and `n`, `no`, `f`, `false`, `off`, `0`.
fn boolish_env_var(name: &'static str) -> Result<Option<bool>, Error> {
    let Some(value) = std::env::var_os(name) else {
        return Ok(None);
    };
    let invalid = |value: String, err: &str| Error::InvalidEnvironmentVariable {
        name: name.to_string(),
        value,
        err: err.to_string(),
    };

    let Some(value) = value.to_str() else {
        return Err(invalid(
            value.to_string_lossy().into_owned(),
            "expected a valid UTF-8 string",
        ));
    };
    match value.to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(Some(true)),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(Some(false)),
        _ => Err(invalid(value.to_string(), "expected a boolish value")),
    }
}
