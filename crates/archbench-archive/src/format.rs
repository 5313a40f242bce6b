use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The on-disk format of an archive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ArchiveFormat {
    /// A zip archive with deflate-compressed entries.
    #[default]
    #[cfg_attr(feature = "clap", value(name = "zip"))]
    Zip,
    /// A gzip-compressed tar archive.
    #[cfg_attr(feature = "clap", value(name = "tar.gz"))]
    TarGz,
}

impl ArchiveFormat {
    /// The file extension for archives of this format, without a leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Error)]
#[error("Unknown archive format `{0}`, expected `zip` or `tar.gz`")]
pub struct UnknownArchiveFormat(String);

impl FromStr for ArchiveFormat {
    type Err = UnknownArchiveFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zip" => Ok(Self::Zip),
            "tar.gz" | "tgz" => Ok(Self::TarGz),
            _ => Err(UnknownArchiveFormat(s.to_string())),
        }
    }
}
