use std::io;
use std::io::{BufReader, Cursor, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use fs_err::File;
use tar::Header;
use tracing::trace;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use archbench_fs::Simplified;

use crate::{ArchiveFormat, Error};

/// Dispatcher between the supported archive formats.
///
/// All entry names are `/`-separated strings, independent of the platform.
///
/// Contract: You must call close before dropping to obtain a valid output (dropping is fine in the
/// error case).
pub(crate) trait EntryWriter {
    /// Add an entry with the given content.
    fn write_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<(), Error>;

    /// Add an entry with the content of a local file.
    fn write_file(&mut self, name: &str, file: &Path) -> Result<(), Error>;

    /// Write the trailing metadata (the central directory or the end-of-archive marker).
    fn close(self) -> Result<(), Error>
    where
        Self: Sized;
}

/// Open a writer for `path`, run `op` against it and finish the archive.
///
/// If `path` already exists, zip archives are appended to, while other formats are rejected.
pub(crate) fn write_archive<T>(
    path: &Path,
    format: ArchiveFormat,
    op: impl FnOnce(&mut dyn EntryWriter) -> Result<T, Error>,
) -> Result<T, Error> {
    let append = path.is_file();
    match format {
        ArchiveFormat::Zip => {
            let mut writer = ZipEntryWriter::open(path, append)?;
            let output = op(&mut writer)?;
            writer.close()?;
            Ok(output)
        }
        ArchiveFormat::TarGz => {
            if append {
                return Err(Error::AppendUnsupported {
                    format,
                    path: path.to_path_buf(),
                });
            }
            let mut writer = TarGzEntryWriter::new(path)?;
            let output = op(&mut writer)?;
            writer.close()?;
            Ok(output)
        }
    }
}

struct ZipEntryWriter {
    zip: ZipWriter<File>,
    options: SimpleFileOptions,
}

impl ZipEntryWriter {
    fn open(path: &Path, append: bool) -> Result<Self, Error> {
        let zip = if append {
            trace!("Appending to {}", path.user_display());
            let file = fs_err::OpenOptions::new().read(true).write(true).open(path)?;
            ZipWriter::new_append(file)?
        } else {
            ZipWriter::new(File::create(path)?)
        };
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .unix_permissions(0o644);
        Ok(Self { zip, options })
    }
}

impl EntryWriter for ZipEntryWriter {
    fn write_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<(), Error> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(bytes)?;
        Ok(())
    }

    fn write_file(&mut self, name: &str, file: &Path) -> Result<(), Error> {
        self.zip.start_file(name, self.options)?;
        let mut reader = File::open(file)?;
        io::copy(&mut reader, &mut self.zip)?;
        Ok(())
    }

    fn close(self) -> Result<(), Error> {
        self.zip.finish()?;
        Ok(())
    }
}

struct TarGzEntryWriter {
    path: PathBuf,
    tar: tar::Builder<GzEncoder<File>>,
}

impl TarGzEntryWriter {
    fn new(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let file = File::create(&path)?;
        let enc = GzEncoder::new(file, Compression::default());
        let tar = tar::Builder::new(enc);
        Ok(Self { path, tar })
    }
}

impl EntryWriter for TarGzEntryWriter {
    fn write_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<(), Error> {
        let mut header = Header::new_gnu();
        header.set_size(bytes.len() as u64);
        // Reasonable default to avoid 0o000 permissions, the user's umask will be applied on
        // unpacking.
        header.set_mode(0o644);
        self.tar
            .append_data(&mut header, name, Cursor::new(bytes))
            .map_err(|err| Error::TarWrite(self.path.clone(), err))?;
        Ok(())
    }

    fn write_file(&mut self, name: &str, file: &Path) -> Result<(), Error> {
        let metadata = fs_err::metadata(file)?;
        let mut header = Header::new_gnu();
        // Preserve the executable bit, especially for scripts
        #[cfg(unix)]
        let executable_bit = {
            use std::os::unix::fs::PermissionsExt;
            metadata.permissions().mode() & 0o111 != 0
        };
        // Windows has no executable bit
        #[cfg(not(unix))]
        let executable_bit = false;

        if executable_bit {
            header.set_mode(0o755);
        } else {
            header.set_mode(0o644);
        }
        header.set_size(metadata.len());
        let reader = BufReader::new(File::open(file)?);
        self.tar
            .append_data(&mut header, name, reader)
            .map_err(|err| Error::TarWrite(self.path.clone(), err))?;
        Ok(())
    }

    fn close(self) -> Result<(), Error> {
        let encoder = self
            .tar
            .into_inner()
            .map_err(|err| Error::TarWrite(self.path.clone(), err))?;
        encoder
            .finish()
            .map_err(|err| Error::TarWrite(self.path.clone(), err))?;
        Ok(())
    }
}
