use std::io::{BufReader, Read};
use std::path::Path;

use flate2::bufread::GzDecoder;
use fs_err::File;

use archbench_fs::Simplified;

use crate::{ArchiveFormat, Error};

/// Read every file entry of the archive at `path`, in stored order.
///
/// Directory entries are skipped.
pub fn read_entries(
    path: impl AsRef<Path>,
    format: ArchiveFormat,
) -> Result<Vec<(String, Vec<u8>)>, Error> {
    let path = path.as_ref();
    let mut entries = Vec::new();
    match format {
        ArchiveFormat::Zip => {
            let zip_err = |err| Error::ZipRead(path.to_path_buf(), err);
            let mut archive = zip::ZipArchive::new(File::open(path)?).map_err(zip_err)?;
            for index in 0..archive.len() {
                let mut file = archive.by_index(index).map_err(zip_err)?;
                if file.is_dir() {
                    continue;
                }
                let name = file.name().to_string();
                let mut contents = Vec::new();
                file.read_to_end(&mut contents)?;
                entries.push((name, contents));
            }
        }
        ArchiveFormat::TarGz => {
            let reader = BufReader::new(File::open(path)?);
            let mut archive = tar::Archive::new(GzDecoder::new(reader));
            let read_err = |err| Error::TarRead(path.to_path_buf(), err);
            for entry in archive.entries().map_err(read_err)? {
                let mut entry = entry.map_err(read_err)?;
                if entry.header().entry_type().is_dir() {
                    continue;
                }
                let name = entry
                    .path()
                    .map_err(read_err)?
                    .portable_display()
                    .into_owned();
                let mut contents = Vec::new();
                entry.read_to_end(&mut contents).map_err(read_err)?;
                entries.push((name, contents));
            }
        }
    }
    Ok(entries)
}
