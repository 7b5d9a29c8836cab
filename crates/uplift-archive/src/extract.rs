use std::fs::{self, File};
use std::io;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::entry::{Entry, EntryKind, ExtractReport};
use crate::error::{Error, Result};
use crate::sanitize::sanitize_entry_path;

/// Unpack a gzip-compressed tar archive beneath `dest_root`.
///
/// Entries are processed in archive order: directories are created when
/// absent, regular files are written with the mode from their header, and
/// anything else (symlinks, devices) is recorded but skipped. Missing
/// parent directories are created on demand, so archives that omit
/// directory records still extract.
///
/// The first failure aborts extraction and leaves whatever was already
/// written beneath `dest_root`. Callers that need atomicity extract into
/// a scratch directory and promote it afterwards.
pub fn extract_archive(
    archive_path: impl AsRef<Path>,
    dest_root: impl AsRef<Path>,
) -> Result<ExtractReport> {
    let archive_path = archive_path.as_ref();
    let dest_root = dest_root.as_ref();

    let file = File::open(archive_path).map_err(|source| Error::Open {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    let mut report = ExtractReport::default();

    for entry in archive.entries().map_err(|e| corrupted(archive_path, e))? {
        let mut entry = entry.map_err(|e| corrupted(archive_path, e))?;

        let raw_path = entry
            .path()
            .map_err(|e| corrupted(archive_path, e))?
            .into_owned();
        let sanitized = sanitize_entry_path(&raw_path, dest_root)?;
        if sanitized.relative.as_os_str().is_empty() {
            // `./`, the extraction root itself
            continue;
        }

        let header = entry.header();
        let kind = classify(header.entry_type());
        let mode = header.mode().map_err(|e| corrupted(archive_path, e))?;

        let size = match kind {
            EntryKind::Directory => {
                ensure_dir(&sanitized.resolved)?;
                0
            }
            EntryKind::File => write_file(&mut entry, &sanitized.resolved, mode)?,
            EntryKind::Other => 0,
        };

        debug!(
            path = %sanitized.relative.display(),
            kind = ?kind,
            size,
            "archive entry"
        );

        report.total_bytes += size;
        report.entries.push(Entry {
            relative_path: sanitized.relative,
            kind,
            mode,
            size,
        });
    }

    Ok(report)
}

fn corrupted(path: &Path, source: io::Error) -> Error {
    Error::Corrupted {
        path: path.to_path_buf(),
        source,
    }
}

fn classify(entry_type: tar::EntryType) -> EntryKind {
    if entry_type.is_dir() {
        EntryKind::Directory
    } else if entry_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|source| Error::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Write one regular file record, creating missing parents, and apply the
/// header mode once the contents are on disk.
fn write_file(entry: &mut impl io::Read, path: &Path, mode: u32) -> Result<u64> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let mut file = File::create(path).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let written = io::copy(entry, &mut file).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    drop(file);

    apply_mode(path, mode)?;
    Ok(written)
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
