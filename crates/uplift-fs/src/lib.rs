//! Directory swap primitives with single-generation backup retention.
//!
//! [`swap_dir`] replaces a live directory with a newly prepared one using
//! two renames, keeping exactly one backup generation at `<live>.bak`. The
//! two renames are not atomic as a pair; if the second one fails the
//! previous tree is restored from the backup before the error is surfaced,
//! so the live path never stays absent unless the restore itself fails
//! ([`SwapError::Unrecoverable`]).
//!
//! Renames do not cross filesystems; the incoming directory must live on
//! the same mount as the live path.

pub use self::error::{Result, SwapError};

mod error;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix appended to the live path to form the backup path.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Path holding the previous generation of `live` after a successful swap.
pub fn backup_path(live: &Path) -> PathBuf {
    let mut name = live.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Replace `live` with `incoming`, keeping the previous live contents at
/// `<live>.bak`. Returns the backup path on success.
///
/// Step order: discard any stale backup, rename `live` out of the way,
/// rename `incoming` into place. A failure before the first rename leaves
/// everything untouched; a failure of the second rename restores the old
/// tree from the backup before returning.
pub fn swap_dir(live: impl AsRef<Path>, incoming: impl AsRef<Path>) -> Result<PathBuf> {
    let live = live.as_ref();
    let incoming = incoming.as_ref();
    let backup = backup_path(live);

    // Single-generation retention: whatever backup exists is discarded now.
    match fs::remove_dir_all(&backup) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(SwapError::ClearBackup { path: backup, source }),
    }

    fs::rename(live, &backup).map_err(|source| SwapError::Retire {
        live: live.to_path_buf(),
        backup: backup.clone(),
        source,
    })?;

    if let Err(source) = fs::rename(incoming, live) {
        // The live path is absent right now; put the old tree back before
        // reporting so a failed update leaves the service intact.
        return Err(match fs::rename(&backup, live) {
            Ok(()) => SwapError::Promote {
                incoming: incoming.to_path_buf(),
                live: live.to_path_buf(),
                source,
            },
            Err(restore) => SwapError::Unrecoverable {
                live: live.to_path_buf(),
                backup,
                source,
                restore,
            },
        });
    }

    Ok(backup)
}
