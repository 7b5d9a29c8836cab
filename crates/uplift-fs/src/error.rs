use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("failed to remove stale backup '{path}': {source}")]
    ClearBackup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to retire live directory '{live}' to '{backup}': {source}")]
    Retire {
        live: PathBuf,
        backup: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to promote '{incoming}' to '{live}'; previous contents restored from backup: {source}")]
    Promote {
        incoming: PathBuf,
        live: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "live directory '{live}' is absent: promotion failed ({source}) and restoring '{backup}' \
         also failed ({restore}); manual intervention required"
    )]
    Unrecoverable {
        live: PathBuf,
        backup: PathBuf,
        #[source]
        source: io::Error,
        restore: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SwapError>;
