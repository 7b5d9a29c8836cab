use uplift_fetch::FetchError;
use uplift_fs::SwapError;
use uplift_verify::VerifyError;

use crate::pipeline::PayloadError;

pub const EXIT_OK: i32 = 0;
pub const EXIT_CONFIG: i32 = 1;
pub const EXIT_INTEGRITY: i32 = 2;
pub const EXIT_DOWNLOAD: i32 = 3;
pub const EXIT_EXTRACT: i32 = 4;
pub const EXIT_SWAP: i32 = 5;

/// One variant per pipeline stage. Only `main` maps these to exit codes;
/// everything below it propagates typed errors.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("download failed")]
    Download(#[from] FetchError),

    #[error("archive failed integrity verification")]
    Verify(#[from] VerifyError),

    #[error("archive extraction failed")]
    Extract(#[from] uplift_archive::Error),

    #[error("could not determine the update payload")]
    Payload(#[from] PayloadError),

    #[error("live directory swap failed")]
    Swap(#[from] SwapError),
}

impl UpdateError {
    /// Stage label used in diagnostics.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Download(_) => "download",
            Self::Verify(_) => "verify",
            Self::Extract(_) | Self::Payload(_) => "extract",
            Self::Swap(_) => "swap",
        }
    }

    /// Process exit code for this failure class.
    ///
    /// Swap failures get their own code so operators can tell "update
    /// content invalid" from "service directory in unknown state".
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Download(_) => EXIT_DOWNLOAD,
            Self::Verify(VerifyError::Mismatch { .. }) => EXIT_INTEGRITY,
            // The downloaded artifact could not be re-read.
            Self::Verify(VerifyError::Io(_)) => EXIT_DOWNLOAD,
            Self::Extract(_) | Self::Payload(_) => EXIT_EXTRACT,
            Self::Swap(_) => EXIT_SWAP,
        }
    }
}
