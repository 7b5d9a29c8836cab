use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use uplift_fetch::RetryPolicy;

use crate::cli::Cli;

/// Deterministic name the archive is downloaded to, relative to the
/// process working directory. Removed on overall success.
pub const ARCHIVE_NAME: &str = "update.tar.gz";

/// Immutable pipeline input, constructed once from the CLI and passed
/// explicitly into the driver; no component reads ambient global state.
#[derive(Clone, Debug)]
pub struct UpdateRequest {
    pub source_url: String,
    /// Expected SHA-256 of the archive, normalized to lowercase hex.
    pub expected_digest: String,
    pub extract_root: PathBuf,
    pub live_path: PathBuf,
    /// Where the archive lands before extraction.
    pub archive_path: PathBuf,
    pub retry: RetryPolicy,
    /// Reserved selector; the pipeline does not branch on it yet.
    pub mode: UpdateMode,
    /// Reserved post-update hook; parsed and carried, never executed.
    pub script: Option<PathBuf>,
}

/// Update-mode selector, kept as a documented extension point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateMode {
    #[default]
    Replace,
}

impl FromStr for UpdateMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Self::Replace),
            other => Err(ConfigError::Mode {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("digest '{value}' is not a 64-character hex string")]
    Digest { value: String },

    #[error("unknown update mode '{value}' (supported: replace)")]
    Mode { value: String },

    #[error("max attempts must be at least 1")]
    Attempts,
}

impl TryFrom<Cli> for UpdateRequest {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let digest = cli.digest.trim().to_ascii_lowercase();
        if digest.len() != 64 || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ConfigError::Digest { value: cli.digest });
        }
        if cli.max_attempts == 0 {
            return Err(ConfigError::Attempts);
        }
        let mode = cli.mode.parse()?;

        Ok(Self {
            source_url: cli.url,
            expected_digest: digest,
            extract_root: cli.extract_root,
            live_path: cli.live_path,
            archive_path: PathBuf::from(ARCHIVE_NAME),
            retry: RetryPolicy {
                max_attempts: cli.max_attempts,
                initial_delay: Duration::from_millis(cli.retry_delay_ms),
            },
            mode,
            script: cli.script,
        })
    }
}
