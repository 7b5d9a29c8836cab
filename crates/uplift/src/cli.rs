use std::path::PathBuf;

use clap::Parser;

/// One-shot service update agent.
///
/// Downloads an archive, verifies its SHA-256 digest, extracts it, and
/// swaps the extracted payload directory into the live service path,
/// keeping one backup generation.
#[derive(Clone, Debug, Parser)]
#[command(name = "uplift", version, about, long_about = None)]
pub struct Cli {
    /// URL of the update archive (gzip-compressed tar)
    #[arg(long)]
    pub url: String,

    /// Expected SHA-256 digest of the archive, hex encoded
    #[arg(long)]
    pub digest: String,

    /// Directory the archive is unpacked into
    #[arg(long, default_value_os_t = std::env::temp_dir())]
    pub extract_root: PathBuf,

    /// Live service directory replaced by the update
    #[arg(long)]
    pub live_path: PathBuf,

    /// Update mode; "replace" is the only recognized value today
    #[arg(long, default_value = "replace")]
    pub mode: String,

    /// Reserved: relative path of a post-update script (parsed, not run)
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Download attempts before giving up
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,

    /// Initial retry delay in milliseconds; doubles after each failure
    #[arg(long, default_value_t = 1000)]
    pub retry_delay_ms: u64,
}
