use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::info;
use uplift_verify::{Hasher, Sha256Hasher};

use crate::error::{FetchError, Result};
use crate::http::HttpClient;

/// Outcome of a completed download.
#[derive(Clone, Debug)]
pub struct DownloadResult {
    /// Where the body was written.
    pub path: PathBuf,
    /// Lowercase hex digest of the bytes as they streamed through.
    ///
    /// Reported for observability only; verification re-reads the file
    /// from disk rather than trusting this value.
    pub digest: String,
}

/// Streaming downloader that hashes the body in the same pass it writes it.
pub struct Fetcher<C> {
    client: C,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Download `url` into `dest`, truncating any existing file.
    ///
    /// Each body chunk feeds the hasher and the file in turn, so memory
    /// stays bounded regardless of payload size. On error the partially
    /// written file is left in place; a retrying caller truncates it on
    /// the next attempt.
    pub async fn download(&self, dest: impl AsRef<Path>, url: &str) -> Result<DownloadResult> {
        let dest = dest.as_ref();

        let mut stream = self
            .client
            .get(url)
            .await
            .map_err(|source| FetchError::transport(url, source))?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|source| write_error(dest, source))?;
        let mut hasher = Sha256Hasher::new();
        let mut bytes_written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| FetchError::transport(url, source))?;
            hasher.update(&chunk);
            file.write_all(&chunk)
                .await
                .map_err(|source| write_error(dest, source))?;
            bytes_written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|source| write_error(dest, source))?;

        let digest = hex::encode(hasher.finalize());
        info!(url, path = %dest.display(), bytes = bytes_written, %digest, "download complete");

        Ok(DownloadResult {
            path: dest.to_path_buf(),
            digest,
        })
    }
}

fn write_error(path: &Path, source: std::io::Error) -> FetchError {
    FetchError::Io {
        path: path.to_path_buf(),
        source,
    }
}
