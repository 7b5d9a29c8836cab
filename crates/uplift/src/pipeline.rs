use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};
use uplift_archive::{ExtractReport, extract_archive};
use uplift_fetch::{Fetcher, HttpClient, RetryError, retry};
use uplift_fs::swap_dir;
use uplift_verify::verify_file;

use crate::config::UpdateRequest;
use crate::error::UpdateError;

/// Raised when the extracted tree does not contain exactly one top-level
/// directory to promote into the live path.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("archive contains no entries")]
    Empty,

    #[error("archive has multiple top-level entries: {names:?}")]
    Ambiguous { names: Vec<String> },

    #[error("top-level entry '{name}' is not a directory")]
    NotADirectory { name: String },
}

/// Outcome of a committed update.
#[derive(Debug)]
pub struct UpdateOutcome {
    /// The extracted directory that was promoted into the live path.
    pub payload: PathBuf,
    /// Where the previous live tree was retired to.
    pub backup: PathBuf,
}

/// Run the full update: download (with retry), verify, extract, swap,
/// clean up the archive.
///
/// Stages run strictly in order on the caller's task; the first failure
/// aborts the remainder, so the live directory is only ever touched after
/// a verified archive has been fully extracted.
pub async fn run<C: HttpClient>(
    client: C,
    request: &UpdateRequest,
) -> Result<UpdateOutcome, UpdateError> {
    let fetcher = Fetcher::new(client);

    // Every download failure counts as transient here; nothing before
    // verification is known to be unrecoverable.
    let fetcher = &fetcher;
    let archive = request.archive_path.as_path();
    let url = request.source_url.as_str();
    let downloaded = retry(&request.retry, move || async move {
        fetcher
            .download(archive, url)
            .await
            .map_err(RetryError::Transient)
    })
    .await
    .map_err(UpdateError::Download)?;
    info!(digest = %downloaded.digest, "archive downloaded");

    verify_file(&request.archive_path, &request.expected_digest)?;
    info!("integrity verified");

    let report = extract_archive(&request.archive_path, &request.extract_root)?;
    info!(
        entries = report.entries.len(),
        bytes = report.total_bytes,
        "archive extracted"
    );

    let payload_name = payload_name(&report)?;
    let payload = request.extract_root.join(&payload_name);
    if !payload.is_dir() {
        return Err(PayloadError::NotADirectory { name: payload_name }.into());
    }

    let backup = swap_dir(&request.live_path, &payload)?;
    info!(
        live = %request.live_path.display(),
        backup = %backup.display(),
        "live directory swapped"
    );

    // The update is committed at this point; a leftover archive is worth
    // a warning, not a failed run.
    if let Err(e) = fs::remove_file(&request.archive_path) {
        warn!(
            path = %request.archive_path.display(),
            error = %e,
            "failed to remove downloaded archive"
        );
    }

    Ok(UpdateOutcome { payload, backup })
}

/// The unique top-level name among the extracted entries.
fn payload_name(report: &ExtractReport) -> Result<String, PayloadError> {
    let mut names: Vec<String> = Vec::new();
    for entry in &report.entries {
        if let Some(first) = entry.relative_path.components().next() {
            let name = first.as_os_str().to_string_lossy().into_owned();
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    match names.len() {
        0 => Err(PayloadError::Empty),
        1 => Ok(names.remove(0)),
        _ => Err(PayloadError::Ambiguous { names }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpdateMode;
    use crate::error::{EXIT_DOWNLOAD, EXIT_EXTRACT, EXIT_INTEGRITY};

    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use bytes::Bytes;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use futures_util::stream;
    use tempfile::tempdir;
    use uplift_fetch::{BoxStream, RetryPolicy};
    use uplift_verify::Sha256Hasher;

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    struct MockError(&'static str);

    /// Serves one in-memory body and counts how often it was asked.
    struct MockClient {
        body: Arc<Vec<u8>>,
        calls: Arc<AtomicU32>,
        refuse: bool,
    }

    impl MockClient {
        fn serving(body: Vec<u8>) -> Self {
            Self {
                body: Arc::new(body),
                calls: Arc::new(AtomicU32::new(0)),
                refuse: false,
            }
        }
    }

    impl HttpClient for MockClient {
        type Error = MockError;

        async fn get(
            &self,
            _url: &str,
        ) -> Result<BoxStream<'static, Result<Bytes, MockError>>, MockError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.refuse {
                return Err(MockError("connection refused"));
            }
            let chunks: Vec<Result<Bytes, MockError>> = self
                .body
                .chunks(16)
                .map(|c| Ok(Bytes::copy_from_slice(c)))
                .collect();
            Ok(Box::pin(stream::iter(chunks)))
        }
    }

    struct FixtureBuilder {
        builder: tar::Builder<GzEncoder<Vec<u8>>>,
    }

    impl FixtureBuilder {
        fn new() -> Self {
            let encoder = GzEncoder::new(Vec::new(), Compression::default());
            Self {
                builder: tar::Builder::new(encoder),
            }
        }

        fn dir(mut self, path: &str) -> Self {
            let mut header = tar::Header::new_gnu();
            header.set_entry_type(tar::EntryType::Directory);
            header.set_size(0);
            header.set_mode(0o755);
            self.builder
                .append_data(&mut header, path, std::io::empty())
                .unwrap();
            self
        }

        fn file(mut self, path: &str, content: &[u8]) -> Self {
            let mut header = tar::Header::new_gnu();
            header.set_entry_type(tar::EntryType::Regular);
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            self.builder.append_data(&mut header, path, content).unwrap();
            self
        }

        fn build(self) -> Vec<u8> {
            self.builder.into_inner().unwrap().finish().unwrap()
        }
    }

    fn service_archive() -> Vec<u8> {
        FixtureBuilder::new()
            .dir("restapi/")
            .file("restapi/server.conf", b"port = 8080\n")
            .build()
    }

    fn request_for(root: &Path, body: &[u8]) -> UpdateRequest {
        UpdateRequest {
            source_url: "http://updates.test/app.tar.gz".to_string(),
            expected_digest: hex::encode(Sha256Hasher::digest(body)),
            extract_root: root.join("unpack"),
            live_path: root.join("live"),
            archive_path: root.join("update.tar.gz"),
            retry: RetryPolicy {
                max_attempts: 2,
                initial_delay: Duration::from_millis(1),
            },
            mode: UpdateMode::Replace,
            script: None,
        }
    }

    fn seed_live(request: &UpdateRequest) {
        fs::create_dir_all(&request.live_path).unwrap();
        fs::write(request.live_path.join("old.txt"), b"previous generation").unwrap();
    }

    #[tokio::test]
    async fn full_pipeline_commits_update() {
        let tmp = tempdir().unwrap();
        let body = service_archive();
        let request = request_for(tmp.path(), &body);
        seed_live(&request);

        let outcome = run(MockClient::serving(body), &request).await.unwrap();

        assert_eq!(
            fs::read(request.live_path.join("server.conf")).unwrap(),
            b"port = 8080\n"
        );
        assert!(!request.live_path.join("old.txt").exists());
        assert_eq!(outcome.backup, tmp.path().join("live.bak"));
        assert!(outcome.backup.join("old.txt").exists());
        // The promoted payload left the extraction root.
        assert!(!request.extract_root.join("restapi").exists());
        // Cleanup removed the archive.
        assert!(!request.archive_path.exists());
    }

    #[tokio::test]
    async fn digest_mismatch_aborts_before_extraction() {
        let tmp = tempdir().unwrap();
        let body = service_archive();
        let mut request = request_for(tmp.path(), &body);
        request.expected_digest = "0".repeat(64);
        seed_live(&request);

        let err = run(MockClient::serving(body), &request).await.unwrap_err();

        assert_eq!(err.exit_code(), EXIT_INTEGRITY);
        // The extraction root was never created and the live tree is intact.
        assert!(!request.extract_root.exists());
        assert!(request.live_path.join("old.txt").exists());
        // The archive stays on disk for inspection; only success removes it.
        assert!(request.archive_path.exists());
    }

    #[tokio::test]
    async fn refused_download_is_retried_then_surfaced() {
        let tmp = tempdir().unwrap();
        let request = request_for(tmp.path(), b"irrelevant");
        let client = MockClient {
            refuse: true,
            ..MockClient::serving(Vec::new())
        };
        let calls = Arc::clone(&client.calls);

        let err = run(client, &request).await.unwrap_err();

        assert_eq!(err.exit_code(), EXIT_DOWNLOAD);
        assert_eq!(err.stage(), "download");
        assert_eq!(calls.load(Ordering::SeqCst), request.retry.max_attempts);
    }

    #[tokio::test]
    async fn ambiguous_payload_is_rejected_before_swap() {
        let tmp = tempdir().unwrap();
        let body = FixtureBuilder::new()
            .dir("restapi/")
            .dir("docs/")
            .file("restapi/server.conf", b"port = 8080\n")
            .build();
        let request = request_for(tmp.path(), &body);
        seed_live(&request);

        let err = run(MockClient::serving(body), &request).await.unwrap_err();

        assert!(matches!(
            err,
            UpdateError::Payload(PayloadError::Ambiguous { .. })
        ));
        assert_eq!(err.exit_code(), EXIT_EXTRACT);
        assert!(request.live_path.join("old.txt").exists());
    }

    #[tokio::test]
    async fn flat_archive_payload_is_rejected() {
        let tmp = tempdir().unwrap();
        let body = FixtureBuilder::new().file("app.bin", b"binary").build();
        let request = request_for(tmp.path(), &body);
        seed_live(&request);

        let err = run(MockClient::serving(body), &request).await.unwrap_err();

        assert!(matches!(
            err,
            UpdateError::Payload(PayloadError::NotADirectory { .. })
        ));
        assert!(request.live_path.join("old.txt").exists());
    }
}
