//! Digest primitives and artifact verification.
//!
//! Provides incremental SHA-256 hashing behind a minimal [`Hasher`] trait,
//! a read-tee ([`HashingReader`]) that digests bytes in the same pass that
//! consumes them, and [`verify_file`], which recomputes a file's digest from
//! scratch and compares it against an expected hex string.
//!
//! The downloader hashes the stream it writes; verification deliberately
//! does not trust that value and re-reads the file on disk.
//!
//! # Example
//!
//! ```
//! use uplift_verify::{Hasher, HashingReader, Sha256Hasher};
//!
//! let data = b"hello world";
//! let mut reader = HashingReader::new(&data[..], Sha256Hasher::new());
//! std::io::copy(&mut reader, &mut std::io::sink()).unwrap();
//! assert_eq!(reader.finish(), Sha256Hasher::digest(b"hello world"));
//! ```

pub use self::error::{Result, VerifyError};
pub use self::hasher::{Hasher, Sha256Hasher};
pub use self::reader::HashingReader;

mod error;
mod hasher;
mod reader;

use std::fs::File;
use std::io;
use std::path::Path;

/// Recompute the digest of `path` and compare it to `expected_hex`.
///
/// Both sides are normalized (surrounding whitespace trimmed, hex lowered)
/// before the exact comparison. The file is only read, never modified.
///
/// # Errors
///
/// [`VerifyError::Mismatch`] when the digests differ — callers treat this as
/// fatal and non-retryable. [`VerifyError::Io`] when the file cannot be read.
pub fn verify_file(path: impl AsRef<Path>, expected_hex: &str) -> Result<()> {
    let file = File::open(path.as_ref())?;
    let mut reader = HashingReader::new(file, Sha256Hasher::new());
    io::copy(&mut reader, &mut io::sink())?;

    let actual = hex::encode(reader.finish());
    let expected = normalize_hex(expected_hex);
    if actual != expected {
        return Err(VerifyError::Mismatch { expected, actual });
    }
    Ok(())
}

fn normalize_hex(digest: &str) -> String {
    digest.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact");
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        (dir, path)
    }

    #[test]
    fn matching_digest_passes() {
        let (_dir, path) = write_temp(b"payload bytes");
        let expected = hex::encode(Sha256Hasher::digest(b"payload bytes"));
        verify_file(&path, &expected).unwrap();
    }

    #[test]
    fn mismatch_reports_both_digests() {
        let (_dir, path) = write_temp(b"payload bytes");
        let wrong = "0".repeat(64);

        let err = verify_file(&path, &wrong).unwrap_err();
        match err {
            VerifyError::Mismatch { expected, actual } => {
                assert_eq!(expected, wrong);
                assert_eq!(actual, hex::encode(Sha256Hasher::digest(b"payload bytes")));
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn expected_digest_is_normalized() {
        let (_dir, path) = write_temp(b"payload bytes");
        let expected = hex::encode(Sha256Hasher::digest(b"payload bytes"));
        let noisy = format!("  {}\n", expected.to_ascii_uppercase());
        verify_file(&path, &noisy).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = verify_file(dir.path().join("nope"), "00").unwrap_err();
        assert!(matches!(err, VerifyError::Io(_)));
    }
}
