//! Streaming HTTP download with retry orchestration.
//!
//! [`Fetcher`] writes a response body to disk while feeding the same bytes
//! through a SHA-256 hasher in a single pass; [`retry`] wraps any fallible
//! async operation in a bounded exponential-backoff loop where
//! [`RetryError::Permanent`] short-circuits the remaining attempts.
//!
//! The HTTP side sits behind the [`HttpClient`] trait so callers and tests
//! can run against in-memory clients; the production implementation is
//! [`ReqwestClient`] (feature `reqwest`, on by default).

pub use self::error::{FetchError, Result};
pub use self::fetcher::{DownloadResult, Fetcher};
pub use self::http::{BoxStream, HttpClient};
pub use self::retry::{RetryError, RetryPolicy, retry, retry_delay};

#[cfg(feature = "reqwest")]
pub use self::http::ReqwestClient;

mod error;
mod fetcher;
mod http;
mod retry;
