//! Tar.gz extraction with path sanitization.
//!
//! The extractor walks a gzip-compressed tar stream record by record,
//! vets every entry path against the extraction root, and materializes
//! directories and regular files beneath it. Anything else in the
//! archive (symlinks, devices) is reported but not written.
//!
//! # Architecture
//!
//! - `sanitize.rs` - entry path normalization and escape rejection
//! - `extract.rs` - the gzip/tar record loop
//! - `entry.rs` - record classification and the extraction report
//!
//! ```no_run
//! use uplift_archive::extract_archive;
//!
//! let report = extract_archive("update.tar.gz", "/srv/unpack")?;
//! println!("{} entries, {} bytes", report.entries.len(), report.total_bytes);
//! # Ok::<(), uplift_archive::Error>(())
//! ```

pub use entry::{Entry, EntryKind, ExtractReport};
pub use error::{Error, Result};
pub use extract::extract_archive;
pub use sanitize::{SanitizedPath, sanitize_entry_path};

pub mod entry;
mod error;
mod extract;
mod sanitize;
