use std::path::PathBuf;

/// One archive record as observed during extraction.
#[derive(Clone, Debug)]
pub struct Entry {
    /// Normalized path relative to the extraction root.
    pub relative_path: PathBuf,
    pub kind: EntryKind,
    /// Permission bits from the record header.
    pub mode: u32,
    /// Bytes written to disk for this record.
    pub size: u64,
}

impl Entry {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }
}

/// Classification of a record's type flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// Symlinks, devices and other special records. Recorded but never
    /// written to disk.
    Other,
}

/// Summary of one extraction run.
#[derive(Clone, Debug, Default)]
pub struct ExtractReport {
    /// Every record seen, in archive order.
    pub entries: Vec<Entry>,
    /// Total bytes written across all file records.
    pub total_bytes: u64,
}
