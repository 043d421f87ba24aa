//! Error types for the indexed log.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the log engine and its read path.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An underlying file operation failed (open, read, write, fsync, mmap).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A sidecar file could not be decoded.
    ///
    /// The sidecar image has a fixed size; anything else is treated as
    /// unreadable rather than partially recovered.
    #[error("sidecar decode: expected {expected} bytes, found {found}")]
    SidecarSize { expected: usize, found: usize },

    /// A single record line failed to parse.
    ///
    /// During a window scan these are logged and skipped; the error is only
    /// surfaced when decoding a single line explicitly.
    #[error("record decode error: {0}")]
    RecordDecode(#[from] serde_json::Error),

    /// The in-memory index is at capacity and cannot accept another node.
    ///
    /// The writer is expected to rotate before reaching this point.
    #[error("time index full: {capacity} nodes; rotate before inserting more")]
    IndexFull { capacity: usize },
}
