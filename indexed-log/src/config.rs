//! Configuration for indexed log files.

use std::path::PathBuf;

/// Options controlling where log/sidecar pairs live and how the index is
/// written.
///
/// One `LogFileOptions` value describes a deployment root; every engine and
/// query constructed from it resolves `${root}/${fid}.log` and
/// `${root}/${fid}.idx` the same way.
///
/// # Example
///
/// ```
/// use indexed_log::LogFileOptions;
///
/// let opts = LogFileOptions::new("/tmp/indexed-log");
/// assert_eq!(opts.bytes_per_node, 32 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileOptions {
    /// Directory holding all `(log, sidecar)` pairs.
    pub root: PathBuf,

    /// Minimum number of record bytes that must accumulate between sync
    /// points.
    ///
    /// Larger values make the index sparser: fewer nodes per file, wider byte
    /// windows per query. Sync-point offsets are floored to a multiple of
    /// this value so mapped reads start on a record-friendly alignment.
    pub bytes_per_node: i64,

    /// Arity hint for the ordered map holding the index.
    ///
    /// Retained for configuration compatibility; the standard-library B-tree
    /// fixes its own branching factor, so this knob is advisory.
    pub tree_depth: i32,
}

impl LogFileOptions {
    /// Creates options for the given root with default index tuning.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            bytes_per_node: 32 * 1024,
            tree_depth: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_32k_sync_interval() {
        // given/when
        let opts = LogFileOptions::new("/tmp/logs");

        // then
        assert_eq!(opts.root, PathBuf::from("/tmp/logs"));
        assert_eq!(opts.bytes_per_node, 32_768);
        assert_eq!(opts.tree_depth, 2);
    }
}
