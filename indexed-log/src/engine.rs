//! The indexed log engine.
//!
//! An [`IndexedLogFile`] owns one `(log, sidecar)` pair: a file id, the
//! in-memory [`TimeIndex`], and the incremental flush cursor. The write path
//! inserts sync-point nodes and persists them with positional writes; the
//! read path resolves a time range to a byte window and maps it.
//!
//! # States
//!
//! - **Fresh**: no sidecar on disk yet; the first flush creates it with the
//!   full fixed-size image.
//! - **Active**: sidecar exists; flushes write only the node slots added
//!   since the last flush.
//! - **Sealed**: after [`rotate`](IndexedLogFile::rotate) the previous pair
//!   remains on disk, readable by any process via
//!   [`new_index_from_file`](IndexedLogFile::new_index_from_file).

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::PathBuf;

use memmap2::{Mmap, MmapOptions};
use uuid::Uuid;

use crate::config::LogFileOptions;
use crate::error::{Error, Result};
use crate::index::{Node, TimeIndex};
use crate::sidecar::{read_serialized_index, SerializedIndex, FID_SIZE, NODES_PER_FILE, NODE_SIZE};

/// The engine for one indexed log file.
pub struct IndexedLogFile {
    fid: Uuid,
    index: TimeIndex,
    opts: LogFileOptions,
    nodes_flushed: usize,
}

impl IndexedLogFile {
    /// Creates a Fresh engine with a random file id and an empty index.
    ///
    /// Nothing touches the disk until the first flush.
    pub fn new_index(opts: LogFileOptions) -> Self {
        Self {
            fid: Uuid::new_v4(),
            index: TimeIndex::new(),
            opts,
            nodes_flushed: 0,
        }
    }

    /// Restores an engine from the sidecar at `${root}/${fid}.idx`.
    ///
    /// The result is Active with its flush cursor at the number of nodes
    /// already on disk.
    pub fn new_index_from_file(fid: Uuid, opts: LogFileOptions) -> Result<Self> {
        let path = opts.root.join(format!("{fid}.idx"));
        let image = read_serialized_index(&path)?;
        Ok(image.deserialize(opts))
    }

    pub(crate) fn from_parts(
        fid: Uuid,
        index: TimeIndex,
        opts: LogFileOptions,
        nodes_flushed: usize,
    ) -> Self {
        Self {
            fid,
            index,
            opts,
            nodes_flushed,
        }
    }

    /// The current file id.
    pub fn fid(&self) -> Uuid {
        self.fid
    }

    /// The options this engine was built with.
    pub fn opts(&self) -> &LogFileOptions {
        &self.opts
    }

    /// The in-memory time index.
    pub fn index(&self) -> &TimeIndex {
        &self.index
    }

    /// Mutable access to the index, for callers that place nodes directly.
    ///
    /// Capacity enforcement lives in [`insert_node`](IndexedLogFile::insert_node);
    /// direct insertion past [`NODES_PER_FILE`] leaves nodes that will never
    /// reach the sidecar.
    pub fn index_mut(&mut self) -> &mut TimeIndex {
        &mut self.index
    }

    /// Number of node slots already persisted to the sidecar.
    pub fn nodes_flushed(&self) -> usize {
        self.nodes_flushed
    }

    /// Path of the log file for the current fid.
    pub fn log_path(&self) -> PathBuf {
        self.opts.root.join(format!("{}.log", self.fid))
    }

    /// Path of the sidecar file for the current fid.
    pub fn sidecar_path(&self) -> PathBuf {
        self.opts.root.join(format!("{}.idx", self.fid))
    }

    /// Inserts a sync-point node.
    ///
    /// Reinserting an existing timestamp replaces that node and is always
    /// accepted; a new timestamp is rejected once the index holds
    /// [`NODES_PER_FILE`] nodes, at which point the writer must rotate.
    pub fn insert_node(&mut self, node: Node) -> Result<()> {
        if self.index.len() >= NODES_PER_FILE && !self.index.contains(node.timestamp) {
            return Err(Error::IndexFull {
                capacity: NODES_PER_FILE,
            });
        }
        self.index.insert(node);
        Ok(())
    }

    /// Replaces the fid with a fresh one and resets the index.
    ///
    /// The previous log and sidecar are left on disk untouched; they become
    /// Sealed and stay readable.
    pub fn rotate(&mut self) {
        self.fid = Uuid::new_v4();
        self.index.clear();
        self.nodes_flushed = 0;
    }

    /// Snapshots the engine into a sidecar image.
    pub fn serialize(&self) -> SerializedIndex {
        SerializedIndex::new(self.fid, self.index.iter().copied().collect())
    }

    /// Persists the index to the sidecar.
    ///
    /// The first flush writes the full `16 + 20·N` image. Subsequent flushes
    /// seek to slot `nodes_flushed` and write only the slots added since;
    /// the fid header and already-persisted slots are never rewritten. The
    /// file is fsync'd before returning.
    ///
    /// On error the in-memory index is not rolled back: the caller may retry
    /// the flush, and re-writing the same slots is harmless because slot
    /// contents are a pure function of the index.
    pub fn flush(&mut self) -> Result<()> {
        let image = self.serialize();
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(self.sidecar_path())?;

        let persisted = self.index.len().min(NODES_PER_FILE);
        if self.nodes_flushed == 0 {
            file.seek(SeekFrom::Start(0))?;
            file.write_all(&image.to_bytes())?;
        } else if persisted > self.nodes_flushed {
            let at = FID_SIZE + self.nodes_flushed * NODE_SIZE;
            file.seek(SeekFrom::Start(at as u64))?;
            file.write_all(&image.slot_bytes(self.nodes_flushed, persisted))?;
        }

        file.sync_data()?;
        self.nodes_flushed = persisted;
        Ok(())
    }

    /// Lower query bound: the offset of the greatest-timestamped node whose
    /// timestamp is `<= t`, or `0` when every node is later than `t`.
    pub fn first_lte_head(&self, t: i64) -> i64 {
        self.index
            .descend_le(t)
            .next()
            .map(|node| node.offset)
            .unwrap_or(0)
    }

    /// Upper query bound: `offset + length` of the least-timestamped node
    /// whose timestamp is `>= t`, falling back to the end of the last node
    /// when every node is earlier than `t`.
    pub fn first_gte_tail(&self, t: i64) -> i64 {
        match self.index.ascend_ge(t).next() {
            Some(node) => node.end(),
            None => self.index.max().map(Node::end).unwrap_or(0),
        }
    }

    /// Maps `[offset, until)` of the log file read-only.
    ///
    /// The start is floored to the OS page size (mmap offsets must be
    /// page-aligned), so the window is widened leftward only; the line scan
    /// discards the partial leading record this produces. The end is clamped
    /// to the current file length, since touching pages past EOF faults.
    pub fn open_between_positions(&self, offset: i64, until: i64) -> Result<LogWindow> {
        let file = File::open(self.log_path())?;
        let file_len = file.metadata()?.len() as i64;

        let ps = page_size();
        let aligned = ps * (offset / ps);
        let until = until.min(file_len);

        if until <= aligned {
            return Ok(LogWindow { mmap: None });
        }

        // SAFETY: the mapping is read-only and the writer only ever appends,
        // so the mapped range is never truncated underneath us.
        let mmap = unsafe {
            MmapOptions::new()
                .offset(aligned as u64)
                .len((until - aligned) as usize)
                .map(&file)?
        };
        Ok(LogWindow { mmap: Some(mmap) })
    }
}

/// A read-only view of a mapped log region.
///
/// Holds the mapping alive; it is unmapped on drop, once the caller has
/// finished scanning.
pub struct LogWindow {
    mmap: Option<Mmap>,
}

impl LogWindow {
    /// The mapped bytes. Empty when the resolved window was empty.
    pub fn as_bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    /// Length of the mapped region in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// True when nothing was mapped.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The OS page size, used to align mmap offsets.
fn page_size() -> i64 {
    // SAFETY: sysconf is a simple query with no memory preconditions.
    let ps = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if ps > 0 {
        ps
    } else {
        4096
    }
}
