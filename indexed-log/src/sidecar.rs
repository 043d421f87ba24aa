//! Sidecar serialization.
//!
//! Every log file is accompanied by a fixed-size binary sidecar holding a
//! snapshot of its time index. The layout is position-stable so the engine
//! can update individual node slots in place with positional writes:
//!
//! ```text
//! | fid (16 bytes)  | node 0 (20 bytes) | node 1 | ... | node N-1 |
//! |                 |   offset    (i64 BE)                        |
//! |                 |   length    (i32 BE)                        |
//! |                 |   timestamp (i64 BE)                        |
//! ```
//!
//! Total size is always `16 + 20·N` bytes. Unused trailing slots are
//! zero-filled; a slot whose timestamp is zero is empty. `N` is the
//! compile-time constant [`NODES_PER_FILE`]: changing it breaks on-disk
//! compatibility, so it is not a runtime option.

use std::fs;
use std::path::Path;

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

use crate::config::LogFileOptions;
use crate::engine::IndexedLogFile;
use crate::error::{Error, Result};
use crate::index::{Node, TimeIndex};

/// Number of node slots in a sidecar image.
pub const NODES_PER_FILE: usize = 1024;

/// Size of one encoded node: offset (8) + length (4) + timestamp (8).
pub const NODE_SIZE: usize = 20;

/// Size of the fid header.
pub const FID_SIZE: usize = 16;

/// Exact size of a sidecar file on disk.
pub const SIDECAR_SIZE: usize = FID_SIZE + NODE_SIZE * NODES_PER_FILE;

/// A decoded (or to-be-encoded) sidecar image.
///
/// Holds the file id and the occupied node slots in ascending timestamp
/// order. Produced either by snapshotting an engine
/// ([`IndexedLogFile::serialize`]) or by reading a sidecar from disk
/// ([`read_serialized_index`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedIndex {
    fid: Uuid,
    nodes: Vec<Node>,
}

impl SerializedIndex {
    /// Creates an image from a fid and nodes in ascending timestamp order.
    pub(crate) fn new(fid: Uuid, nodes: Vec<Node>) -> Self {
        Self { fid, nodes }
    }

    /// The file id this image belongs to.
    pub fn fid(&self) -> Uuid {
        self.fid
    }

    /// The occupied node slots, ascending by timestamp.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Encodes the full fixed-size image: fid, occupied slots, zero fill.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(SIDECAR_SIZE);
        buf.put_slice(self.fid.as_bytes());
        for node in self.nodes.iter().take(NODES_PER_FILE) {
            put_node(&mut buf, node);
        }
        buf.put_bytes(0, SIDECAR_SIZE - buf.len());
        buf.freeze()
    }

    /// Encodes only the slots in `[start, end)`.
    ///
    /// Used by incremental flushes, which rewrite neither the fid header nor
    /// already-persisted slots. The byte offset of slot `k` in the file is
    /// always `16 + 20·k`.
    pub fn slot_bytes(&self, start: usize, end: usize) -> Bytes {
        let mut buf = BytesMut::with_capacity((end - start) * NODE_SIZE);
        for node in &self.nodes[start..end] {
            put_node(&mut buf, node);
        }
        buf.freeze()
    }

    /// Decodes a full sidecar image.
    ///
    /// The input must be exactly [`SIDECAR_SIZE`] bytes; slots with a zero
    /// timestamp are treated as empty and dropped.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != SIDECAR_SIZE {
            return Err(Error::SidecarSize {
                expected: SIDECAR_SIZE,
                found: data.len(),
            });
        }

        let mut fid = [0u8; FID_SIZE];
        fid.copy_from_slice(&data[..FID_SIZE]);
        let fid = Uuid::from_bytes(fid);

        let mut nodes = Vec::new();
        for slot in 0..NODES_PER_FILE {
            let at = FID_SIZE + slot * NODE_SIZE;
            let node = parse_node(&data[at..at + NODE_SIZE]);
            if node.timestamp != 0 {
                nodes.push(node);
            }
        }

        Ok(Self { fid, nodes })
    }

    /// Rebuilds an engine from this image.
    ///
    /// The restored engine is Active: its flush cursor equals the number of
    /// nodes already on disk, so subsequent flushes append only new slots.
    pub fn deserialize(&self, opts: LogFileOptions) -> IndexedLogFile {
        let mut index = TimeIndex::new();
        for node in &self.nodes {
            index.insert(*node);
        }
        let flushed = index.len();
        IndexedLogFile::from_parts(self.fid, index, opts, flushed)
    }
}

/// Reads and decodes a sidecar file.
pub fn read_serialized_index(path: &Path) -> Result<SerializedIndex> {
    let data = fs::read(path)?;
    SerializedIndex::from_bytes(&data)
}

fn put_node(buf: &mut BytesMut, node: &Node) {
    buf.put_i64(node.offset);
    buf.put_i32(node.length);
    buf.put_i64(node.timestamp);
}

fn parse_node(data: &[u8]) -> Node {
    let offset = i64::from_be_bytes([
        data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
    ]);
    let length = i32::from_be_bytes([data[8], data[9], data[10], data[11]]);
    let timestamp = i64::from_be_bytes([
        data[12], data[13], data[14], data[15], data[16], data[17], data[18], data[19],
    ]);
    Node {
        offset,
        length,
        timestamp,
    }
}
