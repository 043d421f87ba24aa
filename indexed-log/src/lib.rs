//! Indexed Log - a time-indexed append-only log store.
//!
//! Producers stream structured records into an active log file
//! (`${root}/${fid}.log`). As bytes accumulate, a sparse in-memory time index
//! records "sync points": byte offsets at which a record boundary falls on a
//! chosen alignment. The index is serialized incrementally into a fixed-size
//! binary sidecar (`${root}/${fid}.idx`). Consumers answer time-range queries
//! by restoring the index from a sidecar, deriving a tight byte window, and
//! memory-mapping that window from the log.
//!
//! # Architecture
//!
//! The write path is a single cooperative producer per file id: records flow
//! through a [`CountingWriter`] into the log; whenever the bytes written since
//! the last sync point cross `bytes_per_node`, the engine inserts a [`Node`]
//! into the [`TimeIndex`] and flushes the sidecar. Rotation mints a fresh file
//! id and seals the previous pair on disk.
//!
//! The read path is multi-reader: sealed sidecars are enumerated from `root`,
//! each restored index resolves `[t_lo, t_hi]` to a byte window, and the
//! window is mapped read-only and scanned as newline-delimited JSON.
//!
//! # Key Concepts
//!
//! - **Node**: a `(offset, length, timestamp)` sync point; 20 bytes on disk.
//! - **Sidecar**: the `16 + 20·N` byte index image next to a log file.
//! - **fid**: a random v4 UUID naming one `(log, sidecar)` pair.
//!
//! # Example
//!
//! ```ignore
//! use indexed_log::{LogAppender, LogFileOptions, Record};
//!
//! let opts = LogFileOptions::new("/var/lib/indexed-log");
//! let mut appender = LogAppender::create(opts.clone())?;
//! appender.append(&record)?;
//!
//! // Later, from any process:
//! let hits = indexed_log::query_range(&opts, t_lo, t_hi)?;
//! ```

mod appender;
mod codec;
mod config;
mod counter;
mod engine;
mod error;
mod index;
mod listing;
mod model;
mod query;
#[cfg(feature = "http-server")]
pub mod server;
mod sidecar;

pub use appender::LogAppender;
pub use codec::{decode, decode_window, encode};
pub use config::LogFileOptions;
pub use counter::CountingWriter;
pub use engine::{IndexedLogFile, LogWindow};
pub use error::{Error, Result};
pub use index::{Node, TimeIndex};
pub use listing::list_sidecars;
pub use model::{FieldValue, Record};
pub use query::query_range;
pub use sidecar::{read_serialized_index, SerializedIndex, NODES_PER_FILE, SIDECAR_SIZE};
